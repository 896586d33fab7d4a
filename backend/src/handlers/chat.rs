use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::services::analysis::{Analysis, ChatRequest};
use crate::AppState;

/// `POST /api/chat`: analyze a journal entry. Nothing is persisted here; the
/// caller stores the result on its record once it has it.
pub async fn chat(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<Analysis>> {
    body.validate_analyze()?;

    let started = std::time::Instant::now();
    let result = state.analyzer.analyze(&body.content).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(analysis) => tracing::info!(
            user_id = %auth_user.id,
            elapsed_ms,
            calories = analysis.nutrition.calories,
            "Journal entry analyzed"
        ),
        Err(e) => tracing::warn!(
            user_id = %auth_user.id,
            elapsed_ms,
            error = %e,
            "Journal analysis failed"
        ),
    }

    Ok(Json(result?))
}
