use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::daily_info::{
    DailyInfo, DailyInfoPatch, RecentQuery, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT,
};
use crate::AppState;

pub async fn get_daily_info(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<DailyInfo>> {
    let record = state.store.fetch_or_create(auth_user.id, date).await?;
    Ok(Json(record))
}

pub async fn update_daily_info(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
    Json(body): Json<DailyInfoPatch>,
) -> AppResult<Json<DailyInfo>> {
    body.validate()?;
    if body.is_empty() {
        return Err(AppError::Validation("No fields to update".into()));
    }

    let record = state.store.update(auth_user.id, date, &body).await?;

    tracing::info!(
        user_id = %auth_user.id,
        date = %date,
        journal = body.journal.is_some(),
        analysis = body.llm_analysis.is_some(),
        "Daily record updated"
    );

    Ok(Json(record))
}

pub async fn list_daily_info(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<DailyInfo>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_RECENT_LIMIT
        )));
    }

    let records = state.store.list_recent(auth_user.id, limit).await?;
    Ok(Json(records))
}
