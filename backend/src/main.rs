use anyhow::Context;
use std::sync::Arc;

use journal_api::config::{Config, StoreBackend};
use journal_api::db::{self, DailyInfoStore, MemoryDailyInfoStore, PgDailyInfoStore};
use journal_api::services::ClaudeAnalyzer;
use journal_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journal_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let store: Arc<dyn DailyInfoStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = db::create_pool(url, config.database_max_connections).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Arc::new(PgDailyInfoStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            Arc::new(MemoryDailyInfoStore::new())
        }
    };

    if config.claude_api_key.is_empty() {
        tracing::warn!("CLAUDE_API_KEY not set; /api/chat will return 502");
    }
    let analyzer = Arc::new(ClaudeAnalyzer::from_config(&config)?);

    let state = AppState::new(store, analyzer, config.clone());
    state.rate_limiter.spawn_cleanup_worker();

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
