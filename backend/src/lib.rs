//! Daily journal API: per-user, per-date journal records with on-demand
//! nutrition/activity analysis, plus the report view that drives them.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod report;
pub mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::DailyInfoStore;
use services::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DailyInfoStore>,
    pub analyzer: Arc<dyn Analyzer>,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DailyInfoStore>,
        analyzer: Arc<dyn Analyzer>,
        config: Arc<Config>,
    ) -> Self {
        let rate_limiter =
            RateLimitState::new(config.chat_rate_limit, config.chat_rate_window_secs);
        Self {
            store,
            analyzer,
            config,
            rate_limiter,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        .route(
            "/api/daily-info",
            get(handlers::daily_info::list_daily_info),
        )
        .route(
            "/api/daily-info/:date",
            get(handlers::daily_info::get_daily_info)
                .patch(handlers::daily_info::update_daily_info),
        )
        .route(
            "/api/chat",
            post(handlers::chat::chat).layer(middleware::from_fn_with_state(
                state.clone(),
                auth::rate_limit::rate_limit_chat,
            )),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins: Vec<axum::http::HeaderValue> = Vec::new();
    match config.frontend_url.parse() {
        Ok(origin) => origins.push(origin),
        Err(_) => tracing::warn!(url = %config.frontend_url, "FRONTEND_URL is not a valid origin"),
    }
    // In dev, also allow LAN access (e.g. testing from another device)
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}
