//! Shared helpers for integration tests. Everything runs against the
//! in-memory store; no database is required.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use journal_api::auth::jwt::{Claims, UserMetadata};
use journal_api::config::{Config, StoreBackend};
use journal_api::db::MemoryDailyInfoStore;
use journal_api::error::{AppError, AppResult};
use journal_api::models::daily_info::NutritionInfo;
use journal_api::services::{Analysis, AnalysisRequest, Analyzer};
use journal_api::{build_router, AppState};

pub const JWT_SECRET: &str = "integration-secret";
pub const AUDIENCE: &str = "authenticated";

pub fn test_config(chat_rate_limit: u32) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:3000".into(),
        store_backend: StoreBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        jwt_secret: JWT_SECRET.into(),
        jwt_audience: AUDIENCE.into(),
        claude_api_key: String::new(),
        claude_model: "test".into(),
        claude_api_url: "http://127.0.0.1:9/unused".into(),
        analysis_timeout_secs: 5,
        chat_rate_limit,
        chat_rate_window_secs: 60,
    }
}

pub fn great_day() -> Analysis {
    Analysis {
        analysis: "Great day".into(),
        nutrition: NutritionInfo {
            calories: 2000.0,
            protein: 100.0,
            carbs: 250.0,
            fats: 70.0,
            calories_burned: 500.0,
            calories_maintenance: 2200.0,
        },
    }
}

/// Analyzer standing in for the LLM: a fixed reply, or a 5xx-style failure.
pub struct StubAnalyzer(pub Option<Analysis>);

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze(&self, _request: &AnalysisRequest) -> AppResult<Analysis> {
        self.0
            .clone()
            .ok_or_else(|| AppError::Upstream("model overloaded".into()))
    }
}

pub fn build_test_app(
    store: MemoryDailyInfoStore,
    reply: Option<Analysis>,
    chat_rate_limit: u32,
) -> axum::Router {
    let state = AppState::new(
        Arc::new(store),
        Arc::new(StubAnalyzer(reply)),
        Arc::new(test_config(chat_rate_limit)),
    );
    build_router(state)
}

pub fn mint_token(user_id: Uuid, profile: Option<&str>) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: Some("me@example.com".into()),
        exp: (now + Duration::minutes(10)).timestamp(),
        iat: Some(now.timestamp()),
        aud: Some(AUDIENCE.into()),
        user_metadata: UserMetadata {
            user_current_profile: profile.map(str::to_string),
        },
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
