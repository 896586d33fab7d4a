//! HTTP client for the journal API. Implements both the store and analyzer
//! seams so a `DailyReportView` can run against a remote server.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::db::DailyInfoStore;
use crate::error::{AppError, AppResult};
use crate::models::daily_info::{DailyInfo, DailyInfoPatch};
use crate::services::analysis::{Analysis, AnalysisRequest, Analyzer, ChatRequest};

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build API client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(AppError::Unauthorized),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(
                response.text().await.unwrap_or_default(),
            )),
            StatusCode::TOO_MANY_REQUESTS => Err(AppError::RateLimited),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Upstream(format!("API error {}: {}", status, body)))
            }
        }
    }

    async fn json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Malformed response body: {}", e)))
    }
}

/// The server scopes records to the token's user; `user_id` must match it.
#[async_trait]
impl DailyInfoStore for ApiClient {
    async fn fetch_or_create(&self, _user_id: Uuid, date: NaiveDate) -> AppResult<DailyInfo> {
        let request = self.client.get(self.url(&format!("/api/daily-info/{}", date)));
        Self::json(self.send(request).await?).await
    }

    async fn update(
        &self,
        _user_id: Uuid,
        date: NaiveDate,
        patch: &DailyInfoPatch,
    ) -> AppResult<DailyInfo> {
        let request = self
            .client
            .patch(self.url(&format!("/api/daily-info/{}", date)))
            .json(patch);
        Self::json(self.send(request).await?).await
    }

    async fn list_recent(&self, _user_id: Uuid, limit: u32) -> AppResult<Vec<DailyInfo>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let request = self
            .client
            .get(self.url("/api/daily-info"))
            .query(&[("limit", limit)]);
        Self::json(self.send(request).await?).await
    }

    async fn ping(&self) -> bool {
        self.client
            .get(self.url("/readyz"))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Analyzer for ApiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> AppResult<Analysis> {
        let body = ChatRequest::analyze(request.clone());
        let request = self.client.post(self.url("/api/chat")).json(&body);
        Self::json(self.send(request).await?).await
    }
}
