use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::analysis::{Analysis, AnalysisRequest, Analyzer};

/// Analyzer backed by the Anthropic Messages API.
pub struct ClaudeAnalyzer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl ClaudeAnalyzer {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.analysis_timeout_secs))
            .build()
            .context("Failed to build Claude HTTP client")?;

        Ok(Self {
            client,
            api_key: config.claude_api_key.clone(),
            model: config.claude_model.clone(),
            api_url: config.claude_api_url.clone(),
        })
    }
}

#[async_trait]
impl Analyzer for ClaudeAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> AppResult<Analysis> {
        if self.api_key.is_empty() {
            return Err(AppError::Upstream("CLAUDE_API_KEY is not configured".into()));
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": 1024,
                "messages": [{
                    "role": "user",
                    "content": build_prompt(request)
                }]
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Claude request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Claude API error {}: {}",
                status, body
            )));
        }

        let claude_response: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Claude response was not JSON: {}", e)))?;
        let text = claude_response["content"][0]["text"]
            .as_str()
            .ok_or_else(|| AppError::Upstream("Claude response had no text content".into()))?;

        parse_analysis(text)
    }
}

fn build_prompt(request: &AnalysisRequest) -> String {
    let profile = if request.user_profile.trim().is_empty() {
        "Not provided".to_string()
    } else {
        request.user_profile.trim().to_string()
    };

    format!(
        r#"You are a nutrition and activity coach. Read this person's journal entry for one day and estimate what they ate and how active they were.

User profile:
{}

Journal entry:
{}

Respond with only a JSON object with this exact schema:
{{
  "analysis": "3-5 sentences on their food, activity and how the day went, with one concrete suggestion",
  "nutrition": {{
    "calories": number,
    "protein": number,
    "carbs": number,
    "fats": number,
    "calories_burned": number,
    "calories_maintenance": number
  }}
}}
Protein, carbs and fats are grams. calories_burned covers exercise only; calories_maintenance is the estimated resting daily need."#,
        profile, request.journal_entry
    )
}

/// Parse the model reply, tolerating prose or code fences around the object.
fn parse_analysis(text: &str) -> AppResult<Analysis> {
    let json = extract_json_object(text)
        .ok_or_else(|| AppError::Upstream("Claude reply contained no JSON object".into()))?;
    serde_json::from_str(json)
        .map_err(|e| AppError::Upstream(format!("Claude reply had unexpected shape: {}", e)))
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
