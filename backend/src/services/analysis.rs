use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::daily_info::NutritionInfo;

pub const ANALYZE_KIND: &str = "analyze";

/// What the analyzer is asked to assess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[validate(length(min = 1, max = 20000, message = "Journal entry must be 1-20000 characters"))]
    pub journal_entry: String,
    #[serde(default)]
    pub user_profile: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: AnalysisRequest,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ChatRequest {
    pub fn analyze(content: AnalysisRequest) -> Self {
        Self {
            content,
            kind: ANALYZE_KIND.into(),
        }
    }

    pub fn validate_analyze(&self) -> AppResult<()> {
        if self.kind != ANALYZE_KIND {
            return Err(AppError::Validation(format!(
                "Unsupported chat type '{}'",
                self.kind
            )));
        }
        self.content.validate()?;
        Ok(())
    }
}

/// Result of a successful analysis; both fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub analysis: String,
    pub nutrition: NutritionInfo,
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> AppResult<Analysis>;
}
