use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_RECENT_LIMIT: u32 = 7;
pub const MAX_RECENT_LIMIT: u32 = 90;
pub const MAX_JOURNAL_CHARS: usize = 20_000;

/// Estimated intake and expenditure for one day, as returned by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories_burned: f64,
    pub calories_maintenance: f64,
}

impl NutritionInfo {
    /// Intake minus activity and maintenance. Negative means a deficit.
    pub fn net_calories(&self) -> f64 {
        self.calories - self.calories_burned - self.calories_maintenance
    }
}

/// One journal record per user per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub journal: String,
    pub llm_analysis: Option<String>,
    pub nutrition_info: Option<NutritionInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyInfo {
    /// The default record materialized on first access.
    pub fn blank(user_id: Uuid, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            journal: String::new(),
            llm_analysis: None,
            nutrition_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the fields present in `patch`. Absent fields are left as they are.
    pub fn apply(&mut self, patch: &DailyInfoPatch) {
        if let Some(journal) = &patch.journal {
            self.journal = journal.clone();
        }
        if let Some(analysis) = &patch.llm_analysis {
            self.llm_analysis = Some(analysis.clone());
        }
        if let Some(nutrition) = patch.nutrition_info {
            self.nutrition_info = Some(nutrition);
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
        self.updated_at = Utc::now();
    }
}

/// Row shape of `daily_info`; nutrition is stored as JSONB.
#[derive(Debug, FromRow)]
pub(crate) struct DailyInfoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub journal: String,
    pub llm_analysis: Option<String>,
    pub nutrition_info: Option<Json<NutritionInfo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailyInfoRow> for DailyInfo {
    fn from(row: DailyInfoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            journal: row.journal,
            llm_analysis: row.llm_analysis,
            nutrition_info: row.nutrition_info.map(|Json(n)| n),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Partial update of a record. `None` means "leave unchanged"; fields cannot be
/// cleared back to null through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DailyInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20000, message = "Journal must be at most 20000 characters"))]
    pub journal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_analysis: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_info: Option<NutritionInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DailyInfoPatch {
    pub fn is_empty(&self) -> bool {
        self.journal.is_none()
            && self.llm_analysis.is_none()
            && self.nutrition_info.is_none()
            && self.created_at.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrition() -> NutritionInfo {
        NutritionInfo {
            calories: 2000.0,
            protein: 100.0,
            carbs: 250.0,
            fats: 70.0,
            calories_burned: 500.0,
            calories_maintenance: 2200.0,
        }
    }

    #[test]
    fn test_blank_record_is_empty() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let record = DailyInfo::blank(Uuid::new_v4(), date);
        assert_eq!(record.journal, "");
        assert!(record.llm_analysis.is_none());
        assert!(record.nutrition_info.is_none());
        assert_eq!(record.date, date);
    }

    #[test]
    fn test_apply_leaves_untouched_fields() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut record = DailyInfo::blank(Uuid::new_v4(), date);
        record.llm_analysis = Some("earlier".into());
        let created_at = record.created_at;

        record.apply(&DailyInfoPatch {
            journal: Some("X".into()),
            ..Default::default()
        });

        assert_eq!(record.journal, "X");
        assert_eq!(record.llm_analysis.as_deref(), Some("earlier"));
        assert_eq!(record.created_at, created_at);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = DailyInfoPatch {
            journal: Some("ran 5k".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "journal": "ran 5k" }));
        assert!(!patch.is_empty());
        assert!(DailyInfoPatch::default().is_empty());
    }

    #[test]
    fn test_patch_rejects_oversized_journal() {
        let patch = DailyInfoPatch {
            journal: Some("a".repeat(MAX_JOURNAL_CHARS + 1)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_nutrition_deserializes_and_nets() {
        let json = r#"{"calories":2000,"protein":100,"carbs":250,"fats":70,"calories_burned":500,"calories_maintenance":2200}"#;
        let parsed: NutritionInfo = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, nutrition());
        assert_eq!(parsed.net_calories(), -700.0);
    }

    #[test]
    fn test_nutrition_missing_field_fails() {
        let json = r#"{"calories":2000,"protein":100}"#;
        assert!(serde_json::from_str::<NutritionInfo>(json).is_err());
    }
}
