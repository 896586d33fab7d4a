use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::DailyInfoStore;
use crate::error::{AppError, AppResult};
use crate::models::daily_info::{DailyInfo, DailyInfoPatch};

/// In-process store for local development and tests (`STORE_BACKEND=memory`).
/// Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryDailyInfoStore {
    records: Arc<Mutex<HashMap<(Uuid, NaiveDate), DailyInfo>>>,
}

impl MemoryDailyInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl DailyInfoStore for MemoryDailyInfoStore {
    async fn fetch_or_create(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailyInfo> {
        let mut records = self.records.lock().await;
        let record = records
            .entry((user_id, date))
            .or_insert_with(|| DailyInfo::blank(user_id, date));
        Ok(record.clone())
    }

    async fn update(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        patch: &DailyInfoPatch,
    ) -> AppResult<DailyInfo> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(&(user_id, date))
            .ok_or_else(|| AppError::NotFound(format!("No daily record for {}", date)))?;
        record.apply(patch);
        Ok(record.clone())
    }

    async fn list_recent(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<DailyInfo>> {
        let records = self.records.lock().await;
        let mut mine: Vec<DailyInfo> = records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.date.cmp(&a.date));
        mine.truncate(limit as usize);
        Ok(mine)
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_info::NutritionInfo;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_or_create_new_key_is_blank() {
        let store = MemoryDailyInfoStore::new();
        let record = store.fetch_or_create(Uuid::new_v4(), day(16)).await.unwrap();
        assert_eq!(record.journal, "");
        assert!(record.llm_analysis.is_none());
        assert!(record.nutrition_info.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_fetch_or_create_makes_one_record() {
        let store = MemoryDailyInfoStore::new();
        let user = Uuid::new_v4();

        let (a, b) = tokio::join!(
            store.fetch_or_create(user, day(16)),
            store.fetch_or_create(user, day(16)),
        );

        assert_eq!(a.unwrap().id, b.unwrap().id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_then_fetch_keeps_untouched_fields() {
        let store = MemoryDailyInfoStore::new();
        let user = Uuid::new_v4();
        store.fetch_or_create(user, day(16)).await.unwrap();

        let nutrition = NutritionInfo {
            calories: 1800.0,
            protein: 90.0,
            carbs: 200.0,
            fats: 60.0,
            calories_burned: 300.0,
            calories_maintenance: 2100.0,
        };
        store
            .update(
                user,
                day(16),
                &DailyInfoPatch {
                    llm_analysis: Some("Solid".into()),
                    nutrition_info: Some(nutrition),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .update(
                user,
                day(16),
                &DailyInfoPatch {
                    journal: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let record = store.fetch_or_create(user, day(16)).await.unwrap();
        assert_eq!(record.journal, "X");
        assert_eq!(record.llm_analysis.as_deref(), Some("Solid"));
        assert_eq!(record.nutrition_info, Some(nutrition));
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let store = MemoryDailyInfoStore::new();
        let result = store
            .update(Uuid::new_v4(), day(16), &DailyInfoPatch::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_recent_is_limited_and_descending() {
        let store = MemoryDailyInfoStore::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        for d in [3, 9, 1, 12, 5, 7, 10, 2, 11, 4] {
            store.fetch_or_create(user, day(d)).await.unwrap();
        }
        store.fetch_or_create(other, day(20)).await.unwrap();

        let recent = store.list_recent(user, 7).await.unwrap();
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0].date, day(12));
        assert!(recent.windows(2).all(|w| w[0].date >= w[1].date));
        assert!(recent.iter().all(|r| r.user_id == user));
    }

    #[tokio::test]
    async fn test_list_recent_zero_limit_is_empty() {
        let store = MemoryDailyInfoStore::new();
        let user = Uuid::new_v4();
        store.fetch_or_create(user, day(1)).await.unwrap();
        assert!(store.list_recent(user, 0).await.unwrap().is_empty());
    }
}
