//! Record store accessor for `daily_info`, keyed by `(user_id, date)`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::daily_info::{DailyInfo, DailyInfoPatch, DailyInfoRow};

#[async_trait]
pub trait DailyInfoStore: Send + Sync {
    /// Return the record for `(user_id, date)`, creating an empty one if no row
    /// matches. Concurrent callers for the same key observe the same row.
    async fn fetch_or_create(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailyInfo>;

    /// Merge `patch` into an existing record and return the full row.
    /// Fails with `NotFound` if the record was never created.
    async fn update(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        patch: &DailyInfoPatch,
    ) -> AppResult<DailyInfo>;

    /// Up to `limit` records for the user, most recent date first.
    async fn list_recent(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<DailyInfo>>;

    async fn ping(&self) -> bool;
}

#[derive(Clone)]
pub struct PgDailyInfoStore {
    pool: PgPool,
}

impl PgDailyInfoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyInfoStore for PgDailyInfoStore {
    async fn fetch_or_create(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailyInfo> {
        let existing = sqlx::query_as::<_, DailyInfoRow>(
            "SELECT * FROM daily_info WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = existing {
            return Ok(row.into());
        }

        // No-op update on conflict so a racing insert's row comes back via RETURNING
        let row = sqlx::query_as::<_, DailyInfoRow>(
            r#"
            INSERT INTO daily_info (id, user_id, date, journal, llm_analysis, nutrition_info)
            VALUES ($1, $2, $3, '', NULL, NULL)
            ON CONFLICT (user_id, date) DO UPDATE
                SET journal = daily_info.journal
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = %user_id, date = %date, record_id = %row.id, "Created daily record");
        Ok(row.into())
    }

    async fn update(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        patch: &DailyInfoPatch,
    ) -> AppResult<DailyInfo> {
        let row = sqlx::query_as::<_, DailyInfoRow>(
            r#"
            UPDATE daily_info SET
                journal = COALESCE($3, journal),
                llm_analysis = COALESCE($4, llm_analysis),
                nutrition_info = COALESCE($5, nutrition_info),
                created_at = COALESCE($6, created_at),
                updated_at = NOW()
            WHERE user_id = $1 AND date = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(&patch.journal)
        .bind(&patch.llm_analysis)
        .bind(patch.nutrition_info.map(Json))
        .bind(patch.created_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No daily record for {}", date)))?;

        Ok(row.into())
    }

    async fn list_recent(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<DailyInfo>> {
        let rows = sqlx::query_as::<_, DailyInfoRow>(
            r#"
            SELECT * FROM daily_info
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DailyInfo::from).collect())
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
