//! Daily report view: the interaction state machine behind the journal page.
//!
//! Phases run `Idle -> LoadingUser -> LoadingRecord -> Ready`; `saving` and
//! `analyzing` are only ever set while `Ready`. Every external call is split
//! into `begin_*` (which hands out a ticket) and `finish_*` (which consumes
//! the ticket and the outcome), so overlapping calls can be interleaved in
//! any order. A ticket remembers the load generation it was issued under;
//! outcomes from an older generation never overwrite what is on screen.
//!
//! The async drivers (`mount`, `change_date`, `save`, `analyze`) run both
//! halves back to back for callers that don't need the split.

pub mod notice;
pub mod panel;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::auth::session::SessionSource;
use crate::db::DailyInfoStore;
use crate::error::AppResult;
use crate::models::daily_info::{DailyInfo, DailyInfoPatch, NutritionInfo, DEFAULT_RECENT_LIMIT};
use crate::services::analysis::{Analysis, AnalysisRequest, Analyzer};

use notice::Notice;
use panel::{ResultsPanel, WeekDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingUser,
    LoadingRecord,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub user_id: Uuid,
    pub date: NaiveDate,
    generation: u64,
}

impl LoadTicket {
    pub async fn run(&self, store: &dyn DailyInfoStore) -> AppResult<DailyInfo> {
        store.fetch_or_create(self.user_id, self.date).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub patch: DailyInfoPatch,
    generation: u64,
}

impl SaveTicket {
    pub async fn run(&self, store: &dyn DailyInfoStore) -> AppResult<DailyInfo> {
        store.update(self.user_id, self.date, &self.patch).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeTicket {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub request: AnalysisRequest,
    generation: u64,
}

impl AnalyzeTicket {
    /// Analyze, then persist. The store is only written once a complete
    /// analysis is in hand.
    pub async fn run(
        &self,
        store: &dyn DailyInfoStore,
        analyzer: &dyn Analyzer,
    ) -> AppResult<(Analysis, DailyInfo)> {
        let analysis = analyzer.analyze(&self.request).await?;
        let patch = DailyInfoPatch {
            journal: Some(self.request.journal_entry.clone()),
            llm_analysis: Some(analysis.analysis.clone()),
            nutrition_info: Some(analysis.nutrition),
            created_at: None,
        };
        let record = store.update(self.user_id, self.date, &patch).await?;
        Ok((analysis, record))
    }
}

pub struct DailyReportView {
    store: Arc<dyn DailyInfoStore>,
    analyzer: Arc<dyn Analyzer>,

    phase: Phase,
    user: Option<AuthUser>,
    selected_date: NaiveDate,
    generation: u64,

    record: Option<DailyInfo>,
    journal: String,
    analysis: Option<String>,
    nutrition: Option<NutritionInfo>,
    recent: Vec<DailyInfo>,

    saving: bool,
    analyzing: bool,
    notices: Vec<Notice>,
}

impl DailyReportView {
    pub fn new(
        store: Arc<dyn DailyInfoStore>,
        analyzer: Arc<dyn Analyzer>,
        selected_date: NaiveDate,
    ) -> Self {
        Self {
            store,
            analyzer,
            phase: Phase::Idle,
            user: None,
            selected_date,
            generation: 0,
            record: None,
            journal: String::new(),
            analysis: None,
            nutrition: None,
            recent: Vec::new(),
            saving: false,
            analyzing: false,
            notices: Vec::new(),
        }
    }

    // ── Read-only state ──────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn record(&self) -> Option<&DailyInfo> {
        self.record.as_ref()
    }

    pub fn journal(&self) -> &str {
        &self.journal
    }

    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    pub fn nutrition(&self) -> Option<&NutritionInfo> {
        self.nutrition.as_ref()
    }

    pub fn recent(&self) -> &[DailyInfo] {
        &self.recent
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn can_analyze(&self) -> bool {
        self.phase == Phase::Ready && !self.analyzing && !self.journal.is_empty()
    }

    pub fn can_save(&self) -> bool {
        self.phase == Phase::Ready
            && !self.saving
            && self.user.is_some()
            && !self.journal.is_empty()
    }

    pub fn analyze_label(&self) -> &'static str {
        if self.analyzing {
            "Analyzing..."
        } else {
            "Analyze Entry"
        }
    }

    pub fn save_label(&self) -> &'static str {
        if self.saving {
            "Saving..."
        } else {
            "Save Entry"
        }
    }

    pub fn results_panel(&self) -> Option<ResultsPanel> {
        ResultsPanel::build(self.analysis.as_deref(), self.nutrition.as_ref())
    }

    /// The date picker's week, with days that have a journal entry marked.
    pub fn week(&self) -> Vec<WeekDay> {
        panel::week_of(self.selected_date)
            .into_iter()
            .map(|date| WeekDay {
                date,
                label: date.format("%a %-d").to_string(),
                selected: date == self.selected_date,
                has_entry: self
                    .recent
                    .iter()
                    .any(|r| r.date == date && !r.journal.is_empty()),
            })
            .collect()
    }

    // ── Editing ──────────────────────────────────────────────────────────

    pub fn set_journal(&mut self, text: impl Into<String>) {
        self.journal = text.into();
    }

    // ── Mount / user resolution ──────────────────────────────────────────

    /// Supersedes anything still in flight from a previous mount.
    pub fn begin_mount(&mut self) {
        self.generation += 1;
        self.phase = Phase::LoadingUser;
        self.saving = false;
        self.analyzing = false;
    }

    /// Without a user the view goes back to `Idle` and nothing is loaded.
    pub fn finish_mount(&mut self, user: Option<AuthUser>) -> Option<LoadTicket> {
        match user {
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Report view user resolved");
                self.user = Some(user);
                self.begin_load()
            }
            None => {
                self.user = None;
                self.phase = Phase::Idle;
                self.clear_displayed();
                self.recent.clear();
                None
            }
        }
    }

    pub async fn mount(&mut self, session: &dyn SessionSource) {
        self.begin_mount();
        let user = session.current_user().await;
        if let Some(ticket) = self.finish_mount(user) {
            self.run_load(ticket).await;
        }
    }

    // ── Record loading / date selection ──────────────────────────────────

    /// Start loading the selected date. Supersedes any load, save or analysis
    /// still in flight for the previous generation.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        let user_id = self.user.as_ref()?.id;
        self.generation += 1;
        self.phase = Phase::LoadingRecord;
        self.saving = false;
        self.analyzing = false;
        Some(LoadTicket {
            user_id,
            date: self.selected_date,
            generation: self.generation,
        })
    }

    /// Apply a load outcome. Returns false if the ticket was stale and the
    /// outcome was dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: AppResult<DailyInfo>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(date = %ticket.date, "Discarding stale daily record response");
            return false;
        }

        match result {
            Ok(record) => {
                self.journal = record.journal.clone();
                self.analysis = record.llm_analysis.clone();
                self.nutrition = record.nutrition_info;
                self.record = Some(record);
            }
            Err(e) => {
                tracing::warn!(date = %ticket.date, error = %e, "Failed to load daily record");
                self.clear_displayed();
                self.notices.push(Notice::error(notice::LOAD_FAILED));
            }
        }
        self.phase = Phase::Ready;
        true
    }

    pub async fn reload(&mut self) {
        if let Some(ticket) = self.begin_load() {
            self.run_load(ticket).await;
        }
    }

    /// Switch dates. Unsaved journal edits for the old date are dropped.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<LoadTicket> {
        self.selected_date = date;
        self.clear_displayed();
        self.begin_load()
    }

    pub async fn change_date(&mut self, date: NaiveDate) {
        if let Some(ticket) = self.select_date(date) {
            self.run_load(ticket).await;
        }
    }

    pub async fn shift_week(&mut self, weeks: i64) {
        let date = self.selected_date + Duration::weeks(weeks);
        self.change_date(date).await;
    }

    async fn run_load(&mut self, ticket: LoadTicket) {
        let result = ticket.run(self.store.as_ref()).await;
        self.finish_load(ticket, result);
    }

    /// Refresh the recent-entries list used to mark days in the week strip.
    pub async fn refresh_recent(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|u| u.id) else {
            return;
        };
        match self.store.list_recent(user_id, DEFAULT_RECENT_LIMIT).await {
            Ok(records) => self.recent = records,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list recent daily records");
                self.notices.push(Notice::error(notice::RECENT_FAILED));
            }
        }
    }

    // ── Save ─────────────────────────────────────────────────────────────

    /// Returns `None` if the save is blocked; a notice explains missing input.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        let Some(user_id) = self.user.as_ref().map(|u| u.id) else {
            self.notices.push(Notice::error(notice::LOGIN_TO_SAVE));
            return None;
        };
        if self.journal.is_empty() {
            self.notices.push(Notice::error(notice::WRITE_FIRST));
            return None;
        }
        if self.phase != Phase::Ready || self.saving {
            return None;
        }

        self.saving = true;
        Some(SaveTicket {
            user_id,
            date: self.selected_date,
            patch: DailyInfoPatch {
                journal: Some(self.journal.clone()),
                created_at: Some(Utc::now()),
                ..Default::default()
            },
            generation: self.generation,
        })
    }

    pub fn finish_save(&mut self, ticket: SaveTicket, result: AppResult<DailyInfo>) {
        let current = ticket.generation == self.generation;
        if current {
            self.saving = false;
        }

        match result {
            Ok(record) => {
                tracing::info!(date = %ticket.date, "Journal entry saved");
                self.remember_recent(ticket.user_id, &record);
                if current {
                    self.record = Some(record);
                }
                self.notices.push(Notice::success(notice::SAVED));
            }
            Err(e) => {
                tracing::warn!(date = %ticket.date, error = %e, "Failed to save journal entry");
                self.notices.push(Notice::error(notice::SAVE_FAILED));
            }
        }
    }

    pub async fn save(&mut self) {
        let Some(ticket) = self.begin_save() else {
            return;
        };
        let result = ticket.run(self.store.as_ref()).await;
        self.finish_save(ticket, result);
    }

    // ── Analyze ──────────────────────────────────────────────────────────

    pub fn begin_analyze(&mut self) -> Option<AnalyzeTicket> {
        if self.journal.trim().is_empty() {
            self.notices.push(Notice::error(notice::WRITE_FIRST));
            return None;
        }
        let Some(user) = self.user.as_ref() else {
            self.notices.push(Notice::error(notice::LOGIN_TO_ANALYZE));
            return None;
        };
        if self.phase != Phase::Ready || self.analyzing {
            return None;
        }

        let ticket = AnalyzeTicket {
            user_id: user.id,
            date: self.selected_date,
            request: AnalysisRequest {
                journal_entry: self.journal.clone(),
                user_profile: user.profile.clone().unwrap_or_default(),
            },
            generation: self.generation,
        };
        self.analyzing = true;
        Some(ticket)
    }

    /// On failure the displayed analysis and nutrition are left untouched.
    pub fn finish_analyze(
        &mut self,
        ticket: AnalyzeTicket,
        result: AppResult<(Analysis, DailyInfo)>,
    ) {
        let current = ticket.generation == self.generation;
        if current {
            self.analyzing = false;
        }

        match result {
            Ok((analysis, record)) => {
                tracing::info!(date = %ticket.date, "Journal entry analyzed");
                self.remember_recent(ticket.user_id, &record);
                if current {
                    self.analysis = Some(analysis.analysis);
                    self.nutrition = Some(analysis.nutrition);
                    self.record = Some(record);
                }
                self.notices.push(Notice::success(notice::ANALYZED));
            }
            Err(e) => {
                tracing::warn!(date = %ticket.date, error = %e, "Failed to analyze journal entry");
                self.notices.push(Notice::error(notice::ANALYZE_FAILED));
            }
        }
    }

    pub async fn analyze(&mut self) {
        let Some(ticket) = self.begin_analyze() else {
            return;
        };
        let result = ticket
            .run(self.store.as_ref(), self.analyzer.as_ref())
            .await;
        self.finish_analyze(ticket, result);
    }

    /// Keep the week strip in step with a record that was just written,
    /// without another round trip to the store.
    fn remember_recent(&mut self, user_id: Uuid, record: &DailyInfo) {
        if self.user.as_ref().map(|u| u.id) != Some(user_id) {
            return;
        }
        match self.recent.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record.clone(),
            None => {
                self.recent.push(record.clone());
                self.recent.sort_by(|a, b| b.date.cmp(&a.date));
            }
        }
    }

    fn clear_displayed(&mut self) {
        self.record = None;
        self.journal.clear();
        self.analysis = None;
        self.nutrition = None;
    }
}
