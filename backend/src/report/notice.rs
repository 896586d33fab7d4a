/// Transient user-facing notification (a toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub const LOAD_FAILED: &str = "Failed to fetch daily report";
pub const RECENT_FAILED: &str = "Failed to fetch recent entries";
pub const SAVED: &str = "Journal entry saved!";
pub const SAVE_FAILED: &str = "Failed to save journal entry";
pub const ANALYZED: &str = "Analysis complete!";
pub const ANALYZE_FAILED: &str = "Failed to analyze entry";
pub const LOGIN_TO_SAVE: &str = "You must be logged in to save";
pub const LOGIN_TO_ANALYZE: &str = "You must be logged in to analyze";
pub const WRITE_FIRST: &str = "Please write your journal entry first";
