pub mod analysis;
pub mod claude;

pub use analysis::{Analysis, AnalysisRequest, Analyzer};
pub use claude::ClaudeAnalyzer;
