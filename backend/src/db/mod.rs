pub mod daily_info;
pub mod memory;
pub mod pool;

pub use daily_info::{DailyInfoStore, PgDailyInfoStore};
pub use memory::MemoryDailyInfoStore;
pub use pool::create_pool;
