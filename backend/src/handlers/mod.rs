pub mod chat;
pub mod daily_info;
pub mod health;
