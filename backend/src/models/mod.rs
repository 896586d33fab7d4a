pub mod daily_info;
