pub mod config;
pub mod datetime;
pub mod time;
