pub mod time;
pub mod timezone;

pub use time::TimeConfig;
pub use timezone::TimezoneContract;

#[cfg(test)]
mod time_test;
