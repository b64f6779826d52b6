pub mod decoder;
pub mod model;
pub mod search_counts;

pub use decoder::PingDecoder;
pub use model::{Ping, SearchCounter};
pub use search_counts::SearchCountExtractor;

#[cfg(test)]
mod search_counts_test;
