use crate::engine::ping::model::{Ping, SearchCounter};
use crate::engine::schema::ping_schema::SEARCH_COUNT_ALL;
use crate::engine::types::ScalarValue;

/// Derives `search_count_all` from the nested per-engine search counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCountExtractor {
    non_search_prefixes: Vec<String>,
}

impl Default for SearchCountExtractor {
    fn default() -> Self {
        Self::new(vec!["ad-click".to_string(), "search-with-ads".to_string()])
    }
}

impl SearchCountExtractor {
    /// Counters whose `source` starts with one of `non_search_prefixes`
    /// record ad impressions or clicks rather than searches.
    pub fn new(non_search_prefixes: Vec<String>) -> Self {
        Self {
            non_search_prefixes,
        }
    }

    fn is_search(&self, counter: &SearchCounter) -> bool {
        match &counter.source {
            Some(source) => !self
                .non_search_prefixes
                .iter()
                .any(|prefix| source.starts_with(prefix.as_str())),
            None => true,
        }
    }

    /// Total performed searches; missing collections and null or negative
    /// counts contribute nothing.
    pub fn search_count_all(&self, counters: Option<&[SearchCounter]>) -> i64 {
        counters
            .unwrap_or_default()
            .iter()
            .filter(|c| self.is_search(c))
            .filter_map(|c| c.count)
            .filter(|count| *count > 0)
            .fold(0i64, |acc, count| acc.saturating_add(count))
    }

    /// Adds the derived column, leaving every original field untouched.
    pub fn apply(&self, mut ping: Ping) -> Ping {
        let total = self.search_count_all(ping.search_counts.as_deref());
        ping.set(SEARCH_COUNT_ALL, ScalarValue::Int64(total));
        ping
    }
}
