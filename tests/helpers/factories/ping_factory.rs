use std::collections::BTreeMap;

use crate::engine::ping::{Ping, SearchCounter};
use crate::engine::schema::ping_schema::{CLIENT_ID, SUBSESSION_START_DATE};
use crate::engine::types::ScalarValue;
use crate::shared::time::TimeParser;

/// Builds decoded pings directly, bypassing the JSON decoder.
pub struct PingFactory {
    client_id: String,
    start: String,
    search_counts: Option<Vec<SearchCounter>>,
    fields: BTreeMap<String, ScalarValue>,
}

impl PingFactory {
    pub fn new() -> Self {
        Self {
            client_id: "client-1".to_string(),
            start: "2017-05-25T10:00:00Z".to_string(),
            search_counts: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn client(mut self, client_id: &str) -> Self {
        self.client_id = client_id.to_string();
        self
    }

    /// RFC 3339 instant of `subsession_start_date`.
    pub fn starting_at(mut self, start: &str) -> Self {
        self.start = start.to_string();
        self
    }

    pub fn with(mut self, column: &str, value: ScalarValue) -> Self {
        self.fields.insert(column.to_string(), value);
        self
    }

    pub fn with_int(self, column: &str, value: i64) -> Self {
        self.with(column, ScalarValue::Int64(value))
    }

    pub fn with_bool(self, column: &str, value: bool) -> Self {
        self.with(column, ScalarValue::Boolean(value))
    }

    pub fn with_null(self, column: &str) -> Self {
        self.with(column, ScalarValue::Null)
    }

    pub fn with_timestamp(self, column: &str, rfc3339: &str) -> Self {
        let (ts, offset) = TimeParser::parse_str_to_instant(rfc3339).expect("valid timestamp");
        self.with(column, ScalarValue::Timestamp(ts, offset))
    }

    pub fn with_search(mut self, engine: &str, source: &str, count: Option<i64>) -> Self {
        self.search_counts
            .get_or_insert_with(Vec::new)
            .push(SearchCounter {
                engine: Some(engine.to_string()),
                source: Some(source.to_string()),
                count,
            });
        self
    }

    pub fn create(self) -> Ping {
        let (subsession_start, subsession_offset) =
            TimeParser::parse_str_to_instant(&self.start).expect("valid start timestamp");
        let mut fields = self.fields;
        fields.insert(CLIENT_ID.to_string(), ScalarValue::Utf8(self.client_id.clone()));
        fields.insert(
            SUBSESSION_START_DATE.to_string(),
            ScalarValue::Timestamp(subsession_start, subsession_offset),
        );
        Ping {
            client_id: self.client_id,
            subsession_start,
            subsession_offset,
            search_counts: self.search_counts,
            fields,
        }
    }
}
