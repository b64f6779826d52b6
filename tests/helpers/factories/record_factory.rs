use serde_json::{Map, Value, json};

/// Builds raw JSON rows as they arrive from the input dataset.
pub struct RecordFactory {
    params: Map<String, Value>,
}

impl RecordFactory {
    pub fn new() -> Self {
        let mut params = Map::new();
        params.insert("client_id".into(), json!("client-1"));
        params.insert(
            "subsession_start_date".into(),
            json!("2017-05-25T10:00:00.0+00:00"),
        );
        Self { params }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }

    /// Appends one `{engine, source, count}` entry to `search_counts`.
    pub fn with_search(mut self, engine: &str, source: &str, count: i64) -> Self {
        let entry = json!({ "engine": engine, "source": source, "count": count });
        match self.params.get_mut("search_counts") {
            Some(Value::Array(entries)) => entries.push(entry),
            _ => {
                self.params
                    .insert("search_counts".into(), Value::Array(vec![entry]));
            }
        }
        self
    }

    pub fn create(self) -> Value {
        Value::Object(self.params)
    }
}
