use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::engine::types::ScalarValue;

static NULL: ScalarValue = ScalarValue::Null;

/// One entry of the nested `search_counts` collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCounter {
    pub engine: Option<String>,
    pub source: Option<String>,
    pub count: Option<i64>,
}

/// A decoded telemetry ping.
///
/// `fields` holds every scalar column declared by the schema, keys included,
/// with absent values stored as `Null`. The key columns are also kept typed
/// for grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub client_id: String,
    /// Epoch seconds
    pub subsession_start: i64,
    /// Offset `subsession_start_date` was written with, seconds east of UTC
    pub subsession_offset: i32,
    pub search_counts: Option<Vec<SearchCounter>>,
    pub fields: BTreeMap<String, ScalarValue>,
}

impl Ping {
    pub fn get(&self, column: &str) -> &ScalarValue {
        self.fields.get(column).unwrap_or(&NULL)
    }

    pub fn set(&mut self, column: &str, value: ScalarValue) {
        self.fields.insert(column.to_string(), value);
    }

    /// Canonical encoding of the full record; equal fingerprints mean the
    /// pings are exact duplicates.
    ///
    /// Timestamps take part as decoded: whole epoch seconds together with the
    /// written offset. Timestamps that differ only below one second make the
    /// same ping; the same instant written at different offsets does not.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&FingerprintView {
            search_counts: &self.search_counts,
            fields: &self.fields,
        })
    }
}

#[derive(Serialize)]
struct FingerprintView<'a> {
    search_counts: &'a Option<Vec<SearchCounter>>,
    #[serde(serialize_with = "serialize_fields")]
    fields: &'a BTreeMap<String, ScalarValue>,
}

fn serialize_fields<S>(
    fields: &&BTreeMap<String, ScalarValue>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (column, value) in fields.iter() {
        match value {
            ScalarValue::Timestamp(secs, offset) => map.serialize_entry(column, &(secs, offset))?,
            other => map.serialize_entry(column, other)?,
        }
    }
    map.end()
}
