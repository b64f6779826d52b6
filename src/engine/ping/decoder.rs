use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::engine::errors::{DecodeError, RowRejection};
use crate::engine::ping::model::{Ping, SearchCounter};
use crate::engine::schema::ping_schema::{CLIENT_ID, SEARCH_COUNTS, SUBSESSION_START_DATE};
use crate::engine::schema::{FieldType, PingSchema, SchemaError};
use crate::engine::types::ScalarValue;
use crate::shared::time::TimeParser;

/// Turns raw JSON rows into typed pings according to the injected schema.
///
/// Malformed rows come back as `DecodeError::Rejected` and are meant to be
/// dropped; a value contradicting the declared type is a schema violation.
pub struct PingDecoder<'a> {
    schema: &'a PingSchema,
}

impl<'a> PingDecoder<'a> {
    pub fn new(schema: &'a PingSchema) -> Self {
        Self { schema }
    }

    pub fn decode(&self, raw: &JsonValue) -> Result<Ping, DecodeError> {
        let obj = raw.as_object().ok_or(RowRejection::NotAnObject)?;

        let mut fields = BTreeMap::new();
        let mut search_counts = None;
        for (column, ty) in &self.schema.fields {
            let value = obj.get(column).unwrap_or(&JsonValue::Null);
            if column.as_str() == SEARCH_COUNTS {
                search_counts = decode_search_counts(column, value)?;
                continue;
            }
            fields.insert(column.clone(), decode_scalar(column, ty, value)?);
        }

        let client_id = match fields.get(CLIENT_ID) {
            Some(ScalarValue::Utf8(s)) if !s.is_empty() => s.clone(),
            _ => return Err(RowRejection::MissingClientId.into()),
        };
        let (subsession_start, subsession_offset) = match fields.get(SUBSESSION_START_DATE) {
            Some(ScalarValue::Timestamp(ts, offset)) => (*ts, *offset),
            _ => return Err(RowRejection::MissingStartDate.into()),
        };

        Ok(Ping {
            client_id,
            subsession_start,
            subsession_offset,
            search_counts,
            fields,
        })
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn mismatch(column: &str, ty: &FieldType, value: &JsonValue) -> DecodeError {
    SchemaError::ValueTypeMismatch {
        column: column.to_string(),
        expected: ty.type_name(),
        found: json_type_name(value).to_string(),
    }
    .into()
}

fn decode_scalar(
    column: &str,
    ty: &FieldType,
    value: &JsonValue,
) -> Result<ScalarValue, DecodeError> {
    if value.is_null() {
        return Ok(ScalarValue::Null);
    }
    let decoded = match (ty.base(), value) {
        (FieldType::String, JsonValue::String(s)) => ScalarValue::Utf8(s.clone()),
        (FieldType::Bool, JsonValue::Bool(b)) => ScalarValue::Boolean(*b),
        (FieldType::F64, JsonValue::Number(n)) => match n.as_f64() {
            Some(f) => ScalarValue::Float64(f),
            None => return Err(mismatch(column, ty, value)),
        },
        (FieldType::I64, JsonValue::Number(n)) => match integral(n) {
            Some(i) => ScalarValue::Int64(i),
            None => return Err(mismatch(column, ty, value)),
        },
        (FieldType::Timestamp, JsonValue::String(s)) => {
            match TimeParser::parse_str_to_instant(s) {
                Some((ts, offset)) => ScalarValue::Timestamp(ts, offset),
                None => return Err(invalid_timestamp(column, value)),
            }
        }
        (FieldType::Timestamp, JsonValue::Number(n)) => {
            match TimeParser::number_to_epoch_seconds(n) {
                Some(ts) => ScalarValue::Timestamp(ts, 0),
                None => return Err(invalid_timestamp(column, value)),
            }
        }
        _ => return Err(mismatch(column, ty, value)),
    };
    Ok(decoded)
}

/// Integers, including floats with no fractional part (JSON writers emit `3.0`).
fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn invalid_timestamp(column: &str, value: &JsonValue) -> DecodeError {
    RowRejection::InvalidTimestamp {
        column: column.to_string(),
        value: value.to_string(),
    }
    .into()
}

fn decode_search_counts(
    column: &str,
    value: &JsonValue,
) -> Result<Option<Vec<SearchCounter>>, DecodeError> {
    let entries = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Array(entries) => entries,
        other => return Err(mismatch(column, &FieldType::SearchCounts, other)),
    };

    let mut counters = Vec::with_capacity(entries.len());
    for entry in entries {
        let obj = match entry {
            JsonValue::Null => continue,
            JsonValue::Object(obj) => obj,
            other => return Err(mismatch(column, &FieldType::SearchCounts, other)),
        };
        let text = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(str::to_string);
        let count = match obj.get("count") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::Number(n)) => match integral(n) {
                Some(c) => Some(c),
                None => return Err(mismatch(column, &FieldType::SearchCounts, entry)),
            },
            Some(_) => return Err(mismatch(column, &FieldType::SearchCounts, entry)),
        };
        counters.push(SearchCounter {
            engine: text("engine"),
            source: text("source"),
            count,
        });
    }
    Ok(Some(counters))
}
