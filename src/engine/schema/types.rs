use serde::{Deserialize, Serialize};

use crate::engine::types::LogicalType;

/// Column type as declared by the external ping schema.
/// - Accepts common aliases (e.g., int)
/// - Nullable via `Optional(T)` (e.g., "string | null")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    I64,
    F64,
    Bool,
    Timestamp,
    /// List of `{engine, source, count}` search counters
    SearchCounts,
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Parse one primitive/alias (e.g., "int" -> I64, "number" -> F64).
    pub fn from_primitive_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" | "text" | "varchar" => Some(FieldType::String),
            "i64" | "int64" | "int" | "integer" | "long" => Some(FieldType::I64),
            "f64" | "float" | "double" | "number" => Some(FieldType::F64),
            "bool" | "boolean" => Some(FieldType::Bool),
            "datetime" | "timestamp" => Some(FieldType::Timestamp),
            "search_counts" => Some(FieldType::SearchCounts),
            _ => None,
        }
    }

    /// Parse `T | null` into `Optional(T)`.
    pub fn from_spec_with_nullable(s: &str) -> Option<Self> {
        if s.contains('|') {
            let parts: Vec<&str> = s.split('|').map(str::trim).collect();
            let has_null = parts.iter().any(|p| p.eq_ignore_ascii_case("null"));
            let non_null = parts.iter().find(|p| !p.eq_ignore_ascii_case("null"))?;
            let base = FieldType::from_primitive_str(non_null)?;
            if has_null {
                Some(FieldType::Optional(Box::new(base)))
            } else {
                Some(base)
            }
        } else {
            FieldType::from_primitive_str(s)
        }
    }

    /// The non-nullable type underneath any `Optional` wrapping.
    pub fn base(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    /// Scalar type carried by the column, `None` for nested collections.
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self.base() {
            FieldType::String => Some(LogicalType::String),
            FieldType::I64 => Some(LogicalType::Integer),
            FieldType::F64 => Some(LogicalType::Float),
            FieldType::Bool => Some(LogicalType::Boolean),
            FieldType::Timestamp => Some(LogicalType::Timestamp),
            FieldType::SearchCounts | FieldType::Optional(_) => None,
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::I64 => "int".to_string(),
            FieldType::F64 => "float".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::Timestamp => "timestamp".to_string(),
            FieldType::SearchCounts => "search_counts".to_string(),
            FieldType::Optional(inner) => format!("{} | null", inner.type_name()),
        }
    }
}
