use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::engine::schema::errors::SchemaError;
use crate::engine::schema::types::FieldType;

pub const CLIENT_ID: &str = "client_id";
pub const SUBSESSION_START_DATE: &str = "subsession_start_date";
pub const SESSION_START_DATE: &str = "session_start_date";
pub const PROFILE_CREATION_DATE: &str = "profile_creation_date";
pub const SEARCH_COUNTS: &str = "search_counts";
/// Derived by the search-count extractor, never read from input rows.
pub const SEARCH_COUNT_ALL: &str = "search_count_all";

/// Structural descriptor of the input ping dataset.
///
/// The schema is owned by whoever produces the dataset; the rollup only
/// checks that the columns it needs are present with usable types.
#[derive(Debug, Clone, PartialEq)]
pub struct PingSchema {
    pub fields: IndexMap<String, FieldType>,
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    fields: IndexMap<String, String>,
}

impl PingSchema {
    pub fn new(fields: IndexMap<String, FieldType>) -> Result<Self, SchemaError> {
        let schema = Self { fields };
        schema.validate_core()?;
        Ok(schema)
    }

    /// Parse a `[fields]` table of `name = "type"` pairs.
    pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(input)?;
        let mut fields = IndexMap::with_capacity(file.fields.len());
        for (column, type_name) in file.fields {
            let ty = FieldType::from_spec_with_nullable(&type_name).ok_or_else(|| {
                SchemaError::UnknownType {
                    column: column.clone(),
                    type_name: type_name.clone(),
                }
            })?;
            fields.insert(column, ty);
        }
        Self::new(fields)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn field_type(&self, column: &str) -> Option<&FieldType> {
        self.fields.get(column)
    }

    /// Type of a column as seen after extraction, including derived columns.
    pub fn effective_field_type(&self, column: &str) -> Option<FieldType> {
        if column == SEARCH_COUNT_ALL {
            return Some(FieldType::I64);
        }
        self.fields.get(column).cloned()
    }

    fn validate_core(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        self.expect_base(CLIENT_ID, FieldType::String, true)?;
        self.expect_base(SUBSESSION_START_DATE, FieldType::Timestamp, true)?;
        self.expect_base(SESSION_START_DATE, FieldType::Timestamp, false)?;
        self.expect_base(PROFILE_CREATION_DATE, FieldType::I64, false)?;
        self.expect_base(SEARCH_COUNTS, FieldType::SearchCounts, false)?;
        if self.fields.contains_key(SEARCH_COUNT_ALL) {
            return Err(SchemaError::ReservedColumn(SEARCH_COUNT_ALL.to_string()));
        }
        for (name, ty) in &self.fields {
            if name.as_str() != SEARCH_COUNTS && matches!(ty.base(), FieldType::SearchCounts) {
                return Err(SchemaError::TypeMismatch {
                    column: name.clone(),
                    expected: "a scalar type".to_string(),
                    found: ty.type_name(),
                });
            }
        }
        Ok(())
    }

    fn expect_base(
        &self,
        column: &str,
        expected: FieldType,
        required: bool,
    ) -> Result<(), SchemaError> {
        match self.fields.get(column) {
            None if required => Err(SchemaError::MissingColumn(column.to_string())),
            None => Ok(()),
            Some(ty) if *ty.base() == expected => Ok(()),
            Some(ty) => Err(SchemaError::TypeMismatch {
                column: column.to_string(),
                expected: expected.type_name(),
                found: ty.type_name(),
            }),
        }
    }

    /// Descriptor of the desktop main-summary dataset the default rollup reads.
    pub fn main_summary() -> Self {
        let nullable = |ty: FieldType| FieldType::Optional(Box::new(ty));
        let mut fields = IndexMap::new();
        fields.insert(CLIENT_ID.to_string(), FieldType::String);
        fields.insert(SUBSESSION_START_DATE.to_string(), FieldType::Timestamp);
        fields.insert(SESSION_START_DATE.to_string(), nullable(FieldType::Timestamp));
        fields.insert(PROFILE_CREATION_DATE.to_string(), nullable(FieldType::I64));
        fields.insert(SEARCH_COUNTS.to_string(), nullable(FieldType::SearchCounts));

        for name in [
            "app_build_id",
            "app_display_version",
            "app_name",
            "app_version",
            "channel",
            "city",
            "country",
            "default_search_engine",
            "distribution_id",
            "env_build_arch",
            "locale",
            "normalized_channel",
            "os",
            "os_version",
            "update_channel",
        ] {
            fields.insert(name.to_string(), nullable(FieldType::String));
        }
        for name in [
            "e10s_enabled",
            "is_default_browser",
            "sync_configured",
            "update_enabled",
        ] {
            fields.insert(name.to_string(), nullable(FieldType::Bool));
        }
        for name in [
            "sample_id",
            "sync_count_desktop",
            "sync_count_mobile",
            "timezone_offset",
            "aborts_content",
            "aborts_gmplugin",
            "aborts_plugin",
            "active_ticks",
            "crashes_detected_content",
            "crashes_detected_gmplugin",
            "crashes_detected_plugin",
            "crash_submit_attempt_content",
            "crash_submit_attempt_main",
            "crash_submit_success_main",
            "push_api_notify",
            "subsession_length",
            "web_notification_shown",
            "active_addons_count",
            "first_paint",
            "places_bookmarks_count",
            "places_pages_count",
            "scalar_parent_browser_engagement_tab_open_event_count",
            "scalar_parent_browser_engagement_total_uri_count",
            "scalar_parent_browser_engagement_window_open_event_count",
            "scalar_parent_browser_engagement_unique_domains_count",
            "scalar_parent_browser_engagement_max_concurrent_tab_count",
            "scalar_parent_browser_engagement_max_concurrent_window_count",
        ] {
            fields.insert(name.to_string(), nullable(FieldType::I64));
        }

        Self { fields }
    }
}
