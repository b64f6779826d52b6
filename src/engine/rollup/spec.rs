use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::engine::schema::ping_schema::{
    PROFILE_CREATION_DATE, SEARCH_COUNT_ALL, SESSION_START_DATE,
};
use crate::engine::schema::{PingSchema, SchemaError};
use crate::engine::types::LogicalType;

/// Output columns owned by the rollup itself; registry entries may not use them.
pub const RESERVED_OUTPUT_COLUMNS: [&str; 4] = [
    "client_id",
    "activity_date",
    "pings_aggregated_by_this_row",
    "profile_age_in_days",
];

/// Which pings a `count` entry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountPredicate {
    /// Source column is non-null
    NonNull,
    /// Source timestamp falls on the group's activity date
    OnActivityDate,
}

/// Reduction applied to one source column over a client-day group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggKind {
    Sum,
    Mean,
    Max,
    FirstSkipNull,
    Count(CountPredicate),
}

impl AggKind {
    pub fn name(&self) -> &'static str {
        match self {
            AggKind::Sum => "sum",
            AggKind::Mean => "mean",
            AggKind::Max => "max",
            AggKind::FirstSkipNull => "first",
            AggKind::Count(CountPredicate::NonNull) => "count",
            AggKind::Count(CountPredicate::OnActivityDate) => "count on activity date",
        }
    }

    /// Whether this kind can reduce a column of the given scalar type.
    pub fn accepts(&self, ty: LogicalType) -> bool {
        match self {
            AggKind::Sum | AggKind::Mean => ty.is_numeric(),
            AggKind::Max => ty != LogicalType::Null,
            AggKind::FirstSkipNull | AggKind::Count(CountPredicate::NonNull) => true,
            AggKind::Count(CountPredicate::OnActivityDate) => ty == LogicalType::Timestamp,
        }
    }
}

/// One registry entry: `output` is computed by applying `kind` to `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub output: String,
    pub source: String,
    pub kind: AggKind,
}

/// Declarative mapping from output column to (source column, aggregation).
///
/// Adding a rollup column is adding an entry; evaluation is a single
/// dispatch over `AggKind`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRegistry {
    specs: Vec<ColumnSpec>,
}

static CLIENTS_DAILY: Lazy<AggregationRegistry> = Lazy::new(|| {
    clients_daily_builder()
        .build()
        .expect("clients daily registry must be well-formed")
});

impl AggregationRegistry {
    pub fn builder() -> AggregationRegistryBuilder {
        AggregationRegistryBuilder { specs: Vec::new() }
    }

    /// The shared clients-daily column set.
    pub fn clients_daily() -> &'static AggregationRegistry {
        &CLIENTS_DAILY
    }

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, output: &str) -> Option<&ColumnSpec> {
        self.specs.iter().find(|s| s.output == output)
    }

    /// Check every entry against the input schema. Any failure is fatal for
    /// the batch: the registry cannot be evaluated against that shape.
    pub fn validate_against(&self, schema: &PingSchema) -> Result<(), SchemaError> {
        for spec in &self.specs {
            let ty = schema
                .effective_field_type(&spec.source)
                .ok_or_else(|| SchemaError::MissingColumn(spec.source.clone()))?;
            let accepted = ty
                .logical_type()
                .map(|lt| spec.kind.accepts(lt))
                .unwrap_or(false);
            if !accepted {
                return Err(SchemaError::TypeMismatch {
                    column: spec.source.clone(),
                    expected: format!("a type supported by {}", spec.kind.name()),
                    found: ty.type_name(),
                });
            }
        }
        Ok(())
    }
}

pub struct AggregationRegistryBuilder {
    specs: Vec<ColumnSpec>,
}

impl AggregationRegistryBuilder {
    pub fn entry(mut self, output: &str, source: &str, kind: AggKind) -> Self {
        self.specs.push(ColumnSpec {
            output: output.to_string(),
            source: source.to_string(),
            kind,
        });
        self
    }

    /// `first-skip-null`, output keeps the source name.
    pub fn first(self, source: &str) -> Self {
        self.entry(source, source, AggKind::FirstSkipNull)
    }

    pub fn sum(self, source: &str) -> Self {
        self.entry(&format!("{}_sum", source), source, AggKind::Sum)
    }

    pub fn mean(self, source: &str) -> Self {
        self.entry(&format!("{}_mean", source), source, AggKind::Mean)
    }

    pub fn max(self, source: &str) -> Self {
        self.entry(&format!("{}_max", source), source, AggKind::Max)
    }

    pub fn count(self, output: &str, source: &str, predicate: CountPredicate) -> Self {
        self.entry(output, source, AggKind::Count(predicate))
    }

    pub fn build(self) -> Result<AggregationRegistry, SchemaError> {
        {
            let mut seen = HashSet::with_capacity(self.specs.len());
            for spec in &self.specs {
                if RESERVED_OUTPUT_COLUMNS.contains(&spec.output.as_str()) {
                    return Err(SchemaError::ReservedColumn(spec.output.clone()));
                }
                if !seen.insert(spec.output.as_str()) {
                    return Err(SchemaError::DuplicateOutputColumn(spec.output.clone()));
                }
            }
        }
        Ok(AggregationRegistry { specs: self.specs })
    }
}

fn clients_daily_builder() -> AggregationRegistryBuilder {
    let mut builder = AggregationRegistry::builder();
    for column in [
        "app_build_id",
        "app_display_version",
        "app_name",
        "app_version",
        "channel",
        "city",
        "country",
        "default_search_engine",
        "distribution_id",
        "e10s_enabled",
        "env_build_arch",
        "is_default_browser",
        "locale",
        "normalized_channel",
        "os",
        "os_version",
        PROFILE_CREATION_DATE,
        "sample_id",
        "sync_configured",
        "sync_count_desktop",
        "sync_count_mobile",
        "timezone_offset",
        "update_channel",
        "update_enabled",
    ] {
        builder = builder.first(column);
    }
    for column in [
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
        SEARCH_COUNT_ALL,
        "scalar_parent_browser_engagement_tab_open_event_count",
        "scalar_parent_browser_engagement_total_uri_count",
        "scalar_parent_browser_engagement_window_open_event_count",
        "subsession_length",
        "web_notification_shown",
    ] {
        builder = builder.sum(column);
    }
    for column in [
        "active_addons_count",
        "first_paint",
        "places_bookmarks_count",
        "places_pages_count",
        "scalar_parent_browser_engagement_unique_domains_count",
    ] {
        builder = builder.mean(column);
    }
    for column in [
        "scalar_parent_browser_engagement_max_concurrent_tab_count",
        "scalar_parent_browser_engagement_max_concurrent_window_count",
        "scalar_parent_browser_engagement_unique_domains_count",
    ] {
        builder = builder.max(column);
    }
    builder.count(
        "sessions_started_on_this_day",
        SESSION_START_DATE,
        CountPredicate::OnActivityDate,
    )
}
