use std::path::Path;

use rayon::prelude::*;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::engine::errors::{DecodeError, RollupError};
use crate::engine::ping::{PingDecoder, SearchCountExtractor};
use crate::engine::rollup::dedup::dedup;
use crate::engine::rollup::engine::GroupAggregator;
use crate::engine::rollup::group_key::partition;
use crate::engine::rollup::profile_age::{NegativeAgePolicy, ProfileAgeCalculator};
use crate::engine::rollup::row::ClientDayAggregate;
use crate::engine::rollup::spec::AggregationRegistry;
use crate::engine::schema::PingSchema;
use crate::shared::config::Settings;
use crate::shared::datetime::TimezoneContract;

/// Row accounting for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub input_rows: usize,
    /// Malformed rows and rows whose activity date is unrepresentable
    pub dropped_rows: usize,
    pub duplicate_rows: usize,
    pub groups: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RollupOutput {
    /// Sorted by (client_id, activity_date)
    pub rows: Vec<ClientDayAggregate>,
    pub stats: BatchStats,
}

/// A configured clients-daily rollup over one batch of pings.
///
/// The job is immutable once built; `run` can be called repeatedly and
/// produces identical output for identical input.
#[derive(Debug, Clone)]
pub struct RollupJob {
    schema: PingSchema,
    registry: AggregationRegistry,
    contract: TimezoneContract,
    negative_age: NegativeAgePolicy,
    extractor: SearchCountExtractor,
    worker_threads: usize,
}

impl RollupJob {
    pub fn new(schema: PingSchema) -> Self {
        Self {
            schema,
            registry: AggregationRegistry::clients_daily().clone(),
            contract: TimezoneContract::Utc,
            negative_age: NegativeAgePolicy::default(),
            extractor: SearchCountExtractor::default(),
            worker_threads: 0,
        }
    }

    /// Builds a job from loaded settings: schema descriptor, timezone
    /// contract, search-source filter, age policy and pool size.
    pub fn from_settings(settings: &Settings) -> Result<Self, RollupError> {
        let schema = match &settings.rollup.schema_path {
            Some(path) => PingSchema::from_toml_file(Path::new(path))?,
            None => PingSchema::main_summary(),
        };
        let contract = match &settings.time {
            Some(time) => time.contract().map_err(RollupError::Config)?,
            None => TimezoneContract::Utc,
        };
        let extractor =
            SearchCountExtractor::new(settings.search.non_search_source_prefixes.clone());

        Ok(Self::new(schema)
            .with_timezone(contract)
            .with_negative_age_policy(settings.rollup.negative_profile_age)
            .with_extractor(extractor)
            .with_worker_threads(settings.rollup.worker_threads))
    }

    pub fn with_schema(mut self, schema: PingSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_registry(mut self, registry: AggregationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_timezone(mut self, contract: TimezoneContract) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_negative_age_policy(mut self, policy: NegativeAgePolicy) -> Self {
        self.negative_age = policy;
        self
    }

    pub fn with_extractor(mut self, extractor: SearchCountExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// 0 lets rayon pick one thread per core.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn schema(&self) -> &PingSchema {
        &self.schema
    }

    pub fn timezone(&self) -> TimezoneContract {
        self.contract
    }

    pub fn run<I>(&self, records: I) -> Result<RollupOutput, RollupError>
    where
        I: IntoIterator<Item = JsonValue>,
    {
        self.registry.validate_against(&self.schema)?;

        let mut stats = BatchStats::default();
        let decoder = PingDecoder::new(&self.schema);
        let mut pings = Vec::new();
        for (line, raw) in records.into_iter().enumerate() {
            stats.input_rows += 1;
            match decoder.decode(&raw) {
                Ok(ping) => pings.push(self.extractor.apply(ping)),
                Err(DecodeError::Rejected(reason)) => {
                    stats.dropped_rows += 1;
                    debug!(target: "clients_daily::pipeline", row = line, %reason, "Dropping malformed row");
                }
                Err(DecodeError::Schema(e)) => return Err(RollupError::Schema(e)),
            }
        }

        let unique = dedup(pings)?;
        stats.duplicate_rows = unique.duplicates;

        let partitioned = partition(unique.pings, &self.contract);
        if partitioned.undated > 0 {
            warn!(
                target: "clients_daily::pipeline",
                count = partitioned.undated,
                "Dropping pings whose start has no calendar date"
            );
            stats.dropped_rows += partitioned.undated;
        }
        stats.groups = partitioned.groups.len();
        info!(
            target: "clients_daily::pipeline",
            input = stats.input_rows,
            dropped = stats.dropped_rows,
            duplicates = stats.duplicate_rows,
            groups = stats.groups,
            timezone = %self.contract,
            "Partitioned batch into client-day groups"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_threads)
            .build()
            .map_err(|e| RollupError::WorkerPool(e.to_string()))?;

        let aggregator = GroupAggregator::new(&self.registry, self.contract);
        let ages = ProfileAgeCalculator::new(self.contract, self.negative_age);
        let mut rows: Vec<ClientDayAggregate> = pool.install(|| {
            partitioned
                .groups
                .into_par_iter()
                .map(|group| {
                    let mut row = aggregator.aggregate(group);
                    ages.apply(&mut row);
                    row
                })
                .collect()
        });
        rows.sort_by(|a, b| {
            (a.client_id.as_str(), a.activity_date).cmp(&(b.client_id.as_str(), b.activity_date))
        });

        info!(
            target: "clients_daily::pipeline",
            rows = rows.len(),
            "Aggregated client-day rows"
        );
        Ok(RollupOutput { rows, stats })
    }
}
