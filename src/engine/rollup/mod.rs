pub mod dedup;
pub mod engine;
pub mod group_key;
pub mod ops;
pub mod pipeline;
pub mod profile_age;
pub mod row;
pub mod sink;
pub mod spec;

pub use pipeline::{BatchStats, RollupJob, RollupOutput};
pub use profile_age::NegativeAgePolicy;
pub use row::ClientDayAggregate;
pub use spec::{AggKind, AggregationRegistry, ColumnSpec, CountPredicate};

#[cfg(test)]
mod group_key_test;
#[cfg(test)]
mod sink_test;
