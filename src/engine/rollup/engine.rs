use indexmap::IndexMap;

use crate::engine::rollup::dedup::UniquePing;
use crate::engine::rollup::group_key::{ClientDayGroup, ClientDayKey};
use crate::engine::rollup::ops::{AggregatorImpl, GroupContext};
use crate::engine::rollup::row::ClientDayAggregate;
use crate::engine::rollup::spec::AggregationRegistry;
use crate::shared::datetime::TimezoneContract;

/// Partial aggregation state of one client-day. States built over disjoint
/// subsets of a group merge into the state of the whole group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupState {
    aggs: Vec<AggregatorImpl>,
    pings: u64,
}

impl GroupState {
    pub fn merge(&mut self, other: &GroupState) {
        for (a, b) in self.aggs.iter_mut().zip(other.aggs.iter()) {
            a.merge(b);
        }
        self.pings += other.pings;
    }

    pub fn pings(&self) -> u64 {
        self.pings
    }
}

/// Evaluates every registry entry over a client-day group.
pub struct GroupAggregator<'a> {
    registry: &'a AggregationRegistry,
    contract: TimezoneContract,
}

impl<'a> GroupAggregator<'a> {
    pub fn new(registry: &'a AggregationRegistry, contract: TimezoneContract) -> Self {
        Self { registry, contract }
    }

    pub fn empty_state(&self) -> GroupState {
        GroupState {
            aggs: self
                .registry
                .specs()
                .iter()
                .map(AggregatorImpl::from_spec)
                .collect(),
            pings: 0,
        }
    }

    pub fn accumulate<'p, I>(&self, key: &ClientDayKey, pings: I) -> GroupState
    where
        I: IntoIterator<Item = &'p UniquePing>,
    {
        let ctx = GroupContext {
            activity_date: key.activity_date,
            contract: self.contract,
        };
        let mut state = self.empty_state();
        for ping in pings {
            for agg in state.aggs.iter_mut() {
                agg.update(ping, &ctx);
            }
            state.pings += 1;
        }
        state
    }

    /// Finalizes a state into its output row. Profile fields are left empty;
    /// `ProfileAgeCalculator::apply` fills them.
    pub fn finish(&self, key: ClientDayKey, state: GroupState) -> ClientDayAggregate {
        let mut columns = IndexMap::with_capacity(state.aggs.len());
        for (spec, agg) in self.registry.specs().iter().zip(state.aggs.iter()) {
            columns.insert(spec.output.clone(), agg.finalize());
        }
        ClientDayAggregate {
            client_id: key.client_id,
            activity_date: key.activity_date,
            columns,
            pings_aggregated_by_this_row: state.pings,
            profile_creation_date: None,
            profile_age_in_days: None,
        }
    }

    pub fn aggregate(&self, group: ClientDayGroup) -> ClientDayAggregate {
        let state = self.accumulate(&group.key, &group.pings);
        self.finish(group.key, state)
    }
}
