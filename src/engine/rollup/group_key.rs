use std::collections::HashMap;

use ahash::RandomState as AHashRandomState;
use chrono::NaiveDate;

use crate::engine::rollup::dedup::UniquePing;
use crate::shared::datetime::TimezoneContract;

/// Identity of one output row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientDayKey {
    pub client_id: String,
    pub activity_date: NaiveDate,
}

impl ClientDayKey {
    /// Key for a ping under the given timezone contract. `None` when the
    /// subsession start has no representable calendar date.
    pub fn of(ping: &UniquePing, contract: &TimezoneContract) -> Option<Self> {
        let activity_date =
            contract.date_of_recorded(ping.ping.subsession_start, ping.ping.subsession_offset)?;
        Some(Self {
            client_id: ping.ping.client_id.clone(),
            activity_date,
        })
    }
}

/// Pings of one client-day, sorted by `UniquePing::order_key`.
#[derive(Debug, Clone)]
pub struct ClientDayGroup {
    pub key: ClientDayKey,
    pub pings: Vec<UniquePing>,
}

#[derive(Debug, Default)]
pub struct Partitioned {
    pub groups: Vec<ClientDayGroup>,
    /// Pings whose start date could not be turned into a calendar date
    pub undated: usize,
}

/// Partitions pings by (client_id, activity_date). Groups come back in key
/// order so the result does not depend on input order.
pub fn partition(pings: Vec<UniquePing>, contract: &TimezoneContract) -> Partitioned {
    let mut by_key: HashMap<ClientDayKey, Vec<UniquePing>, AHashRandomState> =
        HashMap::with_hasher(AHashRandomState::new());
    let mut undated = 0usize;

    for ping in pings {
        match ClientDayKey::of(&ping, contract) {
            Some(key) => by_key.entry(key).or_default().push(ping),
            None => undated += 1,
        }
    }

    let mut groups: Vec<ClientDayGroup> = by_key
        .into_iter()
        .map(|(key, mut pings)| {
            pings.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
            ClientDayGroup { key, pings }
        })
        .collect();
    groups.sort_by(|a, b| a.key.cmp(&b.key));

    Partitioned { groups, undated }
}
