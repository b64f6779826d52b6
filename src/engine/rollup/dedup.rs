use std::collections::HashSet;
use std::sync::Arc;

use ahash::RandomState;

use crate::engine::ping::Ping;

/// A ping that survived exact-duplicate removal, tagged with its canonical
/// fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct UniquePing {
    pub fingerprint: Arc<str>,
    pub ping: Ping,
}

impl UniquePing {
    pub fn new(ping: Ping) -> Result<Self, serde_json::Error> {
        let fingerprint: Arc<str> = Arc::from(ping.fingerprint()?);
        Ok(Self { fingerprint, ping })
    }

    /// Total order inside a group: subsession start, then fingerprint.
    pub fn order_key(&self) -> (i64, &str) {
        (self.ping.subsession_start, &self.fingerprint)
    }
}

#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub pings: Vec<UniquePing>,
    pub duplicates: usize,
}

/// Removes exact duplicates, keeping the first occurrence of each record.
/// Pings that differ in any field are kept.
pub fn dedup(pings: Vec<Ping>) -> Result<DedupOutcome, serde_json::Error> {
    let mut seen: HashSet<Arc<str>, RandomState> =
        HashSet::with_capacity_and_hasher(pings.len(), RandomState::new());
    let mut outcome = DedupOutcome {
        pings: Vec::with_capacity(pings.len()),
        duplicates: 0,
    };

    for ping in pings {
        let unique = UniquePing::new(ping)?;
        if seen.insert(Arc::clone(&unique.fingerprint)) {
            outcome.pings.push(unique);
        } else {
            outcome.duplicates += 1;
        }
    }
    Ok(outcome)
}
