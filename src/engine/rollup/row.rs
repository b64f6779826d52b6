use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::types::ScalarValue;

pub const SESSIONS_STARTED_ON_THIS_DAY: &str = "sessions_started_on_this_day";

/// One output row per (client_id, activity_date).
///
/// `columns` holds every registry-derived value in registry order, except
/// `profile_creation_date`, which is lifted into its typed field once the
/// day-count has been resolved to a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDayAggregate {
    pub client_id: String,
    pub activity_date: NaiveDate,
    #[serde(flatten)]
    pub columns: IndexMap<String, ScalarValue>,
    pub pings_aggregated_by_this_row: u64,
    pub profile_creation_date: Option<NaiveDate>,
    pub profile_age_in_days: Option<i64>,
}

impl ClientDayAggregate {
    pub fn column(&self, name: &str) -> Option<&ScalarValue> {
        self.columns.get(name)
    }

    pub fn sessions_started_on_this_day(&self) -> Option<i64> {
        self.column(SESSIONS_STARTED_ON_THIS_DAY)
            .and_then(ScalarValue::as_i64)
    }
}
