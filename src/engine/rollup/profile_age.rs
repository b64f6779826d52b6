use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::engine::rollup::row::ClientDayAggregate;
use crate::engine::schema::ping_schema::PROFILE_CREATION_DATE;
use crate::engine::types::ScalarValue;
use crate::shared::datetime::TimezoneContract;

/// What `profile_age_in_days` holds when the profile was created after the
/// activity date.
///
/// `Null` (the default) keeps every output age either null or non-negative,
/// so a negative value never reaches consumers. `Keep` reports the plain
/// date difference, clock skew included, for consumers that want the raw
/// signal. Set it with `rollup.negative_profile_age`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeAgePolicy {
    #[default]
    Null,
    Keep,
}

/// Resolves the profile creation day-count and the profile age of a row,
/// using the same timezone contract that produced its activity date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileAgeCalculator {
    contract: TimezoneContract,
    policy: NegativeAgePolicy,
}

impl ProfileAgeCalculator {
    pub fn new(contract: TimezoneContract, policy: NegativeAgePolicy) -> Self {
        Self { contract, policy }
    }

    pub fn profile_creation_date(&self, day_count: Option<i64>) -> Option<NaiveDate> {
        let days = day_count?;
        let date = self.contract.date_of_day_count(days);
        if date.is_none() {
            warn!(
                target: "clients_daily::profile_age",
                days, "profile_creation_date out of representable range"
            );
        }
        date
    }

    pub fn profile_age_in_days(
        &self,
        activity_date: NaiveDate,
        creation_date: Option<NaiveDate>,
    ) -> Option<i64> {
        let age = (activity_date - creation_date?).num_days();
        match self.policy {
            NegativeAgePolicy::Keep => Some(age),
            NegativeAgePolicy::Null if age < 0 => None,
            NegativeAgePolicy::Null => Some(age),
        }
    }

    /// Moves the raw day-count out of the row's columns and fills the typed
    /// date and age fields.
    pub fn apply(&self, row: &mut ClientDayAggregate) {
        let day_count = row
            .columns
            .shift_remove(PROFILE_CREATION_DATE)
            .as_ref()
            .and_then(ScalarValue::as_i64);
        let creation_date = self.profile_creation_date(day_count);
        row.profile_creation_date = creation_date;
        row.profile_age_in_days = self.profile_age_in_days(row.activity_date, creation_date);
    }
}
