use serde::{Deserialize, Serialize};

use super::timezone::TimezoneContract;

/// Global time configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Timezone contract for all date derivations (None = UTC)
    pub timezone: Option<String>,
}

impl TimeConfig {
    /// Resolve the configured timezone into a contract.
    pub fn contract(&self) -> Result<TimezoneContract, String> {
        match &self.timezone {
            None => Ok(TimezoneContract::Utc),
            Some(tz) => tz.parse(),
        }
    }
}
