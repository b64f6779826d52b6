use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

const SECONDS_PER_DAY: i64 = 86_400;

/// How instants are turned into calendar dates.
///
/// Every instant-to-date conversion in a run (activity date, session start
/// date, profile creation date) goes through the same contract. The host
/// system's local timezone is never consulted.
///
/// `Recorded` reads each timestamp at the offset it was written with, so a
/// ping keeps the wall-clock date of the machine that sent it. Day counts
/// carry no offset and are read in UTC under that contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimezoneContract {
    #[default]
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
    Recorded,
}

impl TimezoneContract {
    /// Calendar date of an epoch-seconds instant. `None` when the local date
    /// falls outside chrono's range.
    pub fn date_of(&self, epoch_seconds: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?.naive_utc();
        let offset = match self {
            TimezoneContract::Utc | TimezoneContract::Recorded => return Some(utc.date()),
            TimezoneContract::Fixed(offset) => *offset,
            TimezoneContract::Named(tz) => tz.offset_from_utc_datetime(&utc).fix(),
        };
        shifted_date(utc, offset.local_minus_utc())
    }

    /// Calendar date of an instant that was written `offset` seconds east of
    /// UTC. Only `Recorded` looks at the offset.
    pub fn date_of_recorded(&self, epoch_seconds: i64, offset: i32) -> Option<NaiveDate> {
        match self {
            TimezoneContract::Recorded => {
                let utc = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?.naive_utc();
                shifted_date(utc, offset)
            }
            other => other.date_of(epoch_seconds),
        }
    }

    /// Calendar date of the instant `days` whole days after the UNIX epoch.
    pub fn date_of_day_count(&self, days: i64) -> Option<NaiveDate> {
        let secs = days.checked_mul(SECONDS_PER_DAY)?;
        self.date_of(secs)
    }
}

fn shifted_date(utc: NaiveDateTime, offset_seconds: i32) -> Option<NaiveDate> {
    utc.checked_add_signed(Duration::seconds(i64::from(offset_seconds)))
        .map(|local| local.date())
}

impl fmt::Display for TimezoneContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimezoneContract::Utc => f.write_str("UTC"),
            TimezoneContract::Fixed(offset) => write!(f, "{}", offset),
            TimezoneContract::Named(tz) => f.write_str(tz.name()),
            TimezoneContract::Recorded => f.write_str("recorded"),
        }
    }
}

impl FromStr for TimezoneContract {
    type Err = String;

    /// Accepts `UTC`/`Z`, `recorded`, a fixed offset `+HH:MM` / `-HH:MM`, or
    /// an IANA name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(TimezoneContract::Utc);
        }
        if s.eq_ignore_ascii_case("recorded") {
            return Ok(TimezoneContract::Recorded);
        }
        if s.starts_with('+') || s.starts_with('-') {
            return parse_fixed_offset(s).map(TimezoneContract::Fixed);
        }
        s.parse::<Tz>()
            .map(TimezoneContract::Named)
            .map_err(|e| format!("Unknown timezone '{}': {}", s, e))
    }
}

fn parse_fixed_offset(s: &str) -> Result<FixedOffset, String> {
    let invalid = || format!("Invalid fixed offset '{}', expected +HH:MM or -HH:MM", s);
    let (sign, rest) = s.split_at(1);
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(invalid());
    }
    let secs = hours * 3600 + minutes * 60;
    let secs = if sign == "-" { -secs } else { secs };
    FixedOffset::east_opt(secs).ok_or_else(invalid)
}
