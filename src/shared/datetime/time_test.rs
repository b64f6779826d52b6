use super::time::TimeConfig;
use super::timezone::TimezoneContract;
use chrono::FixedOffset;

#[test]
fn default_config_is_utc() {
    let config = TimeConfig::default();
    assert_eq!(config.timezone, None);
    assert_eq!(config.contract(), Ok(TimezoneContract::Utc));
}

#[test]
fn configured_offset_resolves_to_fixed_contract() {
    let config = TimeConfig {
        timezone: Some("-07:00".to_string()),
    };
    assert_eq!(
        config.contract(),
        Ok(TimezoneContract::Fixed(
            FixedOffset::west_opt(7 * 3600).unwrap()
        ))
    );
}

#[test]
fn bad_timezone_is_reported() {
    let config = TimeConfig {
        timezone: Some("Mars/Olympus_Mons".to_string()),
    };
    assert!(config.contract().is_err());
}

#[test]
fn recorded_resolves_to_recorded_contract() {
    let config = TimeConfig {
        timezone: Some("recorded".to_string()),
    };
    assert_eq!(config.contract(), Ok(TimezoneContract::Recorded));
}
