use serde::Deserialize;

use crate::engine::rollup::profile_age::NegativeAgePolicy;
use crate::shared::datetime::TimeConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rollup: RollupConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub time: Option<TimeConfig>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RollupConfig {
    /// Worker threads for group aggregation (0 = one per core)
    #[serde(default)]
    pub worker_threads: usize,
    /// What to emit when a profile was created after the activity date
    #[serde(default)]
    pub negative_profile_age: NegativeAgePolicy,
    /// Optional TOML schema descriptor; the built-in main-summary schema otherwise
    pub schema_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// `search_counts` sources starting with one of these are not searches
    #[serde(default = "default_non_search_source_prefixes")]
    pub non_search_source_prefixes: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            non_search_source_prefixes: default_non_search_source_prefixes(),
        }
    }
}

pub fn default_non_search_source_prefixes() -> Vec<String> {
    vec!["ad-click".to_string(), "search-with-ads".to_string()]
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path =
        env::var("CLIENTS_DAILY_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path))
        .add_source(config::Environment::with_prefix("CLIENTS_DAILY").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
