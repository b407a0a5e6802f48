use serde::Deserialize;
use std::path::Path;

use crate::core::IndicatorSpec;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub census: CensusConfig,
    pub points: PointsConfig,
    pub ui: UiConfig,
    pub database: DatabaseConfig,
    /// Replaces the built-in catalog when non-empty.
    pub indicators: Vec<IndicatorSpec>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CensusConfig {
    pub base_url: String,
    pub year: u16,
    pub dataset: String,
    /// Variable whose rows define the state universe for the scaffold table.
    pub scaffold_variable: String,
    pub excluded_region_codes: Vec<String>,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PointsConfig {
    pub default_max: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub table_round: usize,
    pub color_scale: String,
    pub restore_last_code: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub cache_ttl_hours: i64,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.census.gov/data".into(),
            year: 2023,
            dataset: "acs/acs1/subject".into(),
            scaffold_variable: "S1501_C02_015E".into(),
            // District of Columbia, Puerto Rico
            excluded_region_codes: vec!["11".into(), "72".into()],
            timeout_secs: 15,
            api_key: None,
        }
    }
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            default_max: 100,
            limit: 1000,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            table_round: 2,
            color_scale: "reds".into(),
            restore_last_code: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/statescore.db".into(),
            cache_ttl_hours: 24,
        }
    }
}

impl CensusConfig {
    /// Key under which fetched rows are cached, so a year or dataset change never reuses old rows.
    pub fn dataset_key(&self) -> String {
        format!("{}/{}", self.year, self.dataset)
    }
}

impl Config {
    /// Load config from a TOML file. Falls back to defaults if file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    tracing::info!("Config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Configured indicators, or the built-in catalog when none are listed.
    pub fn indicator_specs(&self) -> Vec<IndicatorSpec> {
        if self.indicators.is_empty() {
            crate::core::catalog::default_indicators()
        } else {
            self.indicators.clone()
        }
    }
}
