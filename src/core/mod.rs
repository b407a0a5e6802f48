pub mod aggregate;
pub mod catalog;
pub mod pipeline;
pub mod registry;
pub mod scale;
pub mod session;
pub mod states;

use serde::{Deserialize, Serialize};

/// Largest weight a single indicator can carry.
pub const MAX_WEIGHT: u32 = 1000;

/// Static description of one Census statistic, as registered by the UI or listed in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    /// Census variable, e.g. `S1501_C02_015E`.
    pub source_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub sort_key: String,
    #[serde(default)]
    pub default_weight: u32,
    /// When set, the lowest raw value earns the full weight.
    #[serde(default)]
    pub invert: bool,
}

fn default_category() -> String {
    "Other".to_string()
}

/// A registered indicator with the weight currently chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub spec: IndicatorSpec,
    pub weight: u32,
}

impl Indicator {
    pub fn source_id(&self) -> &str {
        &self.spec.source_id
    }

    /// Display name, falling back to the source id for unlabeled config entries.
    pub fn label(&self) -> &str {
        if self.spec.display_name.is_empty() {
            &self.spec.source_id
        } else {
            &self.spec.display_name
        }
    }
}

/// One upstream row after filtering: state name, raw statistic, region (FIPS) code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub name: String,
    pub value: f64,
    pub region_code: u32,
}

/// A state's raw statistic together with its normalized score for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    pub region_code: u32,
    pub stat: f64,
    pub score: f64,
}

/// Normalized scores for one indicator at one (weight, invert) setting.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub source_id: String,
    pub weight: u32,
    pub invert: bool,
    pub records: Vec<StateRecord>,
}

impl IndicatorTable {
    #[cfg(test)]
    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.records.iter().find(|r| r.name == name).map(|r| r.score)
    }
}

/// A state's combined score across all merged indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub name: String,
    pub region_code: u32,
    pub score: f64,
}

/// Combined per-state scores, kept sorted by score descending then name ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateTable {
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[cfg(test)]
    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.name == name).map(|r| r.score)
    }

    /// (min, max) score, or `None` for an empty table.
    pub fn score_bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.rows.iter().map(|r| r.score);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s))))
    }
}
