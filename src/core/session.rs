use thiserror::Error;

use super::registry::IndicatorRegistry;
use super::{IndicatorSpec, MAX_WEIGHT};
use crate::code::{self, CodeError};
use crate::config::Config;

/// Upper bound on table rounding.
pub const MAX_TABLE_ROUND: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("max points {requested} must be between current usage {used} and {limit}")]
    MaxPointsOutOfRange { requested: u32, used: u32, limit: u32 },
    #[error("cannot drop the override while {used} points are in use (default maximum {default_max})")]
    OverrideLocked { used: u32, default_max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsSummary {
    pub max: u32,
    pub used: u32,
    /// Negative after restoring a code that spends more than the budget.
    pub left: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub default_max_points: u32,
    pub points_limit: u32,
    pub max_points_override: Option<u32>,
    pub table_round: usize,
    pub color_scale: String,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_max_points: config.points.default_max,
            points_limit: config.points.limit,
            max_points_override: None,
            table_round: config.ui.table_round.min(MAX_TABLE_ROUND),
            color_scale: config.ui.color_scale.clone(),
        }
    }
}

/// One user's indicator weights and display settings. Owned by the UI, passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub registry: IndicatorRegistry,
    pub settings: SessionSettings,
}

impl Session {
    pub fn new(specs: impl IntoIterator<Item = IndicatorSpec>, settings: SessionSettings) -> Self {
        Self {
            registry: IndicatorRegistry::from_specs(specs),
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.indicator_specs(), SessionSettings::from_config(config))
    }

    /// Idempotent registration; returns the weight carried over from an earlier registration.
    pub fn register(&mut self, spec: IndicatorSpec) -> Option<u32> {
        self.registry.upsert(spec)
    }

    pub fn max_points(&self) -> u32 {
        self.settings
            .max_points_override
            .unwrap_or(self.settings.default_max_points)
    }

    pub fn points_summary(&self) -> PointsSummary {
        let max = self.max_points();
        let used = self.registry.used_points();
        PointsSummary {
            max,
            used,
            left: i64::from(max) - i64::from(used),
        }
    }

    /// Highest value the input for `source_id` may take: its weight plus the points left.
    /// Never below the current weight, so an over-budget indicator can still be lowered.
    pub fn input_bound(&self, source_id: &str) -> u32 {
        let Some(indicator) = self.registry.get(source_id) else {
            return 0;
        };
        let bound = i64::from(indicator.weight) + self.points_summary().left.max(0);
        bound.clamp(0, i64::from(MAX_WEIGHT)) as u32
    }

    /// Set a weight, clamped to the input bound. Returns the weight actually stored.
    pub fn set_weight(&mut self, source_id: &str, weight: u32) -> Option<u32> {
        let bounded = weight.min(self.input_bound(source_id));
        self.registry.set_weight(source_id, bounded)?;
        Some(bounded)
    }

    pub fn weights(&self) -> Vec<u32> {
        self.registry.weights()
    }

    pub fn current_code(&self) -> Result<String, CodeError> {
        code::encode(&self.weights())
    }

    /// Restore weights from a code. Blank input is ignored; on error nothing changes.
    pub fn apply_code(&mut self, input: &str) -> Result<(), CodeError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }
        let weights = code::decode(input)?;
        self.registry.apply_weights(&weights)?;
        tracing::info!("Applied code {input} ({} weights)", weights.len());
        Ok(())
    }

    /// Enable (`Some`) or disable (`None`) the max-points override.
    pub fn set_max_points_override(&mut self, value: Option<u32>) -> Result<(), SettingsError> {
        let used = self.registry.used_points();
        match value {
            Some(requested) => {
                let limit = self.settings.points_limit;
                if requested < used || requested > limit {
                    return Err(SettingsError::MaxPointsOutOfRange {
                        requested,
                        used,
                        limit,
                    });
                }
            }
            None => {
                let default_max = self.settings.default_max_points;
                if self.settings.max_points_override.is_some() && used > default_max {
                    return Err(SettingsError::OverrideLocked { used, default_max });
                }
            }
        }
        self.settings.max_points_override = value;
        Ok(())
    }

    pub fn set_table_round(&mut self, places: usize) {
        self.settings.table_round = places.min(MAX_TABLE_ROUND);
    }

    pub fn set_color_scale(&mut self, name: &str) {
        self.settings.color_scale = name.trim().to_string();
    }
}
