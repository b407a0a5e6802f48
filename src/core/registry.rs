use std::collections::BTreeMap;

use super::{Indicator, IndicatorSpec, MAX_WEIGHT};
use crate::code::CodeError;

/// Indicators registered for one session, keyed by source id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorRegistry {
    indicators: BTreeMap<String, Indicator>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: impl IntoIterator<Item = IndicatorSpec>) -> Self {
        let mut registry = Self::new();
        for spec in specs {
            registry.upsert(spec);
        }
        registry
    }

    /// Insert or refresh an indicator. An existing entry keeps its current weight,
    /// which is returned; a new one starts at its default weight.
    pub fn upsert(&mut self, spec: IndicatorSpec) -> Option<u32> {
        match self.indicators.get_mut(&spec.source_id) {
            Some(existing) => {
                existing.spec = spec;
                Some(existing.weight)
            }
            None => {
                let weight = spec.default_weight.min(MAX_WEIGHT);
                self.indicators
                    .insert(spec.source_id.clone(), Indicator { spec, weight });
                None
            }
        }
    }

    pub fn get(&self, source_id: &str) -> Option<&Indicator> {
        self.indicators.get(source_id)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Set a weight, clamped to [`MAX_WEIGHT`]. Returns the previous weight.
    pub fn set_weight(&mut self, source_id: &str, weight: u32) -> Option<u32> {
        let indicator = self.indicators.get_mut(source_id)?;
        let previous = indicator.weight;
        indicator.weight = weight.min(MAX_WEIGHT);
        Some(previous)
    }

    /// Category → indicators, each group ordered by sort key then display name.
    /// Built fresh on every call.
    pub fn grouped(&self) -> BTreeMap<&str, Vec<&Indicator>> {
        let mut groups: BTreeMap<&str, Vec<&Indicator>> = BTreeMap::new();
        for indicator in self.indicators.values() {
            groups
                .entry(indicator.spec.category.as_str())
                .or_default()
                .push(indicator);
        }
        for members in groups.values_mut() {
            members.sort_by(|a, b| {
                a.spec
                    .sort_key
                    .cmp(&b.spec.sort_key)
                    .then_with(|| a.spec.display_name.cmp(&b.spec.display_name))
                    .then_with(|| a.spec.source_id.cmp(&b.spec.source_id))
            });
        }
        groups
    }

    /// All indicators in code order: category, then sort key, then display name.
    pub fn ordered(&self) -> Vec<&Indicator> {
        self.grouped().into_values().flatten().collect()
    }

    pub fn weights(&self) -> Vec<u32> {
        self.ordered().iter().map(|i| i.weight).collect()
    }

    pub fn used_points(&self) -> u32 {
        self.indicators.values().map(|i| i.weight).sum()
    }

    /// Assign decoded weights positionally. Nothing changes unless every weight is accepted.
    pub fn apply_weights(&mut self, weights: &[u32]) -> Result<(), CodeError> {
        if weights.len() != self.indicators.len() {
            return Err(CodeError::LengthMismatch {
                expected: self.indicators.len(),
                found: weights.len(),
            });
        }
        if let Some(&value) = weights.iter().find(|w| **w > MAX_WEIGHT) {
            return Err(CodeError::WeightOutOfRange {
                value,
                max: MAX_WEIGHT,
            });
        }

        let order: Vec<String> = self
            .ordered()
            .iter()
            .map(|i| i.spec.source_id.clone())
            .collect();
        for (source_id, weight) in order.iter().zip(weights) {
            if let Some(indicator) = self.indicators.get_mut(source_id) {
                indicator.weight = *weight;
            }
        }
        Ok(())
    }
}
