use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use super::aggregate::{combine, scaffold, score_indicator};
use super::registry::IndicatorRegistry;
use super::scale::ScaleError;
use super::{AggregateTable, Indicator, IndicatorTable};
use crate::census::{FetchError, StatSource};

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Scale(#[from] ScaleError),
}

/// An indicator left out of the aggregate, with the reason.
#[derive(Debug)]
pub struct IndicatorFailure {
    pub source_id: String,
    pub label: String,
    pub error: IndicatorError,
}

/// Output of one recompute pass.
#[derive(Debug)]
pub struct Recompute {
    pub aggregate: AggregateTable,
    /// Successfully scored indicators, in code order.
    pub tables: Vec<IndicatorTable>,
    /// Indicators that contributed nothing because they failed.
    pub failures: Vec<IndicatorFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    source_id: String,
    weight: u32,
    invert: bool,
}

#[derive(Default)]
struct Memo {
    scaffolds: HashMap<String, AggregateTable>,
    tables: HashMap<TableKey, IndicatorTable>,
}

/// Turns a session's weights into per-state scores. Cheap to clone; clones share
/// the source and the memo.
#[derive(Clone)]
pub struct ScoreEngine {
    source: Arc<dyn StatSource>,
    scaffold_variable: String,
    memo: Arc<Mutex<Memo>>,
}

impl ScoreEngine {
    pub fn new(source: Arc<dyn StatSource>, scaffold_variable: impl Into<String>) -> Self {
        Self {
            source,
            scaffold_variable: scaffold_variable.into(),
            memo: Arc::new(Mutex::new(Memo::default())),
        }
    }

    fn memo(&self) -> std::sync::MutexGuard<'_, Memo> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zero-score table over every state the scaffold variable reports.
    pub fn scaffold(&self) -> Result<AggregateTable, FetchError> {
        if let Some(table) = self.memo().scaffolds.get(&self.scaffold_variable) {
            return Ok(table.clone());
        }
        let rows = self.source.fetch(&self.scaffold_variable)?;
        let table = scaffold(&rows);
        self.memo()
            .scaffolds
            .insert(self.scaffold_variable.clone(), table.clone());
        Ok(table)
    }

    /// Normalized scores for one indicator at its current weight.
    pub fn indicator_table(&self, indicator: &Indicator) -> Result<IndicatorTable, IndicatorError> {
        let key = TableKey {
            source_id: indicator.spec.source_id.clone(),
            weight: indicator.weight,
            invert: indicator.spec.invert,
        };
        if let Some(table) = self.memo().tables.get(&key) {
            return Ok(table.clone());
        }

        let rows = self.source.fetch(&key.source_id)?;
        let table = score_indicator(&key.source_id, &rows, key.weight, key.invert)?;
        self.memo().tables.insert(key, table.clone());
        Ok(table)
    }

    /// Score every registered indicator and merge them onto the scaffold.
    /// A failing indicator is reported and contributes nothing; only a scaffold
    /// failure aborts the pass.
    pub fn recompute(&self, registry: &IndicatorRegistry) -> Result<Recompute, FetchError> {
        let base = self.scaffold()?;

        let mut tables = Vec::with_capacity(registry.len());
        let mut failures = Vec::new();
        for indicator in registry.ordered() {
            match self.indicator_table(indicator) {
                Ok(table) => tables.push(table),
                Err(error) => {
                    warn!("Indicator {} left out: {error}", indicator.source_id());
                    failures.push(IndicatorFailure {
                        source_id: indicator.source_id().to_string(),
                        label: indicator.label().to_string(),
                        error,
                    });
                }
            }
        }

        let aggregate = combine(base, &tables);
        debug!(
            "Recomputed {} states from {} indicators ({} failed)",
            aggregate.len(),
            tables.len(),
            failures.len()
        );
        Ok(Recompute {
            aggregate,
            tables,
            failures,
        })
    }

    /// Drop memoized tables and the source's cached rows so the next pass refetches.
    pub fn clear(&self) {
        {
            let mut memo = self.memo();
            memo.scaffolds.clear();
            memo.tables.clear();
        }
        self.source.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::fixture::FixtureSource;
    use crate::core::IndicatorSpec;

    const SCAFFOLD: &str = "S1501_C02_015E";

    fn spec(id: &str, sort_key: &str, weight: u32, invert: bool) -> IndicatorSpec {
        IndicatorSpec {
            source_id: id.to_string(),
            display_name: id.to_string(),
            category: "Test".to_string(),
            sort_key: sort_key.to_string(),
            default_weight: weight,
            invert,
        }
    }

    fn fixture() -> FixtureSource {
        FixtureSource::default()
            .with(
                SCAFFOLD,
                &[("Alabama", 28.0, 1), ("Alaska", 31.0, 2), ("Arizona", 32.0, 4)],
            )
            .with(
                "income",
                &[("Alabama", 59.0, 1), ("Alaska", 86.0, 2), ("Arizona", 72.0, 4)],
            )
            .with(
                "uninsured",
                &[("Alabama", 8.8, 1), ("Alaska", 11.0, 2), ("Arizona", 10.0, 4)],
            )
            .with("flat", &[("Alabama", 5.0, 1), ("Alaska", 5.0, 2), ("Arizona", 5.0, 4)])
            .with("partial", &[("Alabama", 1.0, 1), ("Arizona", 2.0, 4)])
    }

    fn engine(source: FixtureSource) -> (ScoreEngine, Arc<FixtureSource>) {
        let source = Arc::new(source);
        (ScoreEngine::new(source.clone(), SCAFFOLD), source)
    }

    #[test]
    fn aggregate_sums_active_indicators() {
        let (engine, _) = engine(fixture());
        let registry = IndicatorRegistry::from_specs(vec![
            spec("income", "a", 40, false),
            spec("uninsured", "b", 20, true),
        ]);
        let result = engine.recompute(&registry).unwrap();

        assert!(result.failures.is_empty());
        assert_eq!(result.aggregate.len(), 3);
        // Alaska: top income (40) + most uninsured (0)
        assert_eq!(result.aggregate.score_of("Alaska"), Some(40.0));
        // Alabama: lowest income (0) + fewest uninsured (20)
        assert_eq!(result.aggregate.score_of("Alabama"), Some(20.0));
        for row in &result.aggregate.rows {
            let expected: f64 = result.tables.iter().map(|t| t.score_of(&row.name).unwrap()).sum();
            assert!((row.score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn aggregate_sorted_best_first() {
        let (engine, _) = engine(fixture());
        let registry = IndicatorRegistry::from_specs(vec![spec("income", "a", 10, false)]);
        let result = engine.recompute(&registry).unwrap();
        let names: Vec<&str> = result.aggregate.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alaska", "Arizona", "Alabama"]);
    }

    #[test]
    fn degenerate_indicator_contributes_zero() {
        let (engine, _) = engine(fixture());
        let registry = IndicatorRegistry::from_specs(vec![
            spec("income", "a", 10, false),
            spec("flat", "b", 50, false),
        ]);
        let result = engine.recompute(&registry).unwrap();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].source_id, "flat");
        assert!(matches!(
            result.failures[0].error,
            IndicatorError::Scale(ScaleError::DegenerateRange { .. })
        ));
        assert_eq!(result.aggregate.len(), 3);
        assert_eq!(result.aggregate.score_of("Alaska"), Some(10.0));
    }

    #[test]
    fn fetch_failure_is_isolated_to_its_indicator() {
        let (engine, _) = engine(fixture().failing("uninsured"));
        let registry = IndicatorRegistry::from_specs(vec![
            spec("income", "a", 10, false),
            spec("uninsured", "b", 10, true),
        ]);
        let result = engine.recompute(&registry).unwrap();

        assert_eq!(result.failures.len(), 1);
        assert!(matches!(result.failures[0].error, IndicatorError::Fetch(_)));
        assert_eq!(result.tables.len(), 1);
        assert_eq!(result.aggregate.score_of("Alaska"), Some(10.0));
    }

    #[test]
    fn scaffold_failure_aborts() {
        let (engine, _) = engine(fixture().failing(SCAFFOLD));
        let registry = IndicatorRegistry::from_specs(vec![spec("income", "a", 10, false)]);
        assert!(engine.recompute(&registry).is_err());
    }

    #[test]
    fn state_missing_from_indicator_drops_out() {
        let (engine, _) = engine(fixture());
        let registry = IndicatorRegistry::from_specs(vec![
            spec("income", "a", 10, false),
            spec("partial", "b", 10, false),
        ]);
        let result = engine.recompute(&registry).unwrap();
        assert_eq!(result.aggregate.len(), 2);
        assert!(result.aggregate.score_of("Alaska").is_none());
    }

    #[test]
    fn empty_registry_yields_zeroed_universe() {
        let (engine, _) = engine(fixture());
        let result = engine.recompute(&IndicatorRegistry::new()).unwrap();
        assert_eq!(result.aggregate.len(), 3);
        assert!(result.aggregate.rows.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn memo_hit_matches_fresh_computation() {
        let (engine, source) = engine(fixture());
        let registry = IndicatorRegistry::from_specs(vec![spec("income", "a", 25, false)]);

        let first = engine.recompute(&registry).unwrap();
        let calls = source.call_count();
        let second = engine.recompute(&registry).unwrap();
        assert_eq!(source.call_count(), calls);
        assert_eq!(first.aggregate, second.aggregate);
        assert_eq!(first.tables, second.tables);

        engine.clear();
        let third = engine.recompute(&registry).unwrap();
        assert!(source.call_count() > calls);
        assert_eq!(third.aggregate, first.aggregate);
    }

    #[test]
    fn weight_change_touches_only_that_indicator() {
        let (engine, _) = engine(fixture());
        let mut registry = IndicatorRegistry::from_specs(vec![
            spec("income", "a", 10, false),
            spec("uninsured", "b", 10, true),
        ]);
        let before = engine.recompute(&registry).unwrap();
        registry.set_weight("uninsured", 30);
        let after = engine.recompute(&registry).unwrap();

        assert_eq!(before.tables[0], after.tables[0]);
        for row in &after.aggregate.rows {
            let delta = row.score - before.aggregate.score_of(&row.name).unwrap();
            let expected = after.tables[1].score_of(&row.name).unwrap()
                - before.tables[1].score_of(&row.name).unwrap();
            assert!((delta - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn failure_recovers_once_source_returns() {
        let (engine, source) = engine(fixture().failing("income"));
        let registry = IndicatorRegistry::from_specs(vec![spec("income", "a", 10, false)]);
        assert_eq!(engine.recompute(&registry).unwrap().failures.len(), 1);

        source.set_failing("income", false);
        let result = engine.recompute(&registry).unwrap();
        assert!(result.failures.is_empty());
        assert_eq!(result.aggregate.score_of("Alaska"), Some(10.0));
    }
}
