use std::cmp::Ordering;
use std::collections::HashMap;

use super::scale::{ScaleError, ScaleRange, minmax_scale};
use super::{AggregateRow, AggregateTable, IndicatorTable, StatRow, StateRecord};

/// Zero-score table holding every state in `rows`. Merges start from this.
pub fn scaffold(rows: &[StatRow]) -> AggregateTable {
    let mut table = AggregateTable {
        rows: rows
            .iter()
            .map(|r| AggregateRow {
                name: r.name.clone(),
                region_code: r.region_code,
                score: 0.0,
            })
            .collect(),
    };
    sort_by_score(&mut table.rows, |r| (r.score, r.name.as_str()));
    table
}

/// Normalize one indicator's rows into `[0, weight]` (or `[weight, 0]` when inverted).
pub fn score_indicator(
    source_id: &str,
    rows: &[StatRow],
    weight: u32,
    invert: bool,
) -> Result<IndicatorTable, ScaleError> {
    let stats: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let scores = minmax_scale(&stats, ScaleRange::for_weight(weight, invert))?;

    let mut records: Vec<StateRecord> = rows
        .iter()
        .zip(scores)
        .map(|(row, score)| StateRecord {
            name: row.name.clone(),
            region_code: row.region_code,
            stat: row.value,
            score,
        })
        .collect();
    sort_by_score(&mut records, |r| (r.score, r.name.as_str()));

    Ok(IndicatorTable {
        source_id: source_id.to_string(),
        weight,
        invert,
        records,
    })
}

/// Inner-join `indicator` into `table` by state name, adding its score.
/// States the indicator does not cover are dropped from the result.
pub fn merge(table: &AggregateTable, indicator: &IndicatorTable) -> AggregateTable {
    let scores: HashMap<&str, f64> = indicator
        .records
        .iter()
        .map(|r| (r.name.as_str(), r.score))
        .collect();

    let rows = table
        .rows
        .iter()
        .filter_map(|row| {
            scores.get(row.name.as_str()).map(|s| AggregateRow {
                name: row.name.clone(),
                region_code: row.region_code,
                score: row.score + s,
            })
        })
        .collect();

    AggregateTable { rows }
}

/// Merge every table onto `base` in order, then sort the result.
pub fn combine<'a>(
    base: AggregateTable,
    tables: impl IntoIterator<Item = &'a IndicatorTable>,
) -> AggregateTable {
    let mut combined = tables
        .into_iter()
        .fold(base, |acc, table| merge(&acc, table));
    sort_by_score(&mut combined.rows, |r| (r.score, r.name.as_str()));
    combined
}

/// Score descending, then name ascending. Stable, so equal keys keep their relative order.
fn sort_by_score<T>(rows: &mut [T], key: impl Fn(&T) -> (f64, &str)) {
    rows.sort_by(|a, b| {
        let (score_a, name_a) = key(a);
        let (score_b, name_b) = key(b);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| name_a.cmp(name_b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, value: f64, code: u32) -> StatRow {
        StatRow {
            name: name.to_string(),
            value,
            region_code: code,
        }
    }

    fn universe() -> Vec<StatRow> {
        vec![
            row("Alabama", 0.0, 1),
            row("Alaska", 0.0, 2),
            row("Arizona", 0.0, 4),
            row("Arkansas", 0.0, 5),
        ]
    }

    fn names(table: &AggregateTable) -> Vec<&str> {
        table.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn scaffold_is_zeroed_and_name_sorted() {
        let table = scaffold(&universe());
        assert_eq!(table.len(), 4);
        assert!(table.rows.iter().all(|r| r.score == 0.0));
        assert_eq!(names(&table), vec!["Alabama", "Alaska", "Arizona", "Arkansas"]);
    }

    #[test]
    fn indicator_table_keeps_stats_and_sorts_best_first() {
        let rows = vec![row("Alabama", 24.0, 1), row("Alaska", 47.8, 2)];
        let table = score_indicator("S1501_C02_015E", &rows, 42, false).unwrap();
        assert_eq!(table.records[0].name, "Alaska");
        assert_eq!(table.records[0].score, 42.0);
        assert_eq!(table.records[0].stat, 47.8);
        assert_eq!(table.records[1].score, 0.0);
    }

    #[test]
    fn aggregate_is_sum_of_indicator_scores() {
        let a = score_indicator(
            "a",
            &[row("Alabama", 1.0, 1), row("Alaska", 2.0, 2), row("Arizona", 3.0, 4), row("Arkansas", 4.0, 5)],
            30,
            false,
        )
        .unwrap();
        let b = score_indicator(
            "b",
            &[row("Alabama", 9.0, 1), row("Alaska", 3.0, 2), row("Arizona", 5.0, 4), row("Arkansas", 1.0, 5)],
            80,
            true,
        )
        .unwrap();

        let combined = combine(scaffold(&universe()), [&a, &b]);
        assert_eq!(combined.len(), 4);
        for r in &combined.rows {
            let expected = a.score_of(&r.name).unwrap() + b.score_of(&r.name).unwrap();
            assert!((r.score - expected).abs() < 1e-9, "{}: {} vs {expected}", r.name, r.score);
        }
    }

    #[test]
    fn state_missing_from_one_indicator_vanishes() {
        let full = score_indicator(
            "full",
            &[row("Alabama", 1.0, 1), row("Alaska", 2.0, 2), row("Arizona", 3.0, 4), row("Arkansas", 4.0, 5)],
            10,
            false,
        )
        .unwrap();
        let partial = score_indicator(
            "partial",
            &[row("Alabama", 1.0, 1), row("Arizona", 3.0, 4), row("Arkansas", 4.0, 5)],
            10,
            false,
        )
        .unwrap();

        let combined = combine(scaffold(&universe()), [&full, &partial]);
        assert_eq!(combined.len(), 3);
        assert!(combined.score_of("Alaska").is_none());
    }

    #[test]
    fn extra_state_in_indicator_is_ignored() {
        let extra = score_indicator(
            "x",
            &[row("Alabama", 1.0, 1), row("Guam", 5.0, 66)],
            10,
            false,
        )
        .unwrap();
        let combined = combine(scaffold(&universe()[..1]), [&extra]);
        assert_eq!(names(&combined), vec!["Alabama"]);
    }

    #[test]
    fn ties_break_by_name_ascending() {
        let table = score_indicator(
            "t",
            &[row("Arkansas", 5.0, 5), row("Alabama", 5.0, 1), row("Alaska", 1.0, 2), row("Arizona", 5.0, 4)],
            10,
            false,
        )
        .unwrap();
        let combined = combine(scaffold(&universe()), [&table]);
        assert_eq!(names(&combined), vec!["Alabama", "Arizona", "Arkansas", "Alaska"]);
    }

    #[test]
    fn changing_one_weight_changes_only_its_contribution() {
        let rows_a = [row("Alabama", 1.0, 1), row("Alaska", 2.0, 2), row("Arizona", 3.0, 4), row("Arkansas", 4.0, 5)];
        let rows_b = [row("Alabama", 7.0, 1), row("Alaska", 2.0, 2), row("Arizona", 5.0, 4), row("Arkansas", 3.0, 5)];
        let a = score_indicator("a", &rows_a, 20, false).unwrap();
        let b_low = score_indicator("b", &rows_b, 10, false).unwrap();
        let b_high = score_indicator("b", &rows_b, 50, false).unwrap();

        let before = combine(scaffold(&universe()), [&a, &b_low]);
        let after = combine(scaffold(&universe()), [&a, &b_high]);
        for r in &after.rows {
            let delta = r.score - before.score_of(&r.name).unwrap();
            let expected = b_high.score_of(&r.name).unwrap() - b_low.score_of(&r.name).unwrap();
            assert!((delta - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn no_indicators_leaves_scaffold() {
        let combined = combine(scaffold(&universe()), std::iter::empty::<&IndicatorTable>());
        assert_eq!(combined, scaffold(&universe()));
    }
}
