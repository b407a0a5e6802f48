use std::collections::HashMap;

use dioxus::prelude::*;

use super::palette::ColorScale;
use crate::core::AggregateTable;
use crate::core::states::{self, GRID_COLS, GRID_ROWS, TILE_GRID};

/// Tile-grid choropleth: one square per state, shaded by total score.
#[component]
pub fn ChoroplethMap(table: AggregateTable, scale: ColorScale) -> Element {
    let bounds = table.score_bounds().unwrap_or((0.0, 0.0));
    let by_abbr: HashMap<&str, f64> = table
        .rows
        .iter()
        .filter_map(|r| states::abbreviation(&r.name).map(|abbr| (abbr, r.score)))
        .collect();

    // Grid lines are 1-based.
    let tiles: Vec<(String, String, String, u8, u8)> = TILE_GRID
        .iter()
        .map(|(abbr, row, col)| {
            let name = states::name_for(abbr).unwrap_or(*abbr);
            match by_abbr.get(abbr) {
                Some(score) => (
                    abbr.to_string(),
                    format!("{name}: {score:.2}"),
                    scale.fill(*score, bounds),
                    row + 1,
                    col + 1,
                ),
                None => (
                    abbr.to_string(),
                    format!("{name}: no score"),
                    "#2a2a3a".to_string(),
                    row + 1,
                    col + 1,
                ),
            }
        })
        .collect();

    let low = scale.color_at(0.0);
    let high = scale.color_at(1.0);
    let (min, max) = bounds;

    rsx! {
        div { style: "margin-bottom: 16px;",
            h2 { style: "color: #f7931a;", "🗺 Total Score by State" }
            div {
                style: "display: grid; grid-template-columns: repeat({GRID_COLS}, 44px); grid-template-rows: repeat({GRID_ROWS}, 44px); gap: 3px;",
                for (abbr, title, fill, row, col) in tiles {
                    div {
                        key: "{abbr}",
                        title: "{title}",
                        style: "grid-row: {row}; grid-column: {col}; background: {fill}; border-radius: 3px; display: flex; align-items: center; justify-content: center; font-size: 11px; color: #111; font-weight: bold;",
                        "{abbr}"
                    }
                }
            }
            div { style: "display: flex; align-items: center; gap: 8px; margin-top: 8px; font-size: 12px; color: #aaa;",
                span { "{min:.1}" }
                div { style: "width: 160px; height: 10px; border-radius: 2px; background: linear-gradient(to right, {low}, {high});" }
                span { "{max:.1}" }
            }
        }
    }
}
