use dioxus::prelude::*;

use crate::core::AggregateTable;

#[component]
pub fn ScoreTable(table: AggregateTable, round: usize) -> Element {
    rsx! {
        div {
            h2 { style: "color: #f7931a;", "📊 Rankings" }
            div { style: "max-height: 50vh; overflow-y: auto;",
                table { style: "width: 100%; border-collapse: collapse; font-size: 13px;",
                    thead {
                        tr { style: "text-align: left; color: #888;",
                            th { style: "padding: 4px;", "#" }
                            th { style: "padding: 4px;", "State Name" }
                            th { style: "padding: 4px; text-align: right;", "Total Score" }
                        }
                    }
                    tbody {
                        for (rank, row) in table.rows.iter().enumerate().map(|(i, row)| (i + 1, row)) {
                            tr { key: "{row.name}", style: "border-top: 1px solid #222;",
                                td { style: "padding: 4px; color: #888;", "{rank}" }
                                td { style: "padding: 4px;", "{row.name}" }
                                td { style: "padding: 4px; text-align: right;", {format_score(row.score, round)} }
                            }
                        }
                    }
                }
                if table.is_empty() {
                    p { style: "color: #666;", "No states to show." }
                }
            }
        }
    }
}

fn format_score(score: f64, round: usize) -> String {
    format!("{score:.round$}")
}
