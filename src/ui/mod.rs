pub mod docs;
pub mod history;
pub mod map;
pub mod palette;
pub mod settings;
pub mod sidebar;
pub mod table;

use dioxus::prelude::*;

use crate::core::AggregateTable;
use crate::core::pipeline::Recompute;
use crate::core::session::Session;
use crate::db::CodeRecord;
use palette::ColorScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Main,
    Settings,
    Docs,
}

/// An indicator that was left out of the last recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureNote {
    pub source_id: String,
    pub label: String,
    pub message: String,
}

/// What the main page renders after a recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreView {
    pub aggregate: AggregateTable,
    /// Indicators that made it into the aggregate.
    pub scored: usize,
    pub failures: Vec<FailureNote>,
}

impl From<Recompute> for ScoreView {
    fn from(result: Recompute) -> Self {
        Self {
            aggregate: result.aggregate,
            scored: result.tables.len(),
            failures: result
                .failures
                .into_iter()
                .map(|f| FailureNote {
                    source_id: f.source_id,
                    label: f.label,
                    message: f.error.to_string(),
                })
                .collect(),
        }
    }
}

const RECENT_CODES: usize = 10;

fn load_recent_codes() -> Vec<CodeRecord> {
    let Some(db) = crate::get_db() else {
        return Vec::new();
    };
    db.recent_codes(RECENT_CODES).unwrap_or_else(|e| {
        tracing::warn!("Failed to load code history: {e}");
        Vec::new()
    })
}

/// Root UI component.
#[component]
pub fn App() -> Element {
    let session = use_signal(|| {
        crate::take_session().unwrap_or_else(|| Session::from_config(crate::get_config()))
    });
    let mut page = use_signal(|| Page::Main);
    let code_error = use_signal(|| None::<String>);
    let mut recent_codes = use_signal(load_recent_codes);

    // Rerun the pipeline whenever the session changes. The task only computes;
    // a superseded one finishes unobserved.
    let scores = use_resource(move || {
        let registry = session.read().registry.clone();
        async move {
            let Some(engine) = crate::get_engine() else {
                return Err("Score engine not initialized".to_string());
            };
            let engine = engine.clone();
            let task = tokio::task::spawn_blocking(move || engine.recompute(&registry));
            match task.await {
                Ok(Ok(result)) => Ok(ScoreView::from(result)),
                Ok(Err(e)) => {
                    tracing::error!("Recompute failed: {e}");
                    Err(format!("Could not load Census data: {e}"))
                }
                Err(e) => Err(format!("Recompute task failed: {e}")),
            }
        }
    });

    // Record the current code once the weights stop changing. Each session
    // change restarts this, dropping the pending write.
    let _recorder = use_resource(move || {
        let code = session.read().current_code();
        async move {
            let (Some(db), Ok(code)) = (crate::get_db(), code) else {
                return;
            };
            match history::record_when_settled(db, &code, history::SETTLE_DELAY).await {
                Ok(true) => recent_codes.set(load_recent_codes()),
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to record code {code}: {e}"),
            }
        }
    });

    let settings = session.read().settings.clone();
    let scale = ColorScale::resolve(&settings.color_scale, &crate::get_config().ui.color_scale);
    let round = settings.table_round;

    let nav_style = |active: bool| {
        if active {
            "background: #f7931a; color: #1a1a2e; border: none; padding: 6px 12px; margin-right: 6px; border-radius: 4px; cursor: pointer;"
        } else {
            "background: #16213e; color: #e0e0e0; border: 1px solid #555; padding: 6px 12px; margin-right: 6px; border-radius: 4px; cursor: pointer;"
        }
    };

    rsx! {
        div { class: "app",
            style: "font-family: sans-serif; background: #0e1117; color: #e0e0e0; min-height: 100vh; padding: 16px;",

            div { style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 12px;",
                h1 { style: "color: #f7931a; margin: 0;", "States Statistics Viewer" }
                div {
                    button { style: nav_style(*page.read() == Page::Main), onclick: move |_| page.set(Page::Main), "Main" }
                    button { style: nav_style(*page.read() == Page::Settings), onclick: move |_| page.set(Page::Settings), "Settings" }
                    button { style: nav_style(*page.read() == Page::Docs), onclick: move |_| page.set(Page::Docs), "Documentation" }
                }
            }

            match *page.read() {
                Page::Main => rsx! {
                    div { style: "display: flex; gap: 16px;",
                        // Left: weights, code entry
                        div { style: "flex: 1; min-width: 320px;",
                            sidebar::Sidebar { session, code_error }
                            history::CodeHistory { codes: recent_codes, session, code_error }
                        }

                        // Right: map + table
                        div { style: "flex: 2;",
                            match &*scores.read() {
                                None => rsx! {
                                    p { style: "color: #888;", "Loading Census data..." }
                                },
                                Some(Err(message)) => rsx! {
                                    div { style: "background: #3a0000; padding: 12px; border-radius: 4px;",
                                        "⚠ {message}"
                                    }
                                },
                                Some(Ok(view)) => rsx! {
                                    if !view.failures.is_empty() {
                                        div { style: "background: #3a2600; padding: 8px 12px; border-radius: 4px; margin-bottom: 8px; font-size: 13px;",
                                            for note in view.failures.iter() {
                                                p { key: "{note.source_id}", style: "margin: 2px 0;", "⚠ {note.label} scored as zero: {note.message}" }
                                            }
                                        }
                                    }
                                    p { style: "font-size: 12px; color: #888; margin: 0 0 8px;",
                                        {format!("{} states ranked on {} statistics", view.aggregate.len(), view.scored)}
                                    }
                                    map::ChoroplethMap { table: view.aggregate.clone(), scale }
                                    table::ScoreTable { table: view.aggregate.clone(), round }
                                },
                            }
                        }
                    }
                },
                Page::Settings => rsx! {
                    settings::SettingsPanel { session }
                },
                Page::Docs => rsx! {
                    docs::DocsPanel {}
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::{IndicatorError, IndicatorFailure};
    use crate::core::scale::ScaleError;

    #[test]
    fn view_counts_scored_indicators_and_keeps_failure_ids() {
        let result = Recompute {
            aggregate: AggregateTable::default(),
            tables: Vec::new(),
            failures: vec![IndicatorFailure {
                source_id: "S2701_C05_001E".to_string(),
                label: "Uninsured".to_string(),
                error: IndicatorError::Scale(ScaleError::Empty),
            }],
        };
        let view = ScoreView::from(result);
        assert_eq!(view.scored, 0);
        assert_eq!(view.failures[0].source_id, "S2701_C05_001E");
        assert_eq!(view.failures[0].message, "cannot scale an empty series");
    }
}
