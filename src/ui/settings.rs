use dioxus::prelude::*;

use super::palette::ColorScale;
use crate::core::session::{MAX_TABLE_ROUND, Session};

#[component]
pub fn SettingsPanel(mut session: Signal<Session>) -> Element {
    let mut error = use_signal(|| None::<String>);

    let current = session.read();
    let settings = current.settings.clone();
    let used = current.points_summary().used;
    drop(current);

    let override_on = settings.max_points_override.is_some();
    let override_value = settings
        .max_points_override
        .unwrap_or(settings.default_max_points.max(used));
    let locked = override_on && used > settings.default_max_points;
    let selected_scale = ColorScale::from_name(&settings.color_scale);

    let mut toggle_override = move || {
        let next = if override_on { None } else { Some(override_value) };
        let result = session.write().set_max_points_override(next);
        error.set(result.err().map(|e| e.to_string()));
    };

    rsx! {
        div { style: "max-width: 640px; background: #16213e; padding: 16px; border-radius: 4px;",
            h2 { style: "color: #f7931a;", "⚙ Settings" }

            // Max points
            div { style: "margin-bottom: 16px;",
                button {
                    style: "background: #0e1117; color: #e0e0e0; border: 1px solid #555; padding: 4px 10px; border-radius: 3px; cursor: pointer;",
                    disabled: locked,
                    onclick: move |_| toggle_override(),
                    if override_on { "Override max points: on" } else { "Override max points: off" }
                }
                if override_on {
                    div { style: "margin-top: 6px;",
                        label { style: "font-size: 12px; color: #ccc; margin-right: 6px;", "New max points" }
                        input {
                            r#type: "number",
                            style: "width: 100px; background: #0e1117; color: #e0e0e0; border: 1px solid #555;",
                            min: "{used}",
                            max: "{settings.points_limit}",
                            value: "{override_value}",
                            oninput: move |evt| {
                                let Ok(value) = evt.value().trim().parse::<u32>() else {
                                    return;
                                };
                                let result = session.write().set_max_points_override(Some(value));
                                error.set(result.err().map(|e| e.to_string()));
                            },
                        }
                    }
                }
                if locked {
                    p { style: "font-size: 12px; color: #f7c948;",
                        "You cannot turn off the override because your current point usage ({used}) exceeds the default maximum of {settings.default_max_points}. Lower your usage to turn it off."
                    }
                }
                if let Some(message) = error.read().as_ref() {
                    p { style: "font-size: 12px; color: #ff6b6b;", "{message}" }
                }
            }

            // Rounding
            div { style: "margin-bottom: 16px;",
                label { style: "font-size: 12px; color: #ccc; margin-right: 6px;", "Decimal places in tables" }
                input {
                    r#type: "number",
                    style: "width: 60px; background: #0e1117; color: #e0e0e0; border: 1px solid #555;",
                    min: "0",
                    max: "{MAX_TABLE_ROUND}",
                    value: "{settings.table_round}",
                    oninput: move |evt| {
                        if let Ok(places) = evt.value().trim().parse::<usize>() {
                            session.write().set_table_round(places);
                        }
                    },
                }
            }

            // Color scale
            div { style: "margin-bottom: 16px;",
                label { style: "font-size: 12px; color: #ccc; margin-right: 6px;", "Map color scale" }
                select {
                    style: "background: #0e1117; color: #e0e0e0; border: 1px solid #555;",
                    onchange: move |evt| session.write().set_color_scale(&evt.value()),
                    for scale in ColorScale::ALL {
                        option {
                            value: scale.name(),
                            selected: selected_scale == Some(scale),
                            {scale.name()}
                        }
                    }
                }
            }

            // Data
            div {
                button {
                    style: "background: #0e1117; color: #e0e0e0; border: 1px solid #555; padding: 4px 10px; border-radius: 3px; cursor: pointer;",
                    onclick: move |_| {
                        if let Some(engine) = crate::get_engine() {
                            engine.clear();
                            tracing::info!("Cached Census data dropped, refetching");
                        }
                        // Touch the session so the scores recompute.
                        session.write();
                    },
                    "Refresh Census data"
                }
            }
        }
    }
}
