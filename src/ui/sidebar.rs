use dioxus::prelude::*;

use crate::core::session::Session;

#[component]
pub fn Sidebar(mut session: Signal<Session>, mut code_error: Signal<Option<String>>) -> Element {
    let mut code_input = use_signal(String::new);

    let mut apply = move || {
        let input = code_input.read().clone();
        let result = session.write().apply_code(&input);
        match result {
            Ok(()) => {
                code_error.set(None);
                code_input.set(String::new());
            }
            Err(e) => {
                tracing::info!("Rejected code {input:?}: {e}");
                let message = if e.is_malformed() {
                    format!("That is not a valid code: {e}")
                } else {
                    format!("That code does not fit the current statistics: {e}")
                };
                code_error.set(Some(message));
            }
        }
    };

    let current = session.read();
    let summary = current.points_summary();
    let current_code = current
        .current_code()
        .unwrap_or_else(|e| format!("unavailable ({e})"));
    let groups: Vec<(String, Vec<(String, String, u32, u32)>)> = current
        .registry
        .grouped()
        .into_iter()
        .map(|(category, members)| {
            let inputs = members
                .into_iter()
                .map(|i| {
                    (
                        i.source_id().to_string(),
                        i.label().to_string(),
                        i.weight,
                        current.input_bound(i.source_id()),
                    )
                })
                .collect();
            (category.to_string(), inputs)
        })
        .collect();
    drop(current);

    let left_color = if summary.left < 0 { "#ff6b6b" } else { "#e0e0e0" };

    rsx! {
        div { style: "background: #16213e; padding: 12px; border-radius: 4px;",
            // Code entry
            div { style: "margin-bottom: 12px;",
                label { style: "display: block; font-size: 13px; margin-bottom: 4px;",
                    "If you have a code, put it here!"
                }
                div { style: "display: flex; gap: 6px;",
                    input {
                        style: "flex: 1; background: #0e1117; color: #e0e0e0; border: 1px solid #555; padding: 4px;",
                        value: "{code_input}",
                        oninput: move |evt| code_input.set(evt.value()),
                        onkeydown: move |evt| {
                            if evt.key() == Key::Enter {
                                apply();
                            }
                        },
                    }
                    button {
                        style: "background: #f7931a; border: none; padding: 4px 12px; border-radius: 3px; cursor: pointer;",
                        onclick: move |_| apply(),
                        "Apply"
                    }
                }
                if let Some(message) = code_error.read().as_ref() {
                    p { style: "color: #ff6b6b; font-size: 12px; margin: 4px 0 0;", "{message}" }
                }
            }

            // Budget
            div { style: "font-size: 14px; margin-bottom: 8px;",
                p { style: "margin: 2px 0;", "Max points: {summary.max}" }
                p { style: "margin: 2px 0;", "Used points: {summary.used}" }
                p { style: "margin: 2px 0; color: {left_color};", "Points left: {summary.left}" }
            }

            // Weights
            for (category, inputs) in groups {
                h3 { style: "color: #f7931a; margin: 12px 0 4px;", "{category}" }
                for (source_id, label, weight, bound) in inputs {
                    WeightInput { session, source_id, label, weight, bound }
                }
            }

            p { style: "font-size: 13px; margin-top: 12px; color: #aaa;",
                "Your current code is "
                span { style: "font-family: monospace; color: #e0e0e0; user-select: all;", "{current_code}" }
            }
        }
    }
}

#[component]
fn WeightInput(mut session: Signal<Session>, source_id: String, label: String, weight: u32, bound: u32) -> Element {
    rsx! {
        div { style: "margin: 6px 0;",
            label { style: "display: block; font-size: 12px; color: #ccc;", "{label}" }
            input {
                r#type: "number",
                style: "width: 100px; background: #0e1117; color: #e0e0e0; border: 1px solid #555; padding: 2px 4px;",
                min: "0",
                max: "{bound}",
                value: "{weight}",
                oninput: move |evt| {
                    let Ok(requested) = evt.value().trim().parse::<u32>() else {
                        return;
                    };
                    if let Some(stored) = session.write().set_weight(&source_id, requested) {
                        tracing::debug!("Weight for {source_id} set to {stored}");
                    }
                },
            }
        }
    }
}
