use std::time::Duration;

use dioxus::prelude::*;

use crate::core::session::Session;
use crate::db::{CodeRecord, SharedDatabase};

/// How long weights must stay unchanged before their code enters the history.
pub const SETTLE_DELAY: Duration = Duration::from_millis(800);

/// Wait out `delay`, then record `code`. A future dropped before the delay
/// elapses records nothing, so superseded edits never reach the history.
pub async fn record_when_settled(
    db: &SharedDatabase,
    code: &str,
    delay: Duration,
) -> Result<bool, rusqlite::Error> {
    tokio::time::sleep(delay).await;
    db.record_code(code)
}

/// Recently produced codes; clicking one restores it.
#[component]
pub fn CodeHistory(
    codes: Signal<Vec<CodeRecord>>,
    session: Signal<Session>,
    code_error: Signal<Option<String>>,
) -> Element {
    rsx! {
        div { style: "margin-top: 16px;",
            h2 { style: "color: #f7931a;", "📜 Recent Codes" }
            div { style: "max-height: 30vh; overflow-y: auto;",
                for record in codes.read().iter() {
                    CodeRow { record: record.clone(), session, code_error }
                }
                if codes.read().is_empty() {
                    p { style: "color: #666;", "No codes recorded yet." }
                }
            }
        }
    }
}

#[component]
fn CodeRow(record: CodeRecord, mut session: Signal<Session>, mut code_error: Signal<Option<String>>) -> Element {
    let code = record.code.clone();

    rsx! {
        div {
            style: "background: #16213e; padding: 6px 8px; margin: 4px 0; border-radius: 4px; font-size: 12px; display: flex; justify-content: space-between; cursor: pointer;",
            title: "Click to restore",
            onclick: move |_| {
                let result = session.write().apply_code(&code);
                code_error.set(result.err().map(|e| e.to_string()));
            },
            span { style: "font-family: monospace;", "{record.code}" }
            span { style: "color: #888;", "{record.created_at}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::open_temp_db;

    #[tokio::test]
    async fn settled_code_is_recorded() {
        let db = open_temp_db();
        assert!(record_when_settled(&db, "0A00", Duration::from_millis(5)).await.unwrap());
        assert_eq!(db.last_code().unwrap().as_deref(), Some("0A00"));
    }

    #[tokio::test]
    async fn superseded_code_is_never_recorded() {
        let db = open_temp_db();
        // Typing "45": the code for "4" is replaced before it settles.
        let typed_four = {
            let db = db.clone();
            tokio::spawn(async move { record_when_settled(&db, "0400", Duration::from_millis(300)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        typed_four.abort();

        assert!(record_when_settled(&db, "1900", Duration::from_millis(5)).await.unwrap());
        tokio::time::sleep(Duration::from_millis(400)).await;

        let codes: Vec<String> = db.recent_codes(10).unwrap().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["1900"]);
        assert_eq!(db.last_code().unwrap().as_deref(), Some("1900"));
    }
}
