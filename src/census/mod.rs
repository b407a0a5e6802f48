pub mod cache;

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::CensusConfig;
use crate::core::StatRow;

/// Anything that can produce per-state rows for a Census variable.
pub trait StatSource: Send + Sync {
    fn fetch(&self, source_id: &str) -> Result<Vec<StatRow>, FetchError>;

    /// Human-readable label the API publishes for a variable.
    fn variable_label(&self, source_id: &str) -> Result<String, FetchError>;

    /// Forget any cached rows so the next fetch goes upstream.
    fn invalidate(&self) {}
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {source_id} failed: {source}")]
    Http {
        source_id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream returned HTTP {status} for {source_id}")]
    Status { source_id: String, status: u16 },
    #[error("malformed response for {source_id}: {reason}")]
    Malformed { source_id: String, reason: String },
    #[error("no state rows returned for {source_id}")]
    Empty { source_id: String },
}

impl FetchError {
    fn malformed(source_id: &str, reason: impl Into<String>) -> Self {
        FetchError::Malformed {
            source_id: source_id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Blocking client for the ACS subject-table API.
pub struct CensusClient {
    client: Client,
    config: CensusConfig,
}

impl CensusClient {
    pub fn new(config: CensusConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn dataset_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.year,
            self.config.dataset
        )
    }

    fn get_json(&self, source_id: &str, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let mut request = self.client.get(url).query(query);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let http_err = |source: reqwest::Error| FetchError::Http {
            source_id: source_id.to_string(),
            source,
        };
        let resp = request.send().map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_id: source_id.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().map_err(http_err)?;
        serde_json::from_str(&body).map_err(|e| FetchError::malformed(source_id, e.to_string()))
    }
}

impl StatSource for CensusClient {
    fn fetch(&self, source_id: &str) -> Result<Vec<StatRow>, FetchError> {
        let get = format!("NAME,{source_id}");
        let json = self.get_json(
            source_id,
            &self.dataset_url(),
            &[("get", get.as_str()), ("for", "state:*")],
        )?;
        let rows = parse_rows(source_id, &json, &self.config.excluded_region_codes)?;
        tracing::debug!("Fetched {} rows for {source_id}", rows.len());
        Ok(rows)
    }

    fn variable_label(&self, source_id: &str) -> Result<String, FetchError> {
        let url = format!("{}/variables/{source_id}.json", self.dataset_url());
        let json = self.get_json(source_id, &url, &[])?;
        json.get("label")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FetchError::malformed(source_id, "variable has no label"))
    }
}

/// Parse a `[[NAME, value, state], ...]` response. The first row is a header;
/// rows whose region code is in `excluded` are dropped before numeric parsing.
pub fn parse_rows(
    source_id: &str,
    json: &Value,
    excluded: &[String],
) -> Result<Vec<StatRow>, FetchError> {
    let table = json
        .as_array()
        .ok_or_else(|| FetchError::malformed(source_id, "expected a JSON array"))?;

    let mut rows = Vec::with_capacity(table.len().saturating_sub(1));
    for (index, entry) in table.iter().enumerate().skip(1) {
        let cells = entry
            .as_array()
            .ok_or_else(|| FetchError::malformed(source_id, format!("row {index} is not an array")))?;
        let [name, value, code] = cells.as_slice() else {
            return Err(FetchError::malformed(
                source_id,
                format!("row {index} has {} columns, expected 3", cells.len()),
            ));
        };

        let code = cell_text(code)
            .ok_or_else(|| FetchError::malformed(source_id, format!("row {index} has no region code")))?;
        if excluded.iter().any(|e| *e == code) {
            continue;
        }
        let region_code: u32 = code.parse().map_err(|_| {
            FetchError::malformed(source_id, format!("row {index} region code {code:?} is not numeric"))
        })?;
        let name = cell_text(name)
            .ok_or_else(|| FetchError::malformed(source_id, format!("row {index} has no name")))?;
        let value = cell_text(value)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| FetchError::malformed(source_id, format!("row {index} ({name}) has no numeric value")))?;

        rows.push(StatRow {
            name,
            value,
            region_code,
        });
    }

    if rows.is_empty() {
        return Err(FetchError::Empty {
            source_id: source_id.to_string(),
        });
    }
    Ok(rows)
}

/// The API sends every cell as a string, but tolerate bare numbers too.
fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
