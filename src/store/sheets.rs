//! HTTP client for the Google Sheets `values` API.

use super::{Row, RowStore, SheetRange, StoreError};
use crate::config::SheetsConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: &'a [Row],
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Remote row store backed by a spreadsheet, authenticated with a static API key.
pub struct SheetsClient {
    http: Client,
    base_url: String,
    api_key: String,
    sheet_id: String,
}

impl SheetsClient {
    /// Builds the HTTP client. Missing credentials are not an error here; every call
    /// fails with [`StoreError::Configuration`] until they are supplied.
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            sheet_id: config.sheet_id.clone(),
        })
    }

    pub(crate) fn values_url(&self, range: &SheetRange) -> Result<Url, StoreError> {
        if self.api_key.trim().is_empty() || self.sheet_id.trim().is_empty() {
            return Err(StoreError::Configuration(
                "Google Sheets API key or Sheet ID not configured".to_string(),
            ));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::Configuration(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Configuration(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(&self.sheet_id)
            .push("values")
            .push(&range.to_string());
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Turns a non-success response into [`StoreError::Remote`].
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::remote(status.as_u16(), error_message(status.as_u16(), &body)))
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| format!("API Error: {status}"))
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RowStore for SheetsClient {
    #[instrument(skip(self), fields(range = %range))]
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Row>, StoreError> {
        let url = self.values_url(range)?;
        let response = self.http.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Read failed");
            StoreError::from(e)
        })?;
        let body: ValueRange = check_status(response).await?.json().await?;
        debug!(rows = body.values.len(), "Read");

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    #[instrument(skip(self, rows), fields(range = %range, rows = rows.len()))]
    async fn write_range(&self, range: &SheetRange, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut url = self.values_url(range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let response = self
            .http
            .put(url)
            .json(&ValueRangeBody { values: &rows })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Write failed");
                StoreError::from(e)
            })?;
        check_status(response).await?;
        debug!("Written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, sheet_id: &str) -> SheetsConfig {
        SheetsConfig {
            api_key: api_key.to_string(),
            sheet_id: sheet_id.to_string(),
            ..SheetsConfig::default()
        }
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = SheetsClient::new(&config("k3y", "sheet-1")).unwrap();
        let url = client
            .values_url(&SheetRange::columns("Medicines", 15))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-1/values/Medicines!A:O?key=k3y"
        );

        let url = client
            .values_url(&SheetRange::row("Main Store", 4, 3))
            .unwrap();
        assert!(url.path().ends_with("/values/Main%20Store!A3:D3"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_request() {
        let client = SheetsClient::new(&config("", "sheet-1")).unwrap();
        let err = client
            .read_range(&SheetRange::columns("Users", 7))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));

        let client = SheetsClient::new(&config("k3y", " ")).unwrap();
        let err = client
            .write_range(&SheetRange::row("Users", 7, 2), vec![vec!["x".into()]])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
    }

    #[test]
    fn test_error_message_prefers_envelope() {
        let body = r#"{"error":{"code":400,"message":"Unable to parse range: Nope!A:B"}}"#;
        assert_eq!(error_message(400, body), "Unable to parse range: Nope!A:B");
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "API Error: 502");
        assert_eq!(error_message(500, r#"{"error":{}}"#), "API Error: 500");
    }

    #[test]
    fn test_cells_are_stringified() {
        assert_eq!(cell_text(Value::String("10".into())), "10");
        assert_eq!(cell_text(serde_json::json!(12)), "12");
        assert_eq!(cell_text(serde_json::json!(true)), "true");
        assert_eq!(cell_text(Value::Null), "");
    }
}
