//! Async HTTP client for the backend barcode and stock endpoints.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::config::ScannerConfig;
use crate::errors::ScanError;
use crate::models::{ItemId, ScanResponse, TransferRequest};

/// Which barcode endpoint a dialog submits scans to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarcodeEndpoint {
    /// Generic scan: resolve a barcode to whatever it matches.
    #[default]
    Scan,
    /// Link: associate a barcode with an existing record.
    Link,
}

/// Client for the four backend operations the scanning workflows use:
/// barcode scan, barcode link, batch stock transfer, and barcode unlink.
#[derive(Debug, Clone)]
pub struct BarcodeClient {
    client: Client,
    config: ScannerConfig,
}

impl BarcodeClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: ScannerConfig) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(config, client))
    }

    /// Build a client from an existing `reqwest::Client` (useful for testing).
    pub fn with_client(config: ScannerConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Submit one barcode payload and deserialize the response envelope.
    ///
    /// `extra` carries caller-supplied payload fields beyond the barcode
    /// itself, e.g. the `stockitem` id for a link operation.
    #[instrument(skip(self, extra), fields(endpoint = ?endpoint))]
    pub async fn submit_barcode(
        &self,
        endpoint: BarcodeEndpoint,
        barcode: &str,
        extra: &Map<String, Value>,
    ) -> Result<ScanResponse, ScanError> {
        let mut body = Map::new();
        body.insert("barcode".to_string(), Value::String(barcode.to_string()));
        for (key, value) in extra {
            body.insert(key.clone(), value.clone());
        }

        let path = match endpoint {
            BarcodeEndpoint::Scan => &self.config.endpoints.scan,
            BarcodeEndpoint::Link => &self.config.endpoints.link,
        };

        let response = self
            .client
            .post(self.url(path))
            .headers(self.headers()?)
            .json(&Value::Object(body))
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &bytes));
        }

        let envelope: ScanResponse = serde_json::from_slice(&bytes)?;
        debug!(plugin = ?envelope.plugin, hash = ?envelope.hash, "barcode response received");
        Ok(envelope)
    }

    /// Resolve a barcode against the generic scan endpoint.
    pub async fn scan(
        &self,
        barcode: &str,
        extra: &Map<String, Value>,
    ) -> Result<ScanResponse, ScanError> {
        self.submit_barcode(BarcodeEndpoint::Scan, barcode, extra).await
    }

    /// Associate a scanned barcode with an existing stock item.
    pub async fn link(&self, barcode: &str, stockitem: ItemId) -> Result<ScanResponse, ScanError> {
        let mut extra = Map::new();
        extra.insert("stockitem".to_string(), Value::from(stockitem));
        self.submit_barcode(BarcodeEndpoint::Link, barcode, &extra)
            .await
    }

    /// Submit one batch stock transfer.
    #[instrument(skip(self, request), fields(location = request.location, items = request.items.len()))]
    pub async fn transfer(&self, request: &TransferRequest) -> Result<(), ScanError> {
        let response = self
            .client
            .post(self.url(&self.config.endpoints.transfer))
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await?;
            return Err(error_from_body(status, &bytes));
        }

        Ok(())
    }

    /// Clear the barcode association on a stock item.
    #[instrument(skip(self))]
    pub async fn unlink(&self, item: ItemId) -> Result<(), ScanError> {
        let path = format!("{}{}/", self.config.endpoints.stock_item, item);
        let response = self
            .client
            .patch(self.url(&path))
            .headers(self.headers()?)
            .json(&serde_json::json!({ "uid": "" }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await?;
            return Err(error_from_body(status, &bytes));
        }

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn headers(&self) -> Result<HeaderMap, ScanError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.config.api_token {
            let value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|_| ScanError::Config("invalid characters in API token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// Map a non-2xx response to an error, surfacing a server-provided message
/// when the body carries one.
fn error_from_body(status: reqwest::StatusCode, bytes: &[u8]) -> ScanError {
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        for key in ["error", "detail"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return ScanError::Server(message.to_string());
            }
        }
    }
    ScanError::Status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use reqwest::StatusCode;

    #[test]
    fn url_joins_base_and_path() {
        let client = BarcodeClient::new(ScannerConfig::for_base_url("http://inventory.local/"))
            .expect("client");
        assert_eq!(
            client.url("/api/barcode/"),
            "http://inventory.local/api/barcode/"
        );
    }

    #[test]
    fn error_body_with_detail_surfaces_message() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            br#"{"detail": "Authentication credentials were not provided."}"#,
        );
        assert_matches!(err, ScanError::Server(message) => {
            assert_eq!(message, "Authentication credentials were not provided.");
        });
    }

    #[test]
    fn opaque_error_body_falls_back_to_status() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_matches!(err, ScanError::Status(status) => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
        });
    }
}
