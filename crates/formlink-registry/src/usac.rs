//! USAC Open Data Registry Implementation
//!
//! Queries the FCC Form 470 dataset published on USAC's Socrata portal.
//!
//! # Features
//!
//! - Exact-equality `$where` filter on `application_number`
//! - Optional Socrata app token for higher rate limits
//! - Request timeout so an unresponsive portal cannot stall the watcher
//! - Retry with exponential backoff on transport errors and 5xx responses
//!
//! # Examples
//!
//! ```no_run
//! use formlink_registry::UsacRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = UsacRegistry::default_endpoint()?.with_app_token("my-token");
//! # Ok(())
//! # }
//! ```

use crate::RegistryError;
use formlink_domain::traits::Registry;
use formlink_domain::RegistryRecord;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default FCC Form 470 dataset endpoint
pub const DEFAULT_ENDPOINT: &str = "https://opendata.usac.org/resource/jt8s-3q52.json";

/// Default timeout for registry requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per query
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Field holding the filing's application number
const APPLICATION_NUMBER_FIELD: &str = "application_number";

/// Field holding the link to the filing's PDF
const DOCUMENT_URL_FIELD: &str = "form_pdf";

/// USAC Open Data client
pub struct UsacRegistry {
    endpoint: String,
    app_token: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

impl UsacRegistry {
    /// Create a client for the given dataset endpoint
    ///
    /// # Parameters
    ///
    /// - `endpoint`: dataset URL (e.g. [`DEFAULT_ENDPOINT`])
    /// - `timeout`: per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            app_token: None,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a client for the public Form 470 dataset with default timeout
    pub fn default_endpoint() -> Result<Self, RegistryError> {
        Self::new(DEFAULT_ENDPOINT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Send a Socrata app token with every request
    pub fn with_app_token(mut self, token: impl Into<String>) -> Self {
        self.app_token = Some(token.into());
        self
    }

    /// Set the maximum number of attempts (at least one is always made)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Endpoint this client queries
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query records whose application number equals `key`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `key` is not a digit string
    /// - the request fails or times out on every attempt
    /// - the portal answers with a non-success status
    /// - the body is not a JSON array
    pub async fn query(&self, key: &str) -> Result<Vec<RegistryRecord>, RegistryError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_digit()) {
            return Err(RegistryError::InvalidKey(key.to_string()));
        }

        let filter = format!("{}='{}'", APPLICATION_NUMBER_FIELD, key);
        info!("Querying USAC registry with {}", filter);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut request = self
                .client
                .get(&self.endpoint)
                .query(&[("$where", filter.as_str())]);
            if let Some(token) = &self.app_token {
                request = request.header("X-App-Token", token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!("Registry response status: {}", status);

                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            RegistryError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        let records = parse_records(&body)?;
                        info!("Registry returned {} matching records", records.len());
                        return Ok(records);
                    } else if status.is_server_error() {
                        last_error = Some(RegistryError::Status(status.as_u16()));
                    } else {
                        return Err(RegistryError::Status(status.as_u16()));
                    }
                }
                Err(e) => {
                    last_error = Some(RegistryError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Registry query failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RegistryError::Communication("Max retries exceeded".to_string())
        }))
    }
}

impl Registry for UsacRegistry {
    type Error = RegistryError;

    async fn find_by_application_number(
        &self,
        application_number: &str,
    ) -> Result<Vec<RegistryRecord>, Self::Error> {
        self.query(application_number).await
    }
}

/// Convert a Socrata JSON array into registry records
fn parse_records(body: &Value) -> Result<Vec<RegistryRecord>, RegistryError> {
    let rows = body
        .as_array()
        .ok_or_else(|| RegistryError::InvalidResponse("Expected JSON array".to_string()))?;

    Ok(rows.iter().map(parse_record).collect())
}

/// Read one row; URL columns may be plain strings or `{ "url": ... }` objects
fn parse_record(row: &Value) -> RegistryRecord {
    let application_number = match row.get(APPLICATION_NUMBER_FIELD) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let document_url = match row.get(DOCUMENT_URL_FIELD) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj.get("url").and_then(|v| v.as_str()).map(str::to_string),
        _ => None,
    };

    RegistryRecord {
        application_number,
        document_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/resource/jt8s-3q52.json", addr)
    }

    fn client(endpoint: &str) -> UsacRegistry {
        UsacRegistry::new(endpoint, Duration::from_secs(5))
            .unwrap()
            .with_max_retries(1)
    }

    #[test]
    fn test_parse_string_and_object_urls() {
        let body = json!([
            { "application_number": "250001122", "form_pdf": "http://x/y.pdf" },
            { "application_number": "250001123", "form_pdf": { "url": "http://x/z.pdf" } },
            { "application_number": 250001124 }
        ]);
        let records = parse_records(&body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].document_url.as_deref(), Some("http://x/y.pdf"));
        assert_eq!(records[1].document_url.as_deref(), Some("http://x/z.pdf"));
        assert_eq!(records[2].application_number.as_deref(), Some("250001124"));
        assert!(records[2].document_url.is_none());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_records(&json!({ "error": true }));
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[test]
    fn test_registry_creation() {
        let registry = UsacRegistry::default_endpoint().unwrap().with_max_retries(0);
        assert_eq!(registry.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(registry.max_retries, 1);
        assert!(registry.app_token.is_none());
    }

    #[tokio::test]
    async fn test_invalid_key_is_rejected_before_request() {
        let registry = client("http://127.0.0.1:9/unused");
        let result = registry.query("25' OR '1'='1").await;
        assert!(matches!(result, Err(RegistryError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_query_sends_where_filter_and_token() {
        let router = Router::new().route(
            "/resource/jt8s-3q52.json",
            get(|Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                let filter = params.get("$where").cloned().unwrap_or_default();
                let token = headers
                    .get("X-App-Token")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if filter == "application_number='250001122'" && token == "secret" {
                    Json(json!([{ "application_number": "250001122", "form_pdf": "http://x/y.pdf" }]))
                } else {
                    Json(json!([]))
                }
            }),
        );
        let endpoint = serve(router).await;

        let records = client(&endpoint)
            .with_app_token("secret")
            .query("250001122")
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_url.as_deref(), Some("http://x/y.pdf"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new().route(
            "/resource/jt8s-3q52.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let endpoint = serve(router).await;

        let result = client(&endpoint).query("250001122").await;
        match result {
            Err(RegistryError::Status(503)) => {}
            other => panic!("Expected 503 status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_communication_error() {
        let registry = client("http://127.0.0.1:9/resource.json");
        let result = registry.query("250001122").await;
        assert!(matches!(result, Err(RegistryError::Communication(_))));
    }
}
