//! HTTP client for the MyController REST API.
//!
//! [`McClient`] implements the data-access traits against a running server,
//! so the controllers can be used unchanged by any front end.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mycontroller_core::client::McClient;
//! use mycontroller_core::controllers::UnitsSettingsController;
//! use mycontroller_core::services::Services;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = McClient::new("http://localhost:8443")?.with_basic_auth("admin", Some("admin"));
//! let services = Services::builder(Arc::new(client)).build();
//!
//! let mut units = UnitsSettingsController::new(services);
//! units.activate().await;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use mycontroller_types::{Firmware, GlobalConfig, GroupKind, TypeOption};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SettingsError};
use crate::traits::{ConfigService, FirmwareService, SettingsService, TypesService};

/// Path of the REST API below the server root.
const API_PREFIX: &str = "/mc/rest";

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: Option<String>,
}

/// HTTP client for a MyController server.
#[derive(Debug, Clone)]
pub struct McClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl McClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root URL of the server (e.g., "http://localhost:8443")
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_url(base_url)?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| SettingsError::unreachable(&base_url, e))?;

        Ok(Self {
            client,
            base_url,
            credentials: None,
        })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_url(base_url)?,
            credentials: None,
        })
    }

    /// Send HTTP basic credentials with every request.
    #[must_use]
    pub fn with_basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.map(String::from),
        });
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, creds.password.as_deref()),
            None => request,
        }
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| SettingsError::unreachable(&url, e))?;

        let bytes = check_status(response)
            .await?
            .bytes()
            .await
            .map_err(|e| SettingsError::unreachable(&url, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn put_json(&self, path: &str, body: &Value) -> Result<()> {
        let url = self.url(path);
        debug!("PUT {}", url);
        let response = self
            .authorize(self.client.put(&url).json(body))
            .send()
            .await
            .map_err(|e| SettingsError::unreachable(&url, e))?;

        check_status(response).await?;
        Ok(())
    }
}

/// Trim the trailing slash and require an http(s) scheme.
fn normalize_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(SettingsError::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }
    Ok(base_url)
}

/// Pass 2xx responses through; turn anything else into an API error.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| status.to_string());

    Err(SettingsError::api(status.as_u16(), message))
}

fn error_message(body: &Value) -> Option<String> {
    ["error", "message", "errorMessage"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(String::from)
}

#[async_trait]
impl SettingsService for McClient {
    async fn fetch(&self, kind: GroupKind) -> Result<Value> {
        self.get(&format!("/settings/{}", kind.resource())).await
    }

    async fn store(&self, kind: GroupKind, value: Value) -> Result<()> {
        self.put_json(&format!("/settings/{}", kind.resource()), &value)
            .await
    }
}

#[async_trait]
impl ConfigService for McClient {
    async fn config(&self) -> Result<GlobalConfig> {
        self.get("/status/mcConfig").await
    }
}

#[async_trait]
impl FirmwareService for McClient {
    async fn firmware(&self, ref_id: &str) -> Result<Firmware> {
        self.get(&format!("/firmwares/{}", ref_id)).await
    }
}

#[async_trait]
impl TypesService for McClient {
    async fn languages(&self) -> Result<Vec<TypeOption>> {
        self.get("/types/languages").await
    }

    async fn log_levels(&self) -> Result<Vec<TypeOption>> {
        self.get("/types/resourceLogsLogLevels").await
    }

    async fn firmwares(&self) -> Result<Vec<TypeOption>> {
        self.get("/types/firmwares").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = McClient::new("http://localhost:8443");
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:8443");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = McClient::new("https://mc.example.org/").unwrap();
        assert_eq!(client.base_url(), "https://mc.example.org");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = McClient::new("localhost:8443");
        assert!(matches!(result, Err(SettingsError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_urls() {
        let client = McClient::new("http://localhost:8443").unwrap();
        assert_eq!(
            client.url(&format!("/settings/{}", GroupKind::MetricsRetention.resource())),
            "http://localhost:8443/mc/rest/settings/metricsRetention"
        );
        assert_eq!(
            client.url("/status/mcConfig"),
            "http://localhost:8443/mc/rest/status/mcConfig"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(&json!({"error": "Invalid token"})).as_deref(),
            Some("Invalid token")
        );
        assert_eq!(
            error_message(&json!({"message": "Forbidden"})).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(error_message(&json!({"code": 3})), None);
    }

    #[test]
    fn test_basic_auth_is_kept() {
        let client = McClient::new("http://localhost:8443")
            .unwrap()
            .with_basic_auth("admin", None);
        assert_eq!(
            client.credentials.as_ref().map(|c| c.username.as_str()),
            Some("admin")
        );
    }
}
