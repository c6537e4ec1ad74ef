//! Authenticated HTTP client with token refresh
//!
//! Provides a client that handles:
//! - Bearer-token injection from the credential store
//! - A single refresh-and-retry cycle on auth failure (401/403)
//! - Session invalidation when the refresh itself fails
//! - Pass-through of every other response, status and body untouched

use crate::error::{Error, Result};
use crate::session::SessionEvents;
use crate::store::{Credential, CredentialStore};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default path of the refresh-token exchange endpoint
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";

/// Configuration for the authenticated client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all relative paths resolve against
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Path of the refresh-token endpoint, relative to the base URL
    pub refresh_path: String,
    /// Statuses that trigger the refresh-and-retry cycle
    pub auth_failure_statuses: Vec<u16>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a config with defaults for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            auth_failure_statuses: vec![401, 403],
            default_headers: HashMap::new(),
            user_agent: format!("intake-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Create a new config builder
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(base_url),
        }
    }
}

/// Builder for the client config
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the refresh endpoint path
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.config.refresh_path = path.into();
        self
    }

    /// Set which statuses trigger the refresh cycle
    pub fn auth_failure_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.config.auth_failure_statuses = statuses.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Body of the refresh-token exchange request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// HTTP client with bearer injection and refresh-and-retry
pub struct AuthClient {
    client: Client,
    config: ClientConfig,
    store: Arc<dyn CredentialStore>,
    session: Arc<SessionEvents>,
}

impl AuthClient {
    /// Create a client over the given credential store
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            config,
            store,
            session: Arc::new(SessionEvents::new()),
        }
    }

    /// The credential store this client reads and writes
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Session event registry, for registering invalidation handlers
    pub fn session(&self) -> &SessionEvents {
        &self.session
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request(Method::GET, path, RequestConfig::default())
            .await
    }

    /// Make a GET request with config
    pub async fn get_with_config(&self, path: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::GET, path, config).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, path, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, path, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request(Method::DELETE, path, RequestConfig::default())
            .await
    }

    /// Make a generic request.
    ///
    /// The request is sent at most twice: once with whatever credential is
    /// currently stored, and once more after a successful token refresh if
    /// the first send came back as an auth failure. The one-shot `retried`
    /// flag is what bounds the cycle; a permanently invalid session fails
    /// instead of looping.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(path);
        let mut retried = false;

        loop {
            // Build request
            let mut req = self.client.request(method.clone(), &full_url);

            // Add default headers
            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }

            // Add request-specific headers
            for (key, value) in &config.headers {
                req = req.header(key.as_str(), value.as_str());
            }

            // Add query parameters
            if !config.query.is_empty() {
                req = req.query(&config.query);
            }

            // Add body
            if let Some(ref body) = config.body {
                req = req.json(body);
            }

            // Override timeout
            if let Some(timeout) = config.timeout {
                req = req.timeout(timeout);
            }

            // Attach the current credential; if none is stored, send
            // unauthenticated and let the server reject if it cares
            if let Some(credential) = self.store.get() {
                req = req.header(AUTHORIZATION, credential.bearer());
            }

            // Send request. Transport errors are not retried here.
            let response = req.send().await.map_err(Error::Http)?;
            let status = response.status();

            if status.is_success() {
                debug!("Request succeeded: {} {}", method, full_url);
                return Ok(response);
            }

            if self.is_auth_failure(status) && !retried {
                retried = true;
                warn!(
                    "Auth failure ({}) on {} {}, attempting token refresh",
                    status.as_u16(),
                    method,
                    full_url
                );

                // No credential means nothing to refresh with
                let Some(credential) = self.store.get() else {
                    return Err(Error::SessionExpired);
                };

                match self.refresh(&credential.refresh_token).await {
                    Ok(renewed) => {
                        // Every send re-reads the store, so persisting here
                        // covers both the retry and all future requests
                        self.store.set(renewed);
                        continue;
                    }
                    Err(e) => {
                        warn!("Token refresh failed, invalidating session: {e}");
                        self.store.clear();
                        self.session.notify_invalidated();
                        return Err(e);
                    }
                }
            }

            // Auth failure after the retry, or any other non-2xx: pass the
            // status and body through untouched
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), body));
        }
    }

    /// Make a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, path, config).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::GET, path, RequestConfig::default())
            .await
    }

    /// Make a POST request and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::POST, path, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request and parse the JSON response
    pub async fn put_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::PUT, path, RequestConfig::default().json(body))
            .await
    }

    /// Exchange the refresh token for a new credential pair.
    ///
    /// Goes out through the same underlying client, so the stale bearer
    /// rides along like on any other call; the endpoint reads the refresh
    /// token from the body and ignores the header. Strictly 200 with a
    /// well-formed pair counts as success.
    async fn refresh(&self, refresh_token: &str) -> Result<Credential> {
        let url = self.build_url(&self.config.refresh_path);
        debug!("Exchanging refresh token at {url}");

        let mut req = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token });

        if let Some(credential) = self.store.get() {
            req = req.header(AUTHORIZATION, credential.bearer());
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::refresh_failed(format!("refresh request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::refresh_failed(format!(
                "refresh endpoint returned {}: {body}",
                status.as_u16()
            )));
        }

        response
            .json::<Credential>()
            .await
            .map_err(|e| Error::refresh_failed(format!("malformed refresh response: {e}")))
    }

    /// Check whether a status triggers the refresh cycle
    fn is_auth_failure(&self, status: StatusCode) -> bool {
        self.config.auth_failure_statuses.contains(&status.as_u16())
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("config", &self.config)
            .field("has_credential", &self.store.get().is_some())
            .finish_non_exhaustive()
    }
}
