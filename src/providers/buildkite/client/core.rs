use log::warn;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use url::Url;

use crate::auth::Token;
use crate::error::{BuildLensError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.buildkite.com/v2/";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Transport behavior shared by every request made through one client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Upper bound on requests in flight at once
    pub max_concurrent_requests: usize,
    /// Retries after the first attempt for connection errors, 429 and 5xx
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Per-request timeout, covering connect through body download
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

pub struct BuildkiteClient {
    client: Client,
    api_url: Url,
    token: Token,
    settings: ClientSettings,
    semaphore: Arc<Semaphore>,
}

impl BuildkiteClient {
    pub fn new(base_url: &str, token: Token, settings: ClientSettings) -> Result<Self> {
        if settings.max_concurrent_requests == 0 {
            return Err(BuildLensError::Config(
                "max concurrent requests must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(concat!("BuildLens/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| BuildLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| BuildLensError::Config(format!("Invalid base URL: {e}")))?;

        if api_url.cannot_be_a_base() {
            return Err(BuildLensError::Config(format!(
                "Base URL cannot carry a path: {base_url}"
            )));
        }

        Ok(Self {
            client,
            api_url,
            token,
            semaphore: Arc::new(Semaphore::new(settings.max_concurrent_requests)),
            settings,
        })
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.settings.max_concurrent_requests
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.token.as_str())
    }

    /// Builds `{base}/organizations/{org}/pipelines/{pipeline}/builds`,
    /// percent-encoding both identifiers.
    pub fn builds_url(&self, organization_id: &str, pipeline_id: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| BuildLensError::Config("Invalid API base URL".to_string()))?
            .pop_if_empty()
            .extend(["organizations", organization_id, "pipelines", pipeline_id, "builds"]);
        Ok(url)
    }

    /// Waits for a free request slot; the slot is released when the permit drops.
    pub(super) async fn acquire_permit(&self) -> Result<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| BuildLensError::LimiterClosed)
    }

    /// Execute a GET request with automatic retry on network errors, rate limits
    /// and server errors. Any other non-success status fails immediately.
    pub(super) async fn get_with_retry(
        &self,
        url: &Url,
        query: &[(&str, String)],
    ) -> Result<Response> {
        let max_retries = self.settings.max_retries;
        let retry_delay = self.settings.retry_delay;

        let mut retry_count = 0;
        loop {
            let request = self.auth_request(self.client.get(url.clone()).query(query));

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    if retry_count >= max_retries {
                        return Err(e.into());
                    }
                    warn!(
                        "Network error ({}), retrying in {:?} ({}/{})...",
                        e,
                        retry_delay,
                        retry_count + 1,
                        max_retries
                    );
                    tokio::time::sleep(retry_delay).await;
                    retry_count += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status == 429 || status.is_server_error() {
                if retry_count >= max_retries {
                    return Err(BuildLensError::ApiErrorAfterRetries {
                        status: status.as_u16(),
                        retries: max_retries,
                    });
                }

                warn!(
                    "Buildkite API error (status {status}). Waiting {retry_delay:?} before retry {}/{}...",
                    retry_count + 1,
                    max_retries
                );

                tokio::time::sleep(retry_delay).await;
                retry_count += 1;
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                return Err(BuildLensError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                });
            }

            return Ok(response);
        }
    }
}
