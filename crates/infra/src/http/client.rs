use std::time::Duration;

use dynext_domain::constants::{DEFAULT_BASE_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS, REQUEST_TIMEOUT_SECS};
use dynext_domain::DynextError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with built-in timeout, transport retry and cancellation.
///
/// Only transport failures (connect errors, timeouts) are retried. Any HTTP
/// response, whatever its status, is handed back to the caller untouched.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Attempt budget used by [`HttpClient::send`].
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execute the provided request builder with the configured retry budget.
    pub async fn send(
        &self,
        builder: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, DynextError> {
        self.send_with_attempts(builder, self.max_attempts, cancel).await
    }

    /// Execute the request with an explicit attempt budget (initial try +
    /// retries). A budget of 1 disables retries for this call.
    ///
    /// A timeout is only retried for idempotent methods: the server may have
    /// acted on a request whose response never arrived.
    pub async fn send_with_attempts(
        &self,
        builder: RequestBuilder,
        attempts: usize,
        cancel: &CancellationToken,
    ) -> Result<Response, DynextError> {
        let attempts = attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                DynextError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(|err| {
                let infra: InfraError = err.into();
                DynextError::from(infra)
            })?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            let outcome = tokio::select! {
                () = cancel.cancelled() => return Err(DynextError::Cancelled),
                outcome = self.client.execute(request) => outcome,
            };

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err, &method) {
                        self.sleep_with_backoff(attempt + 1, cancel).await?;
                        continue;
                    }

                    let infra: InfraError = err.into();
                    return Err(DynextError::from(infra));
                }
            }
        }

        Err(DynextError::Internal(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(
        &self,
        retry_number: usize,
        cancel: &CancellationToken,
    ) -> Result<(), DynextError> {
        let delay = self.backoff_delay(retry_number);
        if delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            () = cancel.cancelled() => Err(DynextError::Cancelled),
            () = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Overall per-attempt timeout (connect + response body).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles for each further retry.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// `User-Agent` sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, DynextError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            DynextError::from(infra)
        })?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_error(err: &reqwest::Error, method: &Method) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    err.is_timeout() && method.is_idempotent()
}
