//! Dynatrace configuration API client
//!
//! Owns request construction (base path, authentication, accept header) and
//! the mapping of responses into typed results. A client is only handed out
//! after the connectivity check in [`super::validation`] has passed.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use dynext_core::ExtensionApi;
use dynext_domain::constants::{
    ACCEPT_JSON, API_TOKEN_SCHEME, CONFIGURATION_API_PATH, DEFAULT_BASE_BACKOFF_MS,
    DEFAULT_MAX_ATTEMPTS, EXTENSIONS_PATH, REQUEST_TIMEOUT_SECS, VALIDATION_PAGE_SIZE,
};
use dynext_domain::{CreatedExtension, Credentials, DynextError, ExtensionId, ExtensionListPage, Result};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use url::Url;

use super::types::{CreateExtensionResponse, GetExtensionsResponse};
use super::validation;
use crate::errors::InfraError;
use crate::http::HttpClient;

const OCTET_STREAM: &str = "application/octet-stream";

/// Transport tuning for [`DynatraceClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynatraceClientConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Attempts for transport failures (initial try + retries).
    pub max_attempts: usize,
    /// Delay before the first retry.
    pub base_backoff: Duration,
    /// Page size of the connectivity check listing.
    pub validation_page_size: u32,
    /// `User-Agent` header; `None` leaves reqwest's default.
    pub user_agent: Option<String>,
}

impl Default for DynatraceClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            validation_page_size: VALIDATION_PAGE_SIZE,
            user_agent: Some(concat!("dynext/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// How a 404 is interpreted for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Addresses a single extension by id; 404 means it does not exist.
    Entity,
    /// Addresses the collection; 404 is an ordinary remote failure.
    Collection,
}

/// Long-lived session against one Dynatrace environment.
///
/// Immutable after construction and cheap to share behind an `Arc`.
pub struct DynatraceClient {
    env_url: String,
    api_base: String,
    authorization: HeaderValue,
    http: HttpClient,
    config: DynatraceClientConfig,
}

impl DynatraceClient {
    /// Build a client and verify that the credentials are usable.
    ///
    /// # Errors
    /// - `DynextError::Config` if the endpoint or token is empty, or the
    ///   endpoint is not an absolute http(s) URL.
    /// - Any error of the connectivity check, verbatim.
    #[instrument(skip(credentials, config, cancel), fields(env_url = %credentials.env_url()))]
    pub async fn connect(
        credentials: &Credentials,
        config: DynatraceClientConfig,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let client = Self::build(credentials, config)?;
        let report = validation::check_connectivity(&client, cancel).await?;
        info!(total_results = report.total_results, "connected to Dynatrace environment");
        Ok(client)
    }

    /// Build without running the connectivity check.
    pub(crate) fn build(credentials: &Credentials, config: DynatraceClientConfig) -> Result<Self> {
        let env_url = normalize_endpoint(credentials.env_url())?;

        let token = credentials.api_token().trim();
        if token.is_empty() {
            return Err(DynextError::config("Dynatrace API token must not be empty"));
        }
        let mut authorization = HeaderValue::from_str(&format!("{API_TOKEN_SCHEME} {token}"))
            .map_err(|_| DynextError::config("Dynatrace API token contains invalid characters"))?;
        authorization.set_sensitive(true);

        let mut builder = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .base_backoff(config.base_backoff);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder.build()?;

        let api_base = format!("{env_url}{CONFIGURATION_API_PATH}");
        debug!(%api_base, "Dynatrace client built");

        Ok(Self { env_url, api_base, authorization, http, config })
    }

    /// Normalized environment URL, without a trailing `/`.
    pub fn env_url(&self) -> &str {
        &self.env_url
    }

    /// Transport settings the client was built with.
    pub fn config(&self) -> &DynatraceClientConfig {
        &self.config
    }

    /// Fetch one listing page, bounded to `attempts` tries.
    pub(crate) async fn list_page(
        &self,
        page_size: u32,
        page_key: Option<&str>,
        attempts: usize,
        cancel: &CancellationToken,
    ) -> Result<ExtensionListPage> {
        let mut query = vec![("pageSize", page_size.to_string())];
        if let Some(key) = page_key {
            query.push(("nextPageKey", key.to_string()));
        }

        let builder = self.request(Method::GET, EXTENSIONS_PATH).query(&query);
        let response = self.http.send_with_attempts(builder, attempts, cancel).await?;
        let body = self.read_success(response, Target::Collection, cancel).await?;

        let decoded: GetExtensionsResponse = serde_json::from_str(&body).map_err(InfraError::from)?;
        let page = ExtensionListPage::from(decoded);
        debug!(
            items = page.extensions.len(),
            total_results = page.total_results,
            has_more = !page.is_last(),
            "extension page received"
        );
        Ok(page)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, ACCEPT_JSON)
    }

    /// Turn a non-success response into the matching error, returning the
    /// body text of a success response.
    ///
    /// A success body must be valid UTF-8; error bodies are kept lossily so
    /// the platform's message always reaches the caller.
    async fn read_success(
        &self,
        response: Response,
        target: Target,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let status = response.status();
        let body = read_body(response, cancel).await?;

        if status.is_success() {
            return String::from_utf8(body).map_err(|err| {
                DynextError::decoding(format!("response body is not valid UTF-8: {err}"))
            });
        }

        debug!(status = status.as_u16(), ?target, "Dynatrace API returned an error");
        Err(status_error(status, String::from_utf8_lossy(&body).into_owned(), target))
    }
}

impl fmt::Debug for DynatraceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynatraceClient")
            .field("env_url", &self.env_url)
            .field("api_token", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl ExtensionApi for DynatraceClient {
    #[instrument(skip(self, cancel))]
    async fn list_extensions(
        &self,
        page_size: u32,
        page_key: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ExtensionListPage> {
        self.list_page(page_size, page_key, self.http.max_attempts(), cancel).await
    }

    #[instrument(skip(self, payload, cancel), fields(payload_len = payload.len()))]
    async fn create_extension(
        &self,
        payload: &str,
        cancel: &CancellationToken,
    ) -> Result<CreatedExtension> {
        let builder = self
            .request(Method::POST, EXTENSIONS_PATH)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(payload.to_owned());
        let response = self.http.send(builder, cancel).await?;
        let body = self.read_success(response, Target::Collection, cancel).await?;

        let decoded: CreateExtensionResponse =
            serde_json::from_str(&body).map_err(InfraError::from)?;
        let created = CreatedExtension::try_from(decoded)?;
        info!(id = %created.id, name = %created.name, "extension created");
        Ok(created)
    }

    #[instrument(skip(self, id, cancel), fields(id = %id))]
    async fn get_extension_binary(
        &self,
        id: &ExtensionId,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let builder = self.request(Method::GET, &extension_path(id));
        let response = self.http.send(builder, cancel).await?;
        self.read_success(response, Target::Entity, cancel).await
    }

    #[instrument(skip(self, id, cancel), fields(id = %id))]
    async fn delete_extension(&self, id: &ExtensionId, cancel: &CancellationToken) -> Result<()> {
        let builder = self.request(Method::DELETE, &extension_path(id));
        let response = self.http.send(builder, cancel).await?;
        self.read_success(response, Target::Entity, cancel).await?;
        info!("extension deleted");
        Ok(())
    }
}

fn extension_path(id: &ExtensionId) -> String {
    format!("{EXTENSIONS_PATH}/{}", urlencoding::encode(id.as_str()))
}

fn status_error(status: StatusCode, body: String, target: Target) -> DynextError {
    match target {
        Target::Entity => DynextError::from_status(status.as_u16(), body),
        Target::Collection => DynextError::RemoteApi { status: status.as_u16(), body },
    }
}

async fn read_body(response: Response, cancel: &CancellationToken) -> Result<Vec<u8>> {
    tokio::select! {
        () = cancel.cancelled() => Err(DynextError::Cancelled),
        body = response.bytes() => body.map(|bytes| bytes.to_vec()).map_err(|err| InfraError::from(err).into()),
    }
}

/// Trim a trailing `/` and require an absolute http(s) URL with a host.
fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(DynextError::config("Dynatrace environment URL must not be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| DynextError::config(format!("Invalid Dynatrace environment URL '{trimmed}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(DynextError::config(format!(
            "Dynatrace environment URL must be an absolute http(s) URL, got '{trimmed}'"
        )));
    }

    Ok(trimmed.to_string())
}
