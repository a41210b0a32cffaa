//! The `dynatraceextension` provider
//!
//! Configure resolves credentials, loads runtime settings and connects to the
//! environment. Any problem comes back as diagnostics and no provider data
//! is produced.

use std::sync::Arc;

use dynext_domain::constants::PROVIDER_TYPE_NAME;
use dynext_domain::ProviderConfig;
use dynext_infra::config::{load_settings, resolve_detailed, EnvSource, ProcessEnv};
use dynext_infra::DynatraceClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::context::{ProviderContext, ProviderData};
use crate::data_sources::ExtensionsDataSource;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::resources::ExtensionResource;
use crate::schema::{Attribute, Schema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub type_name: &'static str,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub config: ProviderConfig,
}

#[derive(Default)]
pub struct ConfigureResponse {
    /// Handed to resources and data sources; `None` if configure failed.
    pub provider_data: Option<ProviderData>,
    pub diagnostics: Diagnostics,
}

pub struct DynatraceExtensionProvider {
    version: String,
    env: Arc<dyn EnvSource>,
}

impl DynatraceExtensionProvider {
    /// `version` is the release version, `dev` for local builds and `test`
    /// under acceptance tests.
    pub fn new(version: impl Into<String>) -> Self {
        Self { version: version.into(), env: Arc::new(ProcessEnv) }
    }

    /// Read environment variables from `env` instead of the process.
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata { type_name: PROVIDER_TYPE_NAME, version: self.version.clone() }
    }

    pub fn schema() -> Schema {
        Schema::new(
            "Manage Dynatrace extensions through the configuration API.",
            vec![
                Attribute::optional(
                    "env_url",
                    "URL of the Dynatrace environment. May also be set with DYNATRACE_ENV_URL.",
                ),
                Attribute::optional(
                    "api_token",
                    "API token with extension permissions. May also be set with DYNATRACE_API_TOKEN.",
                )
                .sensitive(),
            ],
        )
    }

    pub fn resource_types(&self) -> Vec<String> {
        vec![ExtensionResource::type_name(PROVIDER_TYPE_NAME)]
    }

    pub fn data_source_types(&self) -> Vec<String> {
        vec![ExtensionsDataSource::type_name(PROVIDER_TYPE_NAME)]
    }

    #[instrument(skip(self, request, cancel), fields(version = %self.version))]
    pub async fn configure(
        &self,
        request: ConfigureRequest,
        cancel: &CancellationToken,
    ) -> ConfigureResponse {
        let mut response = ConfigureResponse::default();

        let credentials = match resolve_detailed(&request.config, self.env.as_ref()) {
            Ok(credentials) => credentials,
            Err(issues) => {
                for issue in issues {
                    response.diagnostics.push(
                        Diagnostic::error(issue.summary(), issue.detail())
                            .with_attribute(issue.field.attribute()),
                    );
                }
                warn!(errors = response.diagnostics.len(), "provider configuration incomplete");
                return response;
            }
        };

        let settings = match load_settings(self.env.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                response.diagnostics.push(Diagnostic::from_error("Invalid provider settings", &err));
                return response;
            }
        };

        match DynatraceClient::connect(&credentials, settings.client, cancel).await {
            Ok(client) => {
                let context = ProviderContext::new(Arc::new(client), settings.update_policy);
                response.provider_data = Some(context.into_provider_data());
                info!(env_url = %credentials.env_url(), "provider configured");
            }
            Err(err) => {
                response.diagnostics.push(Diagnostic::from_error(
                    "Unable to Create Dynatrace API Client",
                    &err,
                ));
            }
        }

        response
    }
}
