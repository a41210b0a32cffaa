//! Credential resolution
//!
//! Combines the declared provider configuration with the process environment.
//! Precedence, highest first: a declared non-empty value, then the
//! environment variable, then nothing. Every problem is collected so the
//! operator sees all missing or unresolved fields at once.

use std::collections::HashMap;
use std::fmt;

use dynext_domain::constants::{API_TOKEN_VAR, ENV_URL_VAR};
use dynext_domain::{ConfigValue, Credentials, DynextError, ProviderConfig, Result};
use tracing::debug;

/// Read-only view of environment variables.
pub trait EnvSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, used where the process environment must not be
/// touched.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Which credential field a problem concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    EnvUrl,
    ApiToken,
}

impl CredentialField {
    pub fn attribute(self) -> &'static str {
        match self {
            Self::EnvUrl => "env_url",
            Self::ApiToken => "api_token",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            Self::EnvUrl => ENV_URL_VAR,
            Self::ApiToken => API_TOKEN_VAR,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::EnvUrl => "Dynatrace environment URL",
            Self::ApiToken => "Dynatrace API token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    Unresolved,
}

/// A single field that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialIssue {
    pub field: CredentialField,
    pub kind: IssueKind,
}

impl CredentialIssue {
    pub fn summary(&self) -> String {
        match self.kind {
            IssueKind::Missing => format!("Missing {}", self.field.label()),
            IssueKind::Unresolved => format!("Unknown {}", self.field.label()),
        }
    }

    pub fn detail(&self) -> String {
        match self.kind {
            IssueKind::Missing => format!(
                "The provider cannot create the Dynatrace API client because the {label} is \
                 empty. Set the {attr} value in the configuration or use the {var} environment \
                 variable.",
                label = self.field.label(),
                attr = self.field.attribute(),
                var = self.field.env_var(),
            ),
            IssueKind::Unresolved => format!(
                "The provider cannot create the Dynatrace API client because the {label} is not \
                 known yet. Either apply the source of the value first, set the value statically \
                 in the configuration, or use the {var} environment variable.",
                label = self.field.label(),
                var = self.field.env_var(),
            ),
        }
    }
}

impl fmt::Display for CredentialIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Resolve credentials, reporting every problem individually.
pub fn resolve_detailed(
    config: &ProviderConfig,
    env: &dyn EnvSource,
) -> std::result::Result<Credentials, Vec<CredentialIssue>> {
    let mut issues = Vec::new();

    let env_url = resolve_field(&config.env_url, CredentialField::EnvUrl, env, &mut issues);
    let api_token = resolve_field(&config.api_token, CredentialField::ApiToken, env, &mut issues);

    match (env_url, api_token) {
        (Some(url), Some(token)) if issues.is_empty() => Ok(Credentials::new(url, token)),
        _ => Err(issues),
    }
}

/// Resolve credentials into a single configuration error on failure.
pub fn resolve_credentials(config: &ProviderConfig, env: &dyn EnvSource) -> Result<Credentials> {
    resolve_detailed(config, env).map_err(|issues| {
        let message = issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        DynextError::config(message)
    })
}

fn resolve_field(
    declared: &ConfigValue<String>,
    field: CredentialField,
    env: &dyn EnvSource,
    issues: &mut Vec<CredentialIssue>,
) -> Option<String> {
    match declared {
        ConfigValue::Unresolved => {
            issues.push(CredentialIssue { field, kind: IssueKind::Unresolved });
            None
        }
        ConfigValue::Value(value) if !value.trim().is_empty() => {
            debug!(field = field.attribute(), source = "declared", "credential field resolved");
            Some(value.clone())
        }
        ConfigValue::Value(_) | ConfigValue::Unset => {
            match env.get(field.env_var()).filter(|v| !v.trim().is_empty()) {
                Some(value) => {
                    debug!(field = field.attribute(), source = "environment", "credential field resolved");
                    Some(value)
                }
                None => {
                    issues.push(CredentialIssue { field, kind: IssueKind::Missing });
                    None
                }
            }
        }
    }
}
