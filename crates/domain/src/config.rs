//! Provider configuration types
//!
//! Declared configuration values come from the host framework and may be in
//! one of three states: not declared at all, declared but not yet known (for
//! example derived from another resource that has not been applied), or a
//! concrete value. Collapsing these into an empty string would lose the
//! difference between "wait" and "missing".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-valued declared configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ConfigValue<T> {
    /// Not declared by the operator.
    #[default]
    Unset,
    /// Declared, but its value is not known at evaluation time.
    Unresolved,
    /// Declared with a concrete value.
    Value(T),
}

impl<T> ConfigValue<T> {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Concrete value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Unresolved => None,
        }
    }
}

impl<T> From<Option<T>> for ConfigValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Value)
    }
}

/// Provider-level declaration as handed over by the host framework.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub env_url: ConfigValue<String>,
    #[serde(default)]
    pub api_token: ConfigValue<String>,
}

impl ProviderConfig {
    pub fn new(env_url: ConfigValue<String>, api_token: ConfigValue<String>) -> Self {
        Self { env_url, api_token }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match &self.api_token {
            ConfigValue::Unset => "Unset",
            ConfigValue::Unresolved => "Unresolved",
            ConfigValue::Value(_) => "Value(<redacted>)",
        };
        f.debug_struct("ProviderConfig")
            .field("env_url", &self.env_url)
            .field("api_token", &token)
            .finish()
    }
}

/// Effective endpoint and token after resolution.
///
/// Both fields are guaranteed non-empty by the resolver.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    env_url: String,
    api_token: String,
}

impl Credentials {
    pub fn new(env_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self { env_url: env_url.into(), api_token: api_token.into() }
    }

    pub fn env_url(&self) -> &str {
        &self.env_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("env_url", &self.env_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
