//! Runtime settings loader
//!
//! Transport tuning and the update policy can be overridden through the
//! environment. Every variable is optional; unset variables keep the defaults
//! of [`DynatraceClientConfig`] and [`UpdatePolicy`].
//!
//! ## Environment Variables
//! - `DYNEXT_HTTP_TIMEOUT_SECS`: Per-attempt request timeout in seconds
//! - `DYNEXT_HTTP_MAX_ATTEMPTS`: Attempts for transport failures (>= 1)
//! - `DYNEXT_HTTP_BACKOFF_MS`: Base retry backoff in milliseconds
//! - `DYNEXT_USER_AGENT`: User agent sent with every request
//! - `DYNEXT_UPDATE_POLICY`: `replace` or `reject`

use std::str::FromStr;
use std::time::Duration;

use dynext_domain::{DynextError, Result, UpdatePolicy};

use super::credentials::EnvSource;
use crate::dynatrace::DynatraceClientConfig;

pub const TIMEOUT_VAR: &str = "DYNEXT_HTTP_TIMEOUT_SECS";
pub const MAX_ATTEMPTS_VAR: &str = "DYNEXT_HTTP_MAX_ATTEMPTS";
pub const BACKOFF_VAR: &str = "DYNEXT_HTTP_BACKOFF_MS";
pub const USER_AGENT_VAR: &str = "DYNEXT_USER_AGENT";
pub const UPDATE_POLICY_VAR: &str = "DYNEXT_UPDATE_POLICY";

/// Settings that shape the client and the lifecycle controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub client: DynatraceClientConfig,
    pub update_policy: UpdatePolicy,
}

/// Load runtime settings from the given environment.
///
/// # Errors
/// Returns `DynextError::Config` if a variable is set but cannot be parsed.
pub fn load_settings(env: &dyn EnvSource) -> Result<RuntimeSettings> {
    let mut client = DynatraceClientConfig::default();

    if let Some(secs) = env_parse::<u64>(env, TIMEOUT_VAR)? {
        if secs == 0 {
            return Err(DynextError::config(format!("{TIMEOUT_VAR} must be greater than zero")));
        }
        client.timeout = Duration::from_secs(secs);
    }

    if let Some(attempts) = env_parse::<usize>(env, MAX_ATTEMPTS_VAR)? {
        if attempts == 0 {
            return Err(DynextError::config(format!("{MAX_ATTEMPTS_VAR} must be at least 1")));
        }
        client.max_attempts = attempts;
    }

    if let Some(ms) = env_parse::<u64>(env, BACKOFF_VAR)? {
        client.base_backoff = Duration::from_millis(ms);
    }

    if let Some(agent) = env_value(env, USER_AGENT_VAR) {
        client.user_agent = Some(agent);
    }

    let update_policy = match env_value(env, UPDATE_POLICY_VAR) {
        Some(raw) => raw.parse::<UpdatePolicy>().map_err(|_| {
            DynextError::config(format!("{UPDATE_POLICY_VAR} must be 'replace' or 'reject', got '{raw}'"))
        })?,
        None => UpdatePolicy::default(),
    };

    tracing::debug!(
        timeout_secs = client.timeout.as_secs(),
        max_attempts = client.max_attempts,
        backoff_ms = client.base_backoff.as_millis() as u64,
        update_policy = %update_policy,
        "runtime settings loaded"
    );

    Ok(RuntimeSettings { client, update_policy })
}

fn env_value(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(env: &dyn EnvSource, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_value(env, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| DynextError::config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
