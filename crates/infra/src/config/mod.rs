//! Configuration loading and credential resolution
//!
//! This module resolves provider credentials from declared values and the
//! environment, and loads optional runtime tuning.

pub mod credentials;
pub mod loader;

pub use credentials::{
    resolve_credentials, resolve_detailed, CredentialField, CredentialIssue, EnvSource, IssueKind,
    MapEnv, ProcessEnv,
};
pub use loader::{load_settings, RuntimeSettings};
