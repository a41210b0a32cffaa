//! Extension entity types
//!
//! An extension is identified by a platform-assigned id. The local model keeps
//! that identity in a tagged state instead of an optional field, so "not yet
//! created" and "created" can never be confused.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Opaque, platform-assigned extension identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionId(String);

impl ExtensionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtensionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One entry of an extension listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSummary {
    pub id: ExtensionId,
    pub name: String,
    /// Platform-defined type tag (e.g. `JMX`, `PYTHON`).
    #[serde(rename = "type")]
    pub extension_type: String,
}

/// A single page of an extension listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionListPage {
    pub extensions: Vec<ExtensionSummary>,
    pub total_results: u64,
    /// Continuation cursor; `None` once the listing is exhausted.
    pub next_page_key: Option<String>,
}

impl ExtensionListPage {
    /// Build a page, normalising an empty cursor to `None`.
    pub fn new(
        extensions: Vec<ExtensionSummary>,
        total_results: u64,
        next_page_key: Option<String>,
    ) -> Self {
        let next_page_key = next_page_key.filter(|key| !key.is_empty());
        Self { extensions, total_results, next_page_key }
    }

    pub fn is_last(&self) -> bool {
        self.next_page_key.is_none()
    }
}

/// Identity reported by the platform after a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedExtension {
    pub id: ExtensionId,
    pub name: String,
}

/// An extension that exists remotely and is tracked locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedExtension {
    pub id: ExtensionId,
    pub name: String,
    pub payload: String,
    pub last_updated: DateTime<Utc>,
}

/// Lifecycle state of one managed extension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExtensionState {
    /// No remote identity known.
    #[default]
    Unmanaged,
    /// Exists remotely with a platform-assigned id.
    Created(ManagedExtension),
    /// Removed remotely; terminal.
    Deleted,
}

impl ExtensionState {
    pub fn id(&self) -> Option<&ExtensionId> {
        match self {
            Self::Created(extension) => Some(&extension.id),
            Self::Unmanaged | Self::Deleted => None,
        }
    }

    pub fn as_created(&self) -> Option<&ManagedExtension> {
        match self {
            Self::Created(extension) => Some(extension),
            Self::Unmanaged | Self::Deleted => None,
        }
    }
}

/// How an update of an existing extension is carried out.
///
/// The configuration API has no in-place update primitive for extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Delete the current id, then create a new extension from the new payload.
    #[default]
    Replace,
    /// Refuse updates with an unsupported-operation error.
    Reject,
}

impl_domain_status_conversions!(UpdatePolicy {
    Replace => "replace",
    Reject => "reject",
});

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn empty_cursor_means_last_page() {
        let page = ExtensionListPage::new(Vec::new(), 0, Some(String::new()));
        assert!(page.is_last());
        assert_eq!(page.next_page_key, None);

        let page = ExtensionListPage::new(Vec::new(), 12, Some("abc".into()));
        assert!(!page.is_last());
    }

    #[test]
    fn summary_uses_platform_type_field() {
        let summary: ExtensionSummary = serde_json::from_str(
            r#"{"id":"custom.jmx.kafka","name":"Kafka","type":"JMX"}"#,
        )
        .unwrap();
        assert_eq!(summary.id.as_str(), "custom.jmx.kafka");
        assert_eq!(summary.extension_type, "JMX");
    }

    #[test]
    fn state_exposes_id_only_when_created() {
        assert!(ExtensionState::Unmanaged.id().is_none());
        assert!(ExtensionState::Deleted.id().is_none());

        let state = ExtensionState::Created(ManagedExtension {
            id: ExtensionId::new("custom.python.demo"),
            name: "demo".into(),
            payload: "{}".into(),
            last_updated: Utc::now(),
        });
        assert_eq!(state.id().map(ExtensionId::as_str), Some("custom.python.demo"));
    }

    #[test]
    fn update_policy_parses_case_insensitively() {
        assert_eq!(UpdatePolicy::from_str("Replace").unwrap(), UpdatePolicy::Replace);
        assert_eq!(UpdatePolicy::from_str("REJECT").unwrap(), UpdatePolicy::Reject);
        assert!(UpdatePolicy::from_str("patch").is_err());
        assert_eq!(UpdatePolicy::default().to_string(), "replace");
    }
}
