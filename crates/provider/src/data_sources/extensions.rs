//! `dynatraceextension_extensions` data source
//!
//! Lists every extension visible to the token, optionally narrowed to one
//! platform type.

use std::sync::Arc;
use std::time::Instant;

use dynext_domain::constants::EXTENSIONS_DATA_SOURCE_SUFFIX;
use dynext_domain::ExtensionSummary;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::context::{downcast, ProviderContext, ProviderData};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::schema::{Attribute, Schema};
use crate::utils::logging::log_operation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionsQuery {
    /// Keep only extensions of this type (case-insensitive).
    #[serde(default, rename = "type")]
    pub extension_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub extension_type: String,
}

impl From<ExtensionSummary> for ExtensionItem {
    fn from(value: ExtensionSummary) -> Self {
        Self { id: value.id.to_string(), name: value.name, extension_type: value.extension_type }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionsModel {
    pub extensions: Vec<ExtensionItem>,
    pub total_results: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionsResponse {
    pub state: Option<ExtensionsModel>,
    pub diagnostics: Diagnostics,
}

#[derive(Default)]
pub struct ExtensionsDataSource {
    context: Option<Arc<ProviderContext>>,
}

impl ExtensionsDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_name(provider_type_name: &str) -> String {
        format!("{provider_type_name}{EXTENSIONS_DATA_SOURCE_SUFFIX}")
    }

    pub fn schema() -> Schema {
        Schema::new(
            "Extensions installed in the Dynatrace environment.",
            vec![
                Attribute::optional("type", "Only list extensions of this type, e.g. JMX."),
                Attribute::computed("extensions", "Id, name and type of every extension."),
                Attribute::computed("total_results", "Number of extensions listed."),
            ],
        )
    }

    pub fn configure(&mut self, provider_data: Option<ProviderData>) -> Diagnostics {
        let Some(data) = provider_data else {
            return Diagnostics::new();
        };
        match downcast(data) {
            Some(context) => {
                self.context = Some(context);
                Diagnostics::new()
            }
            None => Diagnostic::error(
                "Unexpected data source configuration type",
                "Expected the Dynatrace provider context but got a different value. Please \
                 report this issue to the provider developers.",
            )
            .into(),
        }
    }

    pub async fn read(&self, query: ExtensionsQuery, cancel: &CancellationToken) -> ExtensionsResponse {
        let started = Instant::now();
        let mut response = ExtensionsResponse::default();

        match &self.context {
            None => response.diagnostics.add_error(
                "Unexpected data source configuration type",
                "The extensions data source was used before the provider was configured.",
            ),
            Some(ctx) => match ctx.pager.collect(cancel.clone()).await {
                Ok(summaries) => {
                    let wanted = query.extension_type.as_deref().map(str::trim).filter(|t| !t.is_empty());
                    let extensions: Vec<ExtensionItem> = summaries
                        .into_iter()
                        .filter(|s| wanted.map_or(true, |t| s.extension_type.eq_ignore_ascii_case(t)))
                        .map(ExtensionItem::from)
                        .collect();
                    let total_results = extensions.len() as u64;
                    response.state = Some(ExtensionsModel { extensions, total_results });
                }
                Err(err) => {
                    response.diagnostics.push(Diagnostic::from_error("Unable to list extensions", &err));
                }
            },
        }

        log_operation("extensions", "read", started.elapsed(), !response.diagnostics.has_error());
        response
    }
}
