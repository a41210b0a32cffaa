//! `dynatraceextension_extension` resource
//!
//! Maps the four host verbs onto [`dynext_core::ExtensionService`]. Each verb
//! takes a typed request and returns a typed response whose diagnostics say
//! whether it succeeded.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dynext_core::ReadOutcome;
use dynext_domain::constants::EXTENSION_RESOURCE_SUFFIX;
use dynext_domain::{ExtensionId, ExtensionState, ManagedExtension};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::context::{downcast, ProviderContext, ProviderData};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::schema::{Attribute, Schema};
use crate::utils::logging::log_operation;

const RESOURCE: &str = "extension";

/// Attribute values of one extension as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub payload: String,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl ExtensionModel {
    /// A planned extension with only the operator-supplied payload.
    pub fn planned(payload: impl Into<String>) -> Self {
        Self { payload: payload.into(), ..Self::default() }
    }

    fn from_managed(extension: &ManagedExtension) -> Self {
        Self {
            id: Some(extension.id.to_string()),
            name: Some(extension.name.clone()),
            payload: extension.payload.clone(),
            last_updated: Some(extension.last_updated.to_rfc3339()),
        }
    }

    fn to_state(&self) -> Result<ExtensionState, Diagnostic> {
        let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(ExtensionState::Unmanaged);
        };

        let last_updated = self
            .last_updated
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| {
                Diagnostic::error(
                    "Invalid extension state",
                    format!("last_updated of extension {id} is not an RFC 3339 timestamp: {e}"),
                )
                .with_attribute("last_updated")
            })?
            .map_or_else(Utc::now, |ts| ts.with_timezone(&Utc));

        Ok(ExtensionState::Created(ManagedExtension {
            id: ExtensionId::new(id),
            name: self.name.clone().unwrap_or_default(),
            payload: self.payload.clone(),
            last_updated,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub plan: ExtensionModel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateResponse {
    /// New state; `None` when nothing was created.
    pub state: Option<ExtensionModel>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub state: ExtensionModel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadResponse {
    /// Refreshed state; `None` tells the host to drop the entity.
    pub state: Option<ExtensionModel>,
    /// The remote payload differs from the one previously held.
    pub drifted: bool,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub plan: ExtensionModel,
    pub state: ExtensionModel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResponse {
    /// State after the update; `None` when the entity is no longer managed.
    pub state: Option<ExtensionModel>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub state: ExtensionModel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteResponse {
    pub diagnostics: Diagnostics,
}

/// The extension resource type.
#[derive(Default)]
pub struct ExtensionResource {
    context: Option<Arc<ProviderContext>>,
}

impl ExtensionResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_name(provider_type_name: &str) -> String {
        format!("{provider_type_name}{EXTENSION_RESOURCE_SUFFIX}")
    }

    pub fn schema() -> Schema {
        Schema::new(
            "A Dynatrace extension uploaded through the configuration API.",
            vec![
                Attribute::computed("id", "Identifier assigned by Dynatrace."),
                Attribute::computed("name", "Name reported by Dynatrace for the extension."),
                Attribute::required("payload", "Extension archive content to upload."),
                Attribute::computed("last_updated", "Time of the last successful upload."),
            ],
        )
    }

    /// Accept the provider data produced by a successful provider configure.
    ///
    /// `None` means the provider is not configured yet; the host calls again
    /// later.
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
                "Unexpected resource configuration type",
                "Expected the Dynatrace provider context but got a different value. Please \
                 report this issue to the provider developers.",
            )
            .into(),
        }
    }

    fn context(&self, diagnostics: &mut Diagnostics) -> Option<&ProviderContext> {
        if self.context.is_none() {
            diagnostics.push(Diagnostic::error(
                "Unexpected resource configuration type",
                "The extension resource was used before the provider was configured.",
            ));
        }
        self.context.as_deref()
    }

    pub async fn create(&self, request: CreateRequest, cancel: &CancellationToken) -> CreateResponse {
        let started = Instant::now();
        let mut response = CreateResponse::default();

        if let Some(ctx) = self.context(&mut response.diagnostics) {
            match ctx.extensions.create(&request.plan.payload, cancel).await {
                Ok(created) => response.state = Some(ExtensionModel::from_managed(&created)),
                Err(err) => response.diagnostics.push(
                    Diagnostic::from_error("Error creating extension", &err).with_attribute("payload"),
                ),
            }
        }

        log_operation(RESOURCE, "create", started.elapsed(), !response.diagnostics.has_error());
        response
    }

    pub async fn read(&self, request: ReadRequest, cancel: &CancellationToken) -> ReadResponse {
        let started = Instant::now();
        let mut response = ReadResponse::default();

        if let Some(ctx) = self.context(&mut response.diagnostics) {
            match request.state.to_state() {
                Ok(ExtensionState::Created(current)) => match ctx.extensions.read(&current, cancel).await {
                    Ok(ReadOutcome::Present { extension, drifted }) => {
                        if drifted {
                            response.diagnostics.add_warning(
                                "Extension changed outside of configuration",
                                format!(
                                    "The payload stored for extension {} differs from the last \
                                     applied payload.",
                                    extension.id
                                ),
                            );
                        }
                        response.drifted = drifted;
                        response.state = Some(ExtensionModel::from_managed(&extension));
                    }
                    Ok(ReadOutcome::Gone) => {
                        debug!(id = %current.id, "extension gone, removing from state");
                    }
                    Err(err) => {
                        response.state = Some(request.state.clone());
                        response
                            .diagnostics
                            .push(Diagnostic::from_error("Error reading extension", &err));
                    }
                },
                Ok(ExtensionState::Unmanaged | ExtensionState::Deleted) => {}
                Err(diag) => {
                    response.state = Some(request.state.clone());
                    response.diagnostics.push(diag);
                }
            }
        }

        log_operation(RESOURCE, "read", started.elapsed(), !response.diagnostics.has_error());
        response
    }

    pub async fn update(&self, request: UpdateRequest, cancel: &CancellationToken) -> UpdateResponse {
        let started = Instant::now();
        let mut response = UpdateResponse::default();

        if let Some(ctx) = self.context(&mut response.diagnostics) {
            match request.state.to_state() {
                Ok(ExtensionState::Created(current)) => {
                    match ctx.extensions.update(&current, &request.plan.payload, cancel).await {
                        Ok(updated) => response.state = Some(ExtensionModel::from_managed(&updated)),
                        Err(failure) => {
                            response.state = failure.state.as_created().map(ExtensionModel::from_managed);
                            response
                                .diagnostics
                                .push(Diagnostic::from_error("Error updating extension", &failure.error));
                        }
                    }
                }
                Ok(ExtensionState::Unmanaged | ExtensionState::Deleted) => {
                    response.diagnostics.add_error(
                        "Error updating extension",
                        "The extension has no identifier; it must be created before it can be updated.",
                    );
                }
                Err(diag) => {
                    response.state = Some(request.state.clone());
                    response.diagnostics.push(diag);
                }
            }
        }

        log_operation(RESOURCE, "update", started.elapsed(), !response.diagnostics.has_error());
        response
    }

    pub async fn delete(&self, request: DeleteRequest, cancel: &CancellationToken) -> DeleteResponse {
        let started = Instant::now();
        let mut response = DeleteResponse::default();

        if let Some(ctx) = self.context(&mut response.diagnostics) {
            match request.state.to_state() {
                Ok(state) => {
                    if let Err(err) = ctx.extensions.delete(&state, cancel).await {
                        response
                            .diagnostics
                            .push(Diagnostic::from_error("Error deleting extension", &err));
                    }
                }
                Err(diag) => response.diagnostics.push(diag),
            }
        }

        log_operation(RESOURCE, "delete", started.elapsed(), !response.diagnostics.has_error());
        response
    }
}
