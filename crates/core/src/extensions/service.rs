//! Extension lifecycle service - create/read/update/delete semantics
//!
//! The service is stateless with respect to entities: callers pass in the
//! current [`ExtensionState`] or [`ManagedExtension`] and receive the next
//! one. Operations on the same entity are expected to be serialized by the
//! caller; operations on different entities may run concurrently against the
//! same shared API handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dynext_domain::{
    DynextError, ExtensionId, ExtensionState, ManagedExtension, Result, UpdatePolicy,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::ports::ExtensionApi;

type Clock = fn() -> DateTime<Utc>;

/// Result of refreshing a managed extension from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The extension still exists. `extension.payload` holds the observed
    /// remote payload; `drifted` is set when it differs from what was held.
    Present { extension: ManagedExtension, drifted: bool },
    /// The platform no longer knows the id; stop tracking it.
    Gone,
}

/// Failed update, carrying the state the entity is left in.
///
/// With the replace policy a failure after the old id was deleted leaves the
/// entity [`ExtensionState::Unmanaged`]; a failure before that leaves the
/// prior state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFailure {
    pub state: ExtensionState,
    pub error: DynextError,
}

/// Extension lifecycle service
pub struct ExtensionService {
    api: Arc<dyn ExtensionApi>,
    update_policy: UpdatePolicy,
    clock: Clock,
}

impl ExtensionService {
    /// Create a new lifecycle service using the default replace policy.
    pub fn new(api: Arc<dyn ExtensionApi>) -> Self {
        Self { api, update_policy: UpdatePolicy::default(), clock: Utc::now }
    }

    /// Choose how payload changes are applied.
    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// Override the timestamp source used for `last_updated`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Policy applied by [`ExtensionService::update`].
    pub fn update_policy(&self) -> UpdatePolicy {
        self.update_policy
    }

    /// Create the remote extension (`Unmanaged -> Created`).
    ///
    /// # Errors
    /// `InvalidInput` for an empty payload (no remote call is made); any
    /// client error is returned verbatim and no identity is recorded.
    #[instrument(skip(self, payload, cancel), fields(payload_len = payload.len()))]
    pub async fn create(
        &self,
        payload: &str,
        cancel: &CancellationToken,
    ) -> Result<ManagedExtension> {
        if payload.trim().is_empty() {
            return Err(DynextError::InvalidInput("payload must not be empty".into()));
        }

        let created = self.api.create_extension(payload, cancel).await?;

        info!(id = %created.id, name = %created.name, "extension created");

        Ok(ManagedExtension {
            id: created.id,
            name: created.name,
            payload: payload.to_string(),
            last_updated: (self.clock)(),
        })
    }

    /// Refresh a managed extension (`Created -> Created`).
    ///
    /// The observed payload replaces the held one so the caller can compare
    /// it with the declared payload. A missing id yields [`ReadOutcome::Gone`].
    #[instrument(skip(self, current, cancel), fields(id = %current.id))]
    pub async fn read(
        &self,
        current: &ManagedExtension,
        cancel: &CancellationToken,
    ) -> Result<ReadOutcome> {
        match self.api.get_extension_binary(&current.id, cancel).await {
            Ok(observed) => {
                let drifted = observed != current.payload;
                if drifted {
                    warn!(id = %current.id, "remote payload differs from tracked payload");
                }
                let extension = ManagedExtension { payload: observed, ..current.clone() };
                Ok(ReadOutcome::Present { extension, drifted })
            }
            Err(err) if err.is_not_found() => {
                info!(id = %current.id, "extension no longer exists remotely");
                Ok(ReadOutcome::Gone)
            }
            Err(err) => Err(err),
        }
    }

    /// Bring a managed extension to a new payload.
    ///
    /// An unchanged payload is a no-op that keeps the id. Otherwise the
    /// configured [`UpdatePolicy`] applies.
    #[instrument(
        skip(self, current, payload, cancel),
        fields(id = %current.id, policy = %self.update_policy)
    )]
    pub async fn update(
        &self,
        current: &ManagedExtension,
        payload: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<ManagedExtension, UpdateFailure> {
        let keep = |error: DynextError| UpdateFailure {
            state: ExtensionState::Created(current.clone()),
            error,
        };

        if payload.trim().is_empty() {
            return Err(keep(DynextError::InvalidInput("payload must not be empty".into())));
        }

        if payload == current.payload {
            debug!("payload unchanged, nothing to update");
            return Ok(current.clone());
        }

        match self.update_policy {
            UpdatePolicy::Reject => Err(keep(DynextError::unsupported(
                "in-place update of an extension; change requires replacement",
            ))),
            UpdatePolicy::Replace => {
                self.remove(&current.id, cancel).await.map_err(keep)?;

                match self.create(payload, cancel).await {
                    Ok(replacement) => {
                        info!(old_id = %current.id, new_id = %replacement.id, "extension replaced");
                        Ok(replacement)
                    }
                    Err(error) => {
                        warn!(
                            old_id = %current.id,
                            error = %error,
                            "old extension deleted but replacement could not be created"
                        );
                        Err(UpdateFailure { state: ExtensionState::Unmanaged, error })
                    }
                }
            }
        }
    }

    /// Remove the remote extension (`Created -> Deleted`).
    ///
    /// Deleting an id the platform no longer knows, or an entity that was
    /// never created, succeeds: the end state is the same.
    #[instrument(skip(self, state, cancel), fields(id = ?state.id()))]
    pub async fn delete(
        &self,
        state: &ExtensionState,
        cancel: &CancellationToken,
    ) -> Result<ExtensionState> {
        match state {
            ExtensionState::Created(extension) => {
                self.remove(&extension.id, cancel).await?;
                info!(id = %extension.id, "extension deleted");
            }
            ExtensionState::Unmanaged | ExtensionState::Deleted => {
                debug!("no remote identity, nothing to delete");
            }
        }
        Ok(ExtensionState::Deleted)
    }

    async fn remove(&self, id: &ExtensionId, cancel: &CancellationToken) -> Result<()> {
        match self.api.delete_extension(id, cancel).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(id = %id, "extension already absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
