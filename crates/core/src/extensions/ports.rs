//! Port interface for the remote extension API

use async_trait::async_trait;
use dynext_domain::{CreatedExtension, ExtensionId, ExtensionListPage, Result};
use tokio_util::sync::CancellationToken;

/// Remote operations on Dynatrace extensions.
///
/// Implementations map non-success responses to
/// [`dynext_domain::DynextError`]: 404 on id-addressed calls must surface as
/// `NotFound`, so callers can tell "gone" apart from other failures.
/// Implementations never invent identifiers.
#[async_trait]
pub trait ExtensionApi: Send + Sync {
    /// Fetch one page of the extension listing.
    ///
    /// `page_key` is the continuation cursor returned by the previous page;
    /// `None` starts at the first page.
    async fn list_extensions(
        &self,
        page_size: u32,
        page_key: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ExtensionListPage>;

    /// Upload a payload, returning the identity assigned by the platform.
    async fn create_extension(
        &self,
        payload: &str,
        cancel: &CancellationToken,
    ) -> Result<CreatedExtension>;

    /// Fetch the stored payload of an extension.
    async fn get_extension_binary(
        &self,
        id: &ExtensionId,
        cancel: &CancellationToken,
    ) -> Result<String>;

    /// Remove an extension.
    async fn delete_extension(&self, id: &ExtensionId, cancel: &CancellationToken) -> Result<()>;
}
