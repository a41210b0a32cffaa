//! Connectivity check run once when a client is built
//!
//! Issues a single bounded listing call. The call gets exactly one attempt so
//! a bad endpoint or token fails fast; whatever error it produces becomes the
//! construction error.

use dynext_domain::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::client::DynatraceClient;

/// What the connectivity check observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityReport {
    /// Extensions the token can see.
    pub total_results: u64,
}

pub(crate) async fn check_connectivity(
    client: &DynatraceClient,
    cancel: &CancellationToken,
) -> Result<ConnectivityReport> {
    let page_size = client.config().validation_page_size;
    debug!(page_size, "validating Dynatrace credentials");

    match client.list_page(page_size, None, 1, cancel).await {
        Ok(page) => Ok(ConnectivityReport { total_results: page.total_results }),
        Err(err) => {
            warn!(error = %err, kind = err.label(), "Dynatrace connectivity check failed");
            Err(err)
        }
    }
}
