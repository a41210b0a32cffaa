//! dynext-check - connectivity check for a Dynatrace environment
//!
//! Resolves credentials from the environment (and `.env`), connects, and
//! lists the extensions the token can see.

use std::sync::Arc;

use anyhow::Context;
use dynext_domain::ProviderConfig;
use dynext_infra::config::{load_settings, resolve_credentials, ProcessEnv};
use dynext_infra::{DynatraceClient, ExtensionPager};
use dynext_provider::utils::logging::init_tracing;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads RUST_LOG
    let dotenv = dotenvy::dotenv();

    init_tracing().map_err(|e| anyhow::anyhow!(e)).context("initialising logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env file loaded"),
    }

    let env = ProcessEnv;
    let credentials = resolve_credentials(&ProviderConfig::default(), &env)?;
    let settings = load_settings(&env)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let client = DynatraceClient::connect(&credentials, settings.client, &cancel)
        .await
        .with_context(|| format!("connecting to {}", credentials.env_url()))?;

    let extensions = ExtensionPager::new(Arc::new(client))
        .collect(cancel)
        .await
        .context("listing extensions")?;

    for extension in &extensions {
        info!(id = %extension.id, name = %extension.name, extension_type = %extension.extension_type, "extension");
    }
    info!(count = extensions.len(), "extensions visible");

    Ok(())
}
