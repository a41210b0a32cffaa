//! # Dynext Provider
//!
//! Host boundary of the Dynatrace extension provider.
//!
//! This crate contains:
//! - The provider (metadata, schema, configure)
//! - The `dynatraceextension_extension` resource
//! - The `dynatraceextension_extensions` data source
//! - Diagnostics and schema descriptors exchanged with the host
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the Dynatrace client into the lifecycle service

pub mod context;
pub mod data_sources;
pub mod diagnostics;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod utils;

// Re-export for convenience
pub use context::{ProviderContext, ProviderData};
pub use data_sources::ExtensionsDataSource;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use provider::{ConfigureRequest, ConfigureResponse, DynatraceExtensionProvider, ProviderMetadata};
pub use resources::ExtensionResource;
pub use schema::{Attribute, Schema};
