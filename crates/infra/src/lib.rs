//! # Dynext Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP transport (timeout, transport retry, cancellation)
//! - Credential resolution and runtime settings
//! - The Dynatrace configuration API client, connectivity check and pager
//!
//! ## Architecture
//! - Implements traits defined in `dynext-core`
//! - Contains all "impure" code (network, environment)

pub mod config;
pub mod dynatrace;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use config::{resolve_credentials, EnvSource, MapEnv, ProcessEnv, RuntimeSettings};
pub use dynatrace::{DynatraceClient, DynatraceClientConfig, ExtensionPager};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
