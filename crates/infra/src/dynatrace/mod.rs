//! Dynatrace configuration API integration
//!
//! - [`DynatraceClient`]: authenticated session implementing `ExtensionApi`
//! - [`ExtensionPager`]: lazy traversal of the paged extension listing
//! - [`ConnectivityReport`]: result of the check run at construction

pub mod client;
pub mod pagination;
mod types;
pub mod validation;

pub use client::{DynatraceClient, DynatraceClientConfig};
pub use pagination::ExtensionPager;
pub use validation::ConnectivityReport;
