//! # Dynext Domain
//!
//! Domain types for managing Dynatrace extensions.
//!
//! This crate contains:
//! - Extension entity and listing types
//! - Domain error types and Result definitions
//! - Provider configuration values
//! - Wire and environment constants
//!
//! ## Architecture
//! - No dependencies on other Dynext crates
//! - No transport or runtime dependencies

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
