//! # Dynext Core
//!
//! Pure lifecycle logic for managed extensions - no HTTP code.
//!
//! This crate contains:
//! - The `ExtensionApi` port implemented by the infrastructure client
//! - The lifecycle service mapping create/read/update/delete onto that port
//!
//! ## Architecture Principles
//! - Only depends on `dynext-domain`
//! - All remote access via traits
//! - Testable with in-memory fakes

pub mod extensions;

pub use extensions::ports::ExtensionApi;
pub use extensions::service::{ExtensionService, ReadOutcome, UpdateFailure};
