//! Domain types and models

pub mod extension;

pub use extension::{
    CreatedExtension, ExtensionId, ExtensionListPage, ExtensionState, ExtensionSummary,
    ManagedExtension, UpdatePolicy,
};
