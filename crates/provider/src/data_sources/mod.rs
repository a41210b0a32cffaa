//! Read-only data sources

pub mod extensions;

pub use extensions::{
    ExtensionItem, ExtensionsDataSource, ExtensionsModel, ExtensionsQuery, ExtensionsResponse,
};
