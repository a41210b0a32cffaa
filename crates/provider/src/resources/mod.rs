//! Managed resource types

pub mod extension;

pub use extension::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ExtensionModel, ExtensionResource,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
