//! HTTP transport shared by all remote clients

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
