//! Shared test helpers for `dynext-core` integration tests.
//!
//! Provides an in-memory `ExtensionApi` with call recording and failure
//! injection so lifecycle tests can focus on state transitions.

pub mod api;
