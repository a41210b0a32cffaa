//! Provider constants
//!
//! Centralized location for wire-level and configuration constants shared by
//! all crates.

// Remote API
pub const CONFIGURATION_API_PATH: &str = "/api/config/v1";
pub const EXTENSIONS_PATH: &str = "/extensions";
pub const API_TOKEN_SCHEME: &str = "Api-Token";
pub const ACCEPT_JSON: &str = "application/json; charset=utf-8";

// Transport
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 200;

// Listing
pub const VALIDATION_PAGE_SIZE: u32 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// Environment
pub const ENV_URL_VAR: &str = "DYNATRACE_ENV_URL";
pub const API_TOKEN_VAR: &str = "DYNATRACE_API_TOKEN";

// Declarative type names
pub const PROVIDER_TYPE_NAME: &str = "dynatraceextension";
pub const EXTENSION_RESOURCE_SUFFIX: &str = "_extension";
pub const EXTENSIONS_DATA_SOURCE_SUFFIX: &str = "_extensions";
