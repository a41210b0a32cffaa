//! Macro for implementing Display and FromStr for label enums
//!
//! Several small enums (update policy, diagnostic severity) travel through
//! configuration and logs as lowercase strings. This macro provides both
//! directions in one place with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use dynext_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verb {
//!     Create,
//!     Read,
//! }
//!
//! impl_domain_status_conversions!(Verb {
//!     Create => "create",
//!     Read => "read",
//! });
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - Display writes the mapped lowercase string
/// - FromStr accepts any casing and names the enum in its error message
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
