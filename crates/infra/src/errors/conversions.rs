//! Conversions from external infrastructure errors into domain errors.

use dynext_domain::DynextError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DynextError);

impl From<InfraError> for DynextError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DynextError> for InfraError {
    fn from(value: DynextError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDynextError {
    fn into_dynext(self) -> DynextError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DynextError */
/* -------------------------------------------------------------------------- */

impl IntoDynextError for HttpError {
    fn into_dynext(self) -> DynextError {
        if self.is_timeout() {
            return DynextError::transport(format!("HTTP request timed out: {self}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return DynextError::transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return DynextError::config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return DynextError::decoding(self.to_string());
        }

        if let Some(status) = self.status() {
            return DynextError::from_status(status.as_u16(), String::new());
        }

        DynextError::transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_dynext())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → DynextError */
/* -------------------------------------------------------------------------- */

impl IntoDynextError for serde_json::Error {
    fn into_dynext(self) -> DynextError {
        DynextError::decoding(format!("unexpected response body: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_dynext())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
