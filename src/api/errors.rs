//! API error taxonomy.
//!
//! Every HTTP failure is classified exactly once, at the transport boundary,
//! into one of these kinds; callers match on the kind instead of inspecting
//! status codes at each call site.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced by calls against the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential was present, or the server rejected the one sent (401).
    #[error("not authenticated")]
    Unauthenticated,

    /// The server rejected the request payload (422). Carries the first
    /// field error message from the response body.
    #[error("{0}")]
    Validation(String),

    /// The current user may not perform this operation (403).
    #[error("forbidden")]
    Forbidden,

    /// The referenced resource no longer exists (404).
    #[error("not found")]
    NotFound,

    /// Timeout, connection failure, or other transport error. Nothing is
    /// retried; the failure surfaces immediately.
    #[error("network error")]
    Network(#[source] reqwest::Error),

    /// Any other non-2xx status.
    #[error("server error (status {0})")]
    Server(u16),

    /// The server answered 2xx with a body this client cannot interpret.
    #[error("unexpected response body: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    /// Classify a non-2xx status. 422 is handled separately by the client
    /// because its message lives in the response body.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthenticated,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            _ => Self::Server(status.as_u16()),
        }
    }

    /// Human-readable message suitable for an inline error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Please log in to continue".to_string(),
            Self::Validation(message) => message.clone(),
            Self::Forbidden => "You do not have permission to do that".to_string(),
            Self::NotFound => "Item not found".to_string(),
            Self::Network(_) => "Network error. Please check your connection".to_string(),
            Self::Server(status) => format!("Server error ({status})"),
            Self::UnexpectedResponse(_) => "Unexpected server response".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::UnexpectedResponse(error.to_string());
        }

        if let Some(status) = error.status() {
            return Self::from_status(status);
        }

        Self::Network(error)
    }
}

/// Shape of a 422 response body: a top-level message plus per-field error
/// lists. `BTreeMap` keeps "first field" deterministic.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationBody {
    /// The first field error message, falling back to the top-level message.
    #[must_use]
    pub fn first_message(self) -> String {
        self.errors
            .into_values()
            .find_map(|messages| messages.into_iter().next())
            .or(self.message)
            .unwrap_or_else(|| "Validation failed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_map_to_kinds() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED),
            ApiError::Unauthenticated
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN),
            ApiError::Forbidden
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Server(500)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY),
            ApiError::Server(502)
        ));
    }

    #[test]
    fn validation_body_yields_first_field_error() -> TestResult {
        let body: ValidationBody = serde_json::from_str(
            r#"{
                "message": "The given data was invalid.",
                "errors": {
                    "quantity": ["The quantity must be between 1 and 99."],
                    "product_id": ["The selected product is invalid."]
                }
            }"#,
        )?;

        // BTreeMap ordering: "product_id" sorts before "quantity".
        assert_eq!(
            body.first_message(),
            "The selected product is invalid."
        );

        Ok(())
    }

    #[test]
    fn validation_body_falls_back_to_message() -> TestResult {
        let body: ValidationBody =
            serde_json::from_str(r#"{"message": "The given data was invalid."}"#)?;

        assert_eq!(body.first_message(), "The given data was invalid.");

        Ok(())
    }

    #[test]
    fn empty_validation_body_has_default_message() {
        assert_eq!(
            ValidationBody::default().first_message(),
            "Validation failed"
        );
    }

    #[test]
    fn server_error_message_embeds_status() {
        assert_eq!(ApiError::Server(503).user_message(), "Server error (503)");
    }
}
