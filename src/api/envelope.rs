//! Response envelope used by the cart, rating, and auth endpoints.

use serde::Deserialize;

use crate::api::errors::ApiError;

/// `{ success, message?, data }` wrapper. Catalog collection endpoints
/// return bare arrays and skip this.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    pub data: T,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning a `success: false` body into an error
    /// carrying the server's message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the envelope reports failure.
    pub fn into_data(self) -> Result<T, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Validation(
                self.message
                    .unwrap_or_else(|| "Request rejected by server".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Count {
        count: u32,
    }

    #[test]
    fn successful_envelope_unwraps_data() -> TestResult {
        let envelope: Envelope<Count> =
            serde_json::from_str(r#"{"success": true, "data": {"count": 4}}"#)?;

        assert_eq!(envelope.into_data()?.count, 4);

        Ok(())
    }

    #[test]
    fn failed_envelope_surfaces_message() -> TestResult {
        let envelope: Envelope<Option<Count>> = serde_json::from_str(
            r#"{"success": false, "message": "Out of stock", "data": null}"#,
        )?;

        let error = envelope.into_data().err();

        assert!(
            matches!(error, Some(ApiError::Validation(ref message)) if message == "Out of stock"),
            "expected Validation error, got {error:?}"
        );

        Ok(())
    }
}
