//! Uniform result returned by every remote-facing operation.
//!
//! Callers branch on one shape regardless of whether a failure came from
//! local validation, the transport, or the provider itself. Failures are
//! never raised as errors across this boundary.

use serde::Serialize;

/// Error message carried by a [`Response`] that has not failed.
pub const UNDEFINED_ERROR_MESSAGE: &str = "Undefined";

const UNSPECIFIED_FAILURE_MESSAGE: &str = "operation failed without an error message";

/// Outcome of a remote operation.
///
/// ## Invariants
/// - A failed response always carries an error message other than
///   [`UNDEFINED_ERROR_MESSAGE`].
/// - A successful response keeps [`UNDEFINED_ERROR_MESSAGE`] as its error
///   message.
///
/// # Examples
/// ```
/// use baas::domain::Response;
///
/// let ok = Response::success(Some("token".to_owned()));
/// assert!(ok.is_success());
/// assert_eq!(ok.data(), Some("token"));
///
/// let failed = Response::failure("duplicate");
/// assert!(!failed.is_success());
/// assert_eq!(failed.error_message(), "duplicate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    error_message: String,
}

impl Response {
    /// Successful response with optional payload.
    #[must_use]
    pub fn success(data: Option<String>) -> Self {
        Self {
            is_success: true,
            data,
            error_message: UNDEFINED_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Failed response carrying a descriptive message.
    ///
    /// Blank messages, or the undefined placeholder, are replaced with a
    /// generic description so the failure invariant holds.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let error_message = if message.trim().is_empty() || message == UNDEFINED_ERROR_MESSAGE {
            UNSPECIFIED_FAILURE_MESSAGE.to_owned()
        } else {
            message
        };
        Self {
            is_success: false,
            data: None,
            error_message,
        }
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_success
    }

    /// Payload returned on success, such as an identity token.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Error description; [`UNDEFINED_ERROR_MESSAGE`] for successes.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error_message.as_str()
    }
}
