//! Error types for the Zenith SDK
//!
//! Every client in this crate (language models, telemetry backends and the
//! Zenith service itself) reports failures through [`SdkError`]. The variants
//! keep the upstream status and body around so the orchestrator can record
//! them verbatim in the experience log.

use thiserror::Error;

/// Main error type for the Zenith SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The HTTP request could not be sent or the response could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("{service} returned {status}: {body}")]
    Api {
        /// Name of the service that failed (e.g. "ollama", "victoria metrics")
        service: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model produced no usable text
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// The backend accepted the request but reported an error in its payload
    #[error("{service} error: {message}")]
    Backend {
        /// Name of the service that failed
        service: String,
        /// Error message reported by the service
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failure injected by a scripted test double
    #[error("{0}")]
    Scripted(String),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

impl SdkError {
    /// Create a new Api error
    pub fn api(service: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            service: service.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a new Backend error
    pub fn backend(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Check if the error is likely transient (transport failure or 5xx/429)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::EmptyResponse(_) => true,
            _ => false,
        }
    }

    /// Check if the error is a configuration issue
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SdkError::api("victoria metrics", 422, "unparsable query");
        let msg = err.to_string();
        assert_eq!(msg, "victoria metrics returned 422: unparsable query");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SdkError::api("ollama", 503, "loading").is_recoverable());
        assert!(SdkError::api("gemini", 429, "quota").is_recoverable());
        assert!(SdkError::EmptyResponse("gemini".into()).is_recoverable());
        assert!(!SdkError::api("victoria logs", 400, "bad query").is_recoverable());
        assert!(!SdkError::Config("missing key".into()).is_recoverable());
    }

    #[test]
    fn test_is_config_error() {
        assert!(SdkError::Config("test".into()).is_config_error());
        assert!(!SdkError::EmptyResponse("ollama".into()).is_config_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let original = serde_json::from_str::<serde_json::Value>("{\"invalid\": json").unwrap_err();
        let error: SdkError = original.into();
        assert!(error.to_string().starts_with("JSON error:"));
    }
}
