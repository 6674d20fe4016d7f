use serde_json::Value;
use thiserror::Error;

/// Fallback cause when neither the backend nor the transport said anything useful.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum RewrappedError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl RewrappedError {
    /// True when the failure came out of the API access layer rather than local code.
    pub fn is_api_error(&self) -> bool {
        matches!(self, RewrappedError::Api(_))
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, RewrappedError::Api(e) if e.is_auth_error())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RewrappedError::Api(e) => e.status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RewrappedError>;

/// Where in the request/response cycle an API call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced a response.
    Transport,
    /// 4xx/5xx without an application error body.
    Http,
    /// 401; the session is gone.
    Auth,
    /// The backend answered with an `error` field in the body.
    Rejected,
    /// Success status, but the body was not the JSON we expected.
    Decode,
}

/// Uniform error shape for every API access function.
#[derive(Error, Debug)]
#[error("{context}: {message}")]
pub struct ApiError {
    pub context: String,
    pub message: String,
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    /// Decoded response body, kept for diagnostics.
    pub body: Option<Value>,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl ApiError {
    pub fn transport(context: &str, source: reqwest::Error) -> Self {
        let message = source.to_string();
        Self {
            context: context.to_string(),
            message: if message.is_empty() {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            } else {
                message
            },
            kind: ApiErrorKind::Transport,
            status: source.status().map(|s| s.as_u16()),
            body: None,
            source: Some(source),
        }
    }

    /// Build from a non-success response. The body's `error` field wins as the message.
    pub fn from_response(context: &str, status: u16, body: Option<Value>) -> Self {
        let backend_message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|e| e.as_str())
            .map(|s| s.to_string());

        let kind = if status == 401 {
            ApiErrorKind::Auth
        } else if backend_message.is_some() {
            ApiErrorKind::Rejected
        } else {
            ApiErrorKind::Http
        };

        let message = backend_message
            .or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(|r| format!("Request failed with status {} ({})", status, r))
            })
            .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string());

        Self {
            context: context.to_string(),
            message,
            kind,
            status: Some(status),
            body,
            source: None,
        }
    }

    pub fn decode(context: &str, status: u16, source: reqwest::Error) -> Self {
        Self {
            context: context.to_string(),
            message: source.to_string(),
            kind: ApiErrorKind::Decode,
            status: Some(status),
            body: None,
            source: Some(source),
        }
    }

    /// Success status, but the body did not have the expected shape.
    pub fn invalid_body(context: &str, status: u16, message: String, body: Value) -> Self {
        Self {
            context: context.to_string(),
            message,
            kind: ApiErrorKind::Decode,
            status: Some(status),
            body: Some(body),
            source: None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_error_field_becomes_message() {
        let err = ApiError::from_response(
            "Failed to fetch promoter analytics",
            400,
            Some(json!({"error": "user_id is required"})),
        );
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(
            err.to_string(),
            "Failed to fetch promoter analytics: user_id is required"
        );
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn test_unauthorized_is_flagged_as_auth() {
        let body = json!({"error": "expired"});
        let err = ApiError::from_response("Failed to fetch", 401, Some(body));
        assert!(err.is_auth_error());
        assert_eq!(err.message, "expired");

        let wrapped: RewrappedError = err.into();
        assert!(wrapped.is_api_error());
        assert!(wrapped.is_auth_error());
        assert_eq!(wrapped.status(), Some(401));
    }

    #[test]
    fn test_plain_http_failure_uses_status_reason() {
        let err = ApiError::from_response("Failed to fetch events", 503, None);
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert!(err.message.contains("503"));
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_local_errors_are_not_api_errors() {
        let err = RewrappedError::Config("missing base url".into());
        assert!(!err.is_api_error());
        assert_eq!(err.status(), None);
    }
}
