use thiserror::Error;

use crate::utils::status_codes;

/// Failed API outcome, carrying the envelope's code and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// Shown instead of the server's text while the backend is unavailable.
pub const UNAVAILABLE_MESSAGE: &str = "The server is busy. Please try again shortly.";

/// Coarse classification of an [`ApiError`] code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    Conflict,
    Unavailable,
    /// Server failure, or a transport/parse failure synthesised locally.
    Server,
    Unknown,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code {
            status_codes::BAD_REQUEST | status_codes::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
            status_codes::UNAUTHORIZED | status_codes::FORBIDDEN => ErrorKind::Unauthorized,
            status_codes::NOT_FOUND => ErrorKind::NotFound,
            status_codes::CONFLICT => ErrorKind::Conflict,
            status_codes::SERVICE_UNAVAILABLE => ErrorKind::Unavailable,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    /// The server message, or `fallback` when the server sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.trim().is_empty() {
            fallback
        } else {
            &self.message
        }
    }

    /// Message a screen shows for this error. A 503 always gets
    /// [`UNAVAILABLE_MESSAGE`], since its body is usually a proxy page.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.kind() {
            ErrorKind::Unavailable => UNAVAILABLE_MESSAGE,
            _ => self.message_or(fallback),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment `{0}`")]
    UnknownEnvironment(String),
    #[error("invalid URL in {name}: {message}")]
    InvalidUrl { name: &'static str, message: String },
}

/// Failure while wiring up an [`AppContext`](crate::AppContext).
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(400, ErrorKind::Validation)]
    #[case(401, ErrorKind::Unauthorized)]
    #[case(404, ErrorKind::NotFound)]
    #[case(409, ErrorKind::Conflict)]
    #[case(503, ErrorKind::Unavailable)]
    #[case(500, ErrorKind::Server)]
    #[case(302, ErrorKind::Unknown)]
    fn classifies_codes(#[case] code: i32, #[case] kind: ErrorKind) {
        assert_eq!(ApiError::new(code, "").kind(), kind);
    }

    #[test]
    fn falls_back_when_message_blank() {
        assert_eq!(ApiError::new(409, " ").message_or("duplicate"), "duplicate");
        assert_eq!(ApiError::new(409, "already friends").message_or("duplicate"), "already friends");
    }

    #[test]
    fn unavailable_gets_dedicated_message() {
        let err = ApiError::new(503, "Service Unavailable");
        assert_eq!(err.user_message("failed"), UNAVAILABLE_MESSAGE);
        assert_eq!(ApiError::new(500, "").user_message("failed"), "failed");
    }
}
