//! Fetch failure types.

use thiserror::Error;

/// Failure category of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    Parse,
    Api,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::Network => "network",
            FailureKind::Parse => "parse",
            FailureKind::Api => "api",
        };
        f.write_str(name)
    }
}

/// Why a fetch did not produce a payload.
///
/// None of these are retried by the caller's fetch: `Network` is only
/// produced once every attempt has been spent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::Parse(_) => FailureKind::Parse,
            Self::Api(_) => FailureKind::Api,
        }
    }

    /// Underlying error text or API message.
    pub fn detail(&self) -> &str {
        match self {
            Self::Network(detail) | Self::Parse(detail) | Self::Api(detail) => detail,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Unable to reach the weather service. Check your connection.".to_string()
            }
            Self::Parse(_) => "Received an unexpected response from the weather service.".to_string(),
            Self::Api(msg) => format!("Weather service error: {}", msg),
        }
    }
}

/// Outcome of a single fetch.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_detail() {
        let err = FetchError::Api("Invalid location".into());
        assert_eq!(err.kind(), FailureKind::Api);
        assert_eq!(err.detail(), "Invalid location");

        assert_eq!(FetchError::Network("x".into()).kind(), FailureKind::Network);
        assert_eq!(FetchError::Parse("x".into()).kind(), FailureKind::Parse);
    }

    #[test]
    fn test_user_messages() {
        assert!(FetchError::Network("refused".into())
            .user_message()
            .contains("connection"));
        assert!(FetchError::Api("API key is invalid.".into())
            .user_message()
            .contains("API key is invalid."));
        assert!(!FetchError::Parse("eof".into()).user_message().contains("eof"));
    }
}
