//! Error types used throughout the client

use thiserror::Error;

/// Broad classification of a [`VkError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The HTTP round trip itself failed
    Transport,
    /// The call reached the API but the payload encodes a failure
    Application,
    /// The request was rejected locally before anything was scheduled
    Misuse,
    /// Credential exchange failed
    Auth,
    /// Configuration could not be loaded or is invalid
    Config,
}

/// Main error type for vkclient
///
/// `Clone` so a failed collector can keep its terminal error around after
/// handing a copy to the consumer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VkError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error {code}: {message}")]
    Application { code: i64, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Method \"{0}\" is not in your application's scope")]
    OutOfScope(String),

    #[error("Token is expired or not set")]
    TokenExpired,

    #[error("Please supply \"{0}\" option")]
    MissingOption(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VkError {
    /// Get the category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Application { .. } | Self::Decode(_) => ErrorCategory::Application,
            Self::UnknownMethod(_)
            | Self::OutOfScope(_)
            | Self::TokenExpired
            | Self::MissingOption(_)
            | Self::InvalidInput(_) => ErrorCategory::Misuse,
            Self::Auth(_) => ErrorCategory::Auth,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Whether the error came back from a remote call (as opposed to being
    /// raised locally before the call was scheduled).
    pub fn is_remote(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transport | ErrorCategory::Application)
    }
}

/// Result type alias for vkclient operations
pub type Result<T> = std::result::Result<T, VkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(VkError::Transport("reset".into()).category(), ErrorCategory::Transport);
        assert_eq!(
            VkError::Application { code: 6, message: "Too many requests".into() }.category(),
            ErrorCategory::Application
        );
        assert_eq!(VkError::Decode("bad json".into()).category(), ErrorCategory::Application);
        assert_eq!(VkError::TokenExpired.category(), ErrorCategory::Misuse);
        assert_eq!(VkError::OutOfScope("wall.post".into()).category(), ErrorCategory::Misuse);
        assert_eq!(VkError::Auth("denied".into()).category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_remote_errors() {
        assert!(VkError::Transport("timeout".into()).is_remote());
        assert!(VkError::Application { code: 15, message: "Access denied".into() }.is_remote());
        assert!(!VkError::UnknownMethod("nope".into()).is_remote());
        assert!(!VkError::Config("missing".into()).is_remote());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            VkError::OutOfScope("photos.get".into()).to_string(),
            "Method \"photos.get\" is not in your application's scope"
        );
        assert_eq!(
            VkError::MissingOption("client_id".into()).to_string(),
            "Please supply \"client_id\" option"
        );
        assert_eq!(
            VkError::Application { code: 5, message: "User authorization failed".into() }
                .to_string(),
            "API error 5: User authorization failed"
        );
    }
}
