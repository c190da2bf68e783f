//! Error taxonomy for action dispatch and tile insertion.

use thiserror::Error;
use uuid::Uuid;

/// How an error should reach the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Logged only.
    Silent,
    /// Logged and shown to the user through the host.
    UserVisible,
}

/// Errors raised by the action registry, dispatcher and insertion workflow.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Lookup of an unregistered action name.
    #[error("action '{0}' is not registered")]
    UnknownAction(String),

    /// Selected block type is missing from the catalog.
    #[error("no block type named '{0}' in the tile catalog")]
    UnresolvedBlockType(String),

    /// An add-form fetch or submission failed.
    #[error("request {request} failed: {message}")]
    Network {
        /// Insertion request the failed call belonged to.
        request: Uuid,
        /// Transport or status description.
        message: String,
    },

    /// An event arrived for a request that already finished.
    #[error("insertion request {0} is not in flight")]
    StaleRequest(Uuid),

    /// The options catalog failed validation.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Reading an options file failed.
    #[error("failed to read options: {0}")]
    Io(#[from] std::io::Error),

    /// An options file is not valid TOML.
    #[error("failed to parse TOML options: {0}")]
    Toml(#[from] toml::de::Error),

    /// An options file is not valid JSON.
    #[error("failed to parse JSON options: {0}")]
    Json(#[from] serde_json::Error),
}

impl ActionError {
    /// Whether the user should see this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Network { .. } => ErrorSeverity::UserVisible,
            Self::UnknownAction(_)
            | Self::UnresolvedBlockType(_)
            | Self::StaleRequest(_)
            | Self::InvalidCatalog(_)
            | Self::Io(_)
            | Self::Toml(_)
            | Self::Json(_) => ErrorSeverity::Silent,
        }
    }

    /// Message suitable for the host's notification area.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { message, .. } => format!("Could not add the tile: {}", message),
            other => other.to_string(),
        }
    }
}

/// Result alias for fallible registry and workflow operations.
pub type Result<T> = std::result::Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_user_visible() {
        let err = ActionError::Network {
            request: Uuid::nil(),
            message: "503 Service Unavailable".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::UserVisible);
        assert!(err.user_message().contains("503"));
    }

    #[test]
    fn test_lookup_errors_are_silent() {
        assert_eq!(
            ActionError::UnknownAction("nope".to_string()).severity(),
            ErrorSeverity::Silent
        );
        assert_eq!(
            ActionError::UnresolvedBlockType("video".to_string()).severity(),
            ErrorSeverity::Silent
        );
    }
}
