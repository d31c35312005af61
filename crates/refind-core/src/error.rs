//! Error types for refind.

use thiserror::Error;

use crate::lifecycle::TransitionError;

/// Result type alias using refind's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for refind operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(uuid::Uuid),

    /// Search alert not found
    #[error("Search alert not found: {0}")]
    AlertNotFound(uuid::Uuid),

    /// Item match not found
    #[error("Item match not found: {0}")]
    MatchNotFound(uuid::Uuid),

    /// Rejected status transition
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_item_not_found() {
        let id = Uuid::nil();
        let err = Error::ItemNotFound(id);
        assert_eq!(err.to_string(), format!("Item not found: {}", id));
    }

    #[test]
    fn test_error_display_alert_not_found() {
        let id = Uuid::new_v4();
        let err = Error::AlertNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("latitude out of range".to_string());
        assert_eq!(err.to_string(), "Invalid input: latitude out of range");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing DATABASE_URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing DATABASE_URL");
    }

    #[test]
    fn test_transition_error_passthrough() {
        let err: Error = TransitionError::InvalidStatusValue("gone".to_string()).into();
        assert_eq!(err.to_string(), "Invalid status value: gone");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
