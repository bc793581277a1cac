//! Custom error types for boardsync

use thiserror::Error;

/// Main error type for board reconciliation and configuration operations
#[derive(Debug, Error)]
pub enum BoardsError {
    /// The FQBN does not have the `segment(':'segment)*` shape
    #[error("{0} is not a valid FQBN.")]
    InvalidFqbn(String),
    /// The FQBN already carries `option=value` pairs
    #[error("{0} is already decorated with the configuration options.")]
    AlreadyDecorated(String),
    /// The boards backend rejected or failed a request
    #[error("Backend error: {0}")]
    Backend(String),
    /// Durable storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
    /// Stored or transferred data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Application configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// A detach was requested for something that is not tracked
    #[error("{what} is not attached. Attached were: {attached}")]
    NotAttached { what: String, attached: String },
    /// General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardsError {
    /// `true` for the errors raised by FQBN decoration
    pub fn is_fqbn_error(&self) -> bool {
        matches!(
            self,
            BoardsError::InvalidFqbn(_) | BoardsError::AlreadyDecorated(_)
        )
    }
}

impl From<serde_json::Error> for BoardsError {
    fn from(err: serde_json::Error) -> Self {
        BoardsError::Serialization(err.to_string())
    }
}

impl From<ron::Error> for BoardsError {
    fn from(err: ron::Error) -> Self {
        BoardsError::Serialization(err.to_string())
    }
}

impl From<ron::error::SpannedError> for BoardsError {
    fn from(err: ron::error::SpannedError) -> Self {
        BoardsError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BoardsError {
    fn from(err: toml::de::Error) -> Self {
        BoardsError::Config(err.to_string())
    }
}

impl From<serialport::Error> for BoardsError {
    fn from(err: serialport::Error) -> Self {
        BoardsError::Backend(format!("serial port enumeration failed: {}", err))
    }
}

/// Result type alias for boardsync operations
pub type Result<T> = std::result::Result<T, BoardsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqbn_error_messages() {
        let invalid = BoardsError::InvalidFqbn("not valid!!".to_string());
        assert_eq!(invalid.to_string(), "not valid!! is not a valid FQBN.");
        assert!(invalid.is_fqbn_error());

        let decorated = BoardsError::AlreadyDecorated("arduino:avr:uno:cpu=a".to_string());
        assert!(decorated.to_string().contains("already decorated"));
        assert!(decorated.is_fqbn_error());

        assert!(!BoardsError::Backend("boom".to_string()).is_fqbn_error());
    }
}
