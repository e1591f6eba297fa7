//! Common error types used throughout evenue.
//!
//! This module provides a unified error type that covers the failure cases of
//! talking to the party database: missing rows, rejected input, violated
//! constraints, driver failures and I/O.

/// Common error type for evenue.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested row was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The database rejected a row because it violates a constraint.
    #[error("Constraint violated ({constraint}): {message}")]
    Constraint { constraint: String, message: String },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new Constraint error.
    pub fn constraint<C: Into<String>, M: Into<String>>(constraint: C, message: M) -> Self {
        Self::Constraint {
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Alias for invalid_input, used by model validation.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the database refused the data rather than failing to run.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Constraint { .. } | Self::InvalidInput(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("party 'Musician Rave'");
        assert_eq!(err.to_string(), "Not found: party 'Musician Rave'");

        let err = Error::database("connection refused");
        assert_eq!(err.to_string(), "Database error: connection refused");

        let err = Error::constraint("user_info_age_check", "age must be at least 18");
        assert_eq!(
            err.to_string(),
            "Constraint violated (user_info_age_check): age must be at least 18"
        );

        let err = Error::invalid_input("bad email");
        assert_eq!(err.to_string(), "Invalid input: bad email");

        let err = Error::config("port cannot be 0");
        assert_eq!(err.to_string(), "Configuration error: port cannot be 0");

        let err = Error::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_rejection_classification() {
        assert!(Error::constraint("c", "m").is_rejection());
        assert!(Error::validation("too short").is_rejection());
        assert!(!Error::database("timeout").is_rejection());
        assert!(!Error::not_found("x").is_rejection());
    }
}
