//! Error types for locktable
//!
//! Provides a unified error type for all operations, and the coarse
//! classification the dispatcher and the HTTP layer branch on.

use thiserror::Error;

/// Result type alias using LockTableError
pub type Result<T> = std::result::Result<T, LockTableError>;

/// Unified error type for locktable operations
#[derive(Debug, Error)]
pub enum LockTableError {
    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Entry not found: {key} in table {table}")]
    EntryNotFound { table: String, key: String },

    #[error("Entry already exists: {key} in table {table}")]
    EntryAlreadyExists { table: String, key: String },

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Request body exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("No route for {0}")]
    RouteNotFound(String),

    // -------------------------------------------------------------------------
    // I/O and Network Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-caused, never retried, nothing was mutated
    Validation,

    /// Table or entry absent
    NotFound,

    /// Conditional write lost against an existing entry
    Conflict,

    /// Anything else
    Operational,
}

impl LockTableError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LockTableError::Validation(_)
            | LockTableError::Serialization(_)
            | LockTableError::UnknownOperation(_)
            | LockTableError::RequestTooLarge { .. }
            | LockTableError::MethodNotAllowed(_)
            | LockTableError::RouteNotFound(_) => ErrorKind::Validation,
            LockTableError::TableNotFound(_) | LockTableError::EntryNotFound { .. } => {
                ErrorKind::NotFound
            }
            LockTableError::EntryAlreadyExists { .. } => ErrorKind::Conflict,
            LockTableError::Io(_)
            | LockTableError::Http(_)
            | LockTableError::UnexpectedResponse { .. }
            | LockTableError::Config(_) => ErrorKind::Operational,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LockTableError::Validation(message.into())
    }
}
