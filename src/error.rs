//! Error types for DealerLedger

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    NotFound(String),
    AlreadyExists(String),
    Storage(String),
    Serialization(String),
    InvalidArgument(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::NotFound(id) => write!(f, "the asset {} does not exist", id),
            LedgerError::AlreadyExists(id) => write!(f, "the asset {} already exists", id),
            LedgerError::Storage(msg) => write!(f, "Storage error: {}", msg),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            LedgerError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
