//! The module contains the errors the engine can return.
//!
//! Everything a caller can act on is a distinct variant; store failures are
//! wrapped as [`Database`].
//!
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::InvalidReference(a), Self::InvalidReference(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
