//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] malformed or inconsistent input (split totals, amounts,
//!   settlement bounds). Never retried.
//! - [`Persistence`] the store failed. Callers must not assume partial state.
//! - [`NotFound`] an expense or user does not exist.
//! - [`Forbidden`] the requester is not allowed to touch the record.
//! - [`ExistingKey`] a unique key (user id, email, display name) is taken.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Persistence`]: EngineError::Persistence
//!  [`NotFound`]: EngineError::NotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`ExistingKey`]: EngineError::ExistingKey
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Persistence(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
