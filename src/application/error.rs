//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("row store failed: {context}")]
    Store {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("row store lock poisoned by a panicked writer")]
    LockPoisoned,

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// The domain error behind this failure, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
