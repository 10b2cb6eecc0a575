//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, SaveFailure};
use crate::infrastructure::traits::GatewayError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{context}: {source}")]
    Gateway {
        context: String,
        #[source]
        source: GatewayError,
    },

    #[error("save failed for {owner}: {failure}")]
    Save { owner: String, failure: SaveFailure },

    #[error("invalid codes {codes:?}: expected {pattern}")]
    InvalidCodes { codes: Vec<String>, pattern: String },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
