//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::session::SessionPhase;

/// Domain errors represent business rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionPhase,
        action: &'static str,
    },

    #[error("code not available for assignment: {0}")]
    CodeNotAvailable(String),

    #[error("position {index} out of range for {len} items")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("invalid code '{code}': does not match {pattern}")]
    InvalidCode { code: String, pattern: String },

    #[error("invalid normalization policy: {0}")]
    InvalidPolicy(String),

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
