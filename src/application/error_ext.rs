//! Error conversion helpers for data-layer calls
//!
//! Provides extension traits for cleaner error handling with owner context.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::GatewayError;

/// Extension trait for converting gateway results to `ApplicationResult` with context.
pub trait GatewayResultExt<T> {
    /// Add owner context to a gateway error.
    ///
    /// # Example
    /// ```ignore
    /// gateway.fetch(owner)
    ///     .with_owner_context("fetch assignments", owner)?;
    /// ```
    fn with_owner_context(self, action: &str, owner: &str) -> ApplicationResult<T>;
}

impl<T> GatewayResultExt<T> for Result<T, GatewayError> {
    fn with_owner_context(self, action: &str, owner: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Gateway {
            context: format!("{}: {}", action, owner),
            source: e,
        })
    }
}
