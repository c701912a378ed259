//! Error conversion helpers for Row Store calls
//!
//! Provides an extension trait for cleaner error handling with operation context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait StoreResultExt<T> {
    /// Add operation context to a Row Store error.
    ///
    /// # Example
    /// ```ignore
    /// store.max_right().with_store_context("read max right")?;
    /// ```
    fn with_store_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> StoreResultExt<T> for io::Result<T> {
    fn with_store_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Store {
            context: action.to_string(),
            source: e,
        })
    }
}
