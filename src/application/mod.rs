//! Application layer: boundary mutation, interval queries, node service
//!
//! This layer orchestrates domain logic and depends on the Row Store boundary trait.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::StoreResultExt;
