//! Infrastructure layer: Row Store implementations and DI container
//!
//! This layer implements the Row Store boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use file::TomlFileStore;
pub use memory::MemoryRowStore;
pub use traits::RowStore;
