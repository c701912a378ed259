//! Domain layer: entities and nested-set algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod fields;
pub mod invariants;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::{TreeBuilder, TreeResult};
pub use entities::*;
pub use error::DomainError;
pub use fields::NodeFields;
pub use invariants::check_rows;
