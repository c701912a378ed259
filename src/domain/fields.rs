//! Statically declared field accessors for caller-owned row types.
//!
//! Tree reconstruction only needs five scalar values per row. Instead of
//! requiring callers to convert their records into [`NodeRow`], they hand the
//! builder a [`NodeFields`] table naming how to read each value.

use std::fmt;

use crate::domain::{NodeId, NodeRow};

/// Accessor table mapping a row type onto the nested-set columns.
pub struct NodeFields<T> {
    pub id: fn(&T) -> NodeId,
    pub name: fn(&T) -> &str,
    pub left: fn(&T) -> i64,
    pub right: fn(&T) -> i64,
    pub depth: fn(&T) -> u32,
}

impl<T> Clone for NodeFields<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeFields<T> {}

impl<T> fmt::Debug for NodeFields<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeFields")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> NodeFields<T> {
    /// Copy the scalar columns of `row` into a [`NodeRow`].
    pub fn project(&self, row: &T) -> NodeRow {
        NodeRow {
            id: (self.id)(row),
            name: (self.name)(row).to_string(),
            left: (self.left)(row),
            right: (self.right)(row),
            depth: (self.depth)(row),
        }
    }
}

impl NodeRow {
    /// Accessors for the crate's own row type.
    pub const FIELDS: NodeFields<NodeRow> = NodeFields {
        id: |r| r.id,
        name: |r| r.name.as_str(),
        left: |r| r.left,
        right: |r| r.right,
        depth: |r| r.depth,
    };
}
