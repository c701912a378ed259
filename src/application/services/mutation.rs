//! Boundary mutation engine
//!
//! Opens and closes interval space so that inserts and subtree deletes keep
//! the nested-set encoding intact for every other row in the store.

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, StoreResultExt};
use crate::domain::{DomainError, NewNode, NodeId, NodeRow};
use crate::infrastructure::traits::RowStore;

/// Interval units consumed by a single node.
const NODE_WIDTH: i64 = 2;

/// Applies insert/delete boundary shifts against a [`RowStore`].
///
/// Holds the store exclusively for its lifetime: each operation is a
/// read-then-write-many sequence whose shift predicates are only valid as
/// long as nobody else moves boundaries in between.
pub struct BoundaryMutationEngine<'a, S: RowStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: RowStore + ?Sized> BoundaryMutationEngine<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Append a new root at the rightmost free position; nothing shifts.
    #[instrument(level = "debug", skip(self))]
    pub fn create_root(&mut self, name: &str) -> ApplicationResult<NodeRow> {
        let max = self.store.max_right().with_store_context("read max right")?;
        let node = NewNode {
            name: name.to_string(),
            left: max + 1,
            right: max + 2,
            depth: 0,
        };
        let row = self.store.insert(node).with_store_context("insert root")?;
        debug!(%row, "root created");
        Ok(row)
    }

    /// Insert `name` as the last child of `parent_id`.
    ///
    /// With `r = parent.right`, every `left > r` and every `right >= r`
    /// moves by 2; the new node takes `[r, r + 1]`. The parent is resolved
    /// and its depth checked before any write, so a failure leaves the
    /// store untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn create_child(&mut self, name: &str, parent_id: NodeId) -> ApplicationResult<NodeRow> {
        let parent = self
            .store
            .get_by_id(parent_id)
            .with_store_context("read parent")?
            .ok_or(DomainError::NotFound(parent_id))?;
        let depth = parent.depth.checked_add(1).ok_or_else(|| {
            DomainError::invariant(format!("{} is at maximum depth", parent))
        })?;
        let r = parent.right;

        // Both predicates are evaluated against pre-shift bounds: the left
        // pass only rewrites `left`, the right pass only tests `right`.
        let lefts = self
            .store
            .shift_left_where_left_greater_than(r, NODE_WIDTH)
            .with_store_context("shift left boundaries")?;
        let rights = self
            .store
            .shift_right_where_right_greater_or_equal(r, NODE_WIDTH)
            .with_store_context("shift right boundaries")?;
        debug!(lefts, rights, at = r, "opened gap");

        let node = NewNode {
            name: name.to_string(),
            left: r,
            right: r + 1,
            depth,
        };
        let row = self.store.insert(node).with_store_context("insert child")?;
        debug!(%row, parent = %parent_id, "child created");
        Ok(row)
    }

    /// Remove `id` and all of its descendants, then close the gap.
    ///
    /// Returns the number of rows removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_subtree(&mut self, id: NodeId) -> ApplicationResult<usize> {
        let target = self
            .store
            .get_by_id(id)
            .with_store_context("read node")?
            .ok_or(DomainError::NotFound(id))?;
        let (l, r) = (target.left, target.right);
        let width = target.width();

        let removed = self
            .store
            .delete_where_nested_in(l, r)
            .with_store_context("delete subtree")?;
        // right > r is right >= r + 1 on integer bounds
        let rights = self
            .store
            .shift_right_where_right_greater_or_equal(r + 1, -width)
            .with_store_context("shift right boundaries")?;
        let lefts = self
            .store
            .shift_left_where_left_greater_than(r, -width)
            .with_store_context("shift left boundaries")?;
        debug!(removed, lefts, rights, width, "closed gap");
        Ok(removed)
    }

    /// Change the label of `id`; bounds stay where they are.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, id: NodeId, name: &str) -> ApplicationResult<NodeRow> {
        let row = self
            .store
            .rename(id, name)
            .with_store_context("rename node")?
            .ok_or(DomainError::NotFound(id))?;
        Ok(row)
    }
}
