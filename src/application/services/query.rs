//! Interval query engine
//!
//! Answers hierarchy questions with interval comparisons only: no parent
//! pointers, no recursive lookups.

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, StoreResultExt};
use crate::domain::{DomainError, NodeId, NodeRow};
use crate::infrastructure::traits::RowStore;

pub struct IntervalQueryEngine<'a, S: RowStore + ?Sized> {
    store: &'a S,
    verify_reads: bool,
}

impl<'a, S: RowStore + ?Sized> IntervalQueryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            verify_reads: true,
        }
    }

    /// Toggle the `left < right` check on every fetched row.
    pub fn verify_reads(mut self, enabled: bool) -> Self {
        self.verify_reads = enabled;
        self
    }

    /// Resolve `id` or fail with `NotFound`.
    pub fn get(&self, id: NodeId) -> ApplicationResult<NodeRow> {
        let row = self
            .store
            .get_by_id(id)
            .with_store_context("read node")?
            .ok_or(DomainError::NotFound(id))?;
        self.check(&row)?;
        Ok(row)
    }

    pub fn find(&self, id: NodeId) -> ApplicationResult<Option<NodeRow>> {
        match self.store.get_by_id(id).with_store_context("read node")? {
            Some(row) => {
                self.check(&row)?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// The node and every row nested inside it, ascending by `left`.
    #[instrument(level = "debug", skip(self))]
    pub fn find_descendants(&self, id: NodeId) -> ApplicationResult<Vec<NodeRow>> {
        let node = self.get(id)?;
        self.descendants_of(&node)
    }

    /// Descendant scan for an already resolved node.
    pub fn descendants_of(&self, node: &NodeRow) -> ApplicationResult<Vec<NodeRow>> {
        let rows = self
            .store
            .range_by_interval(node.left, node.right)
            .with_store_context("scan descendants")?;
        self.check_all(&rows)?;
        debug!(node = %node.id, rows = rows.len(), "descendants");
        Ok(rows)
    }

    /// Direct children of `id` only, ascending by `left`.
    ///
    /// Walking the descendant scan in `left` order, the first row inside
    /// the target is a child; every following row that starts after the
    /// previous child's right bound is the next child. Rows in between are
    /// nested under an earlier child and are skipped.
    #[instrument(level = "debug", skip(self))]
    pub fn find_immediate_children(&self, id: NodeId) -> ApplicationResult<Vec<NodeRow>> {
        let node = self.get(id)?;
        let rows = self.descendants_of(&node)?;

        let mut children = Vec::new();
        let mut covered_until = node.left;
        for row in rows {
            if row.id == node.id {
                continue;
            }
            if row.left > covered_until {
                covered_until = row.right;
                children.push(row);
            }
        }
        debug!(node = %id, children = children.len(), "immediate children");
        Ok(children)
    }

    /// Root-to-node path, the node itself included, ascending by `left`.
    #[instrument(level = "debug", skip(self))]
    pub fn find_ancestor_chain(&self, id: NodeId) -> ApplicationResult<Vec<NodeRow>> {
        let node = self.get(id)?;
        let rows = self
            .store
            .range_enclosing(node.left, node.right)
            .with_store_context("scan ancestors")?;
        self.check_all(&rows)?;
        Ok(rows)
    }

    /// Every row, ascending by `left`.
    pub fn all(&self) -> ApplicationResult<Vec<NodeRow>> {
        let rows = self
            .store
            .all_ordered_by_left()
            .with_store_context("scan all rows")?;
        self.check_all(&rows)?;
        Ok(rows)
    }

    fn check(&self, row: &NodeRow) -> ApplicationResult<()> {
        if self.verify_reads && row.left >= row.right {
            return Err(DomainError::invariant(format!("fetched {} has left >= right", row)).into());
        }
        Ok(())
    }

    fn check_all(&self, rows: &[NodeRow]) -> ApplicationResult<()> {
        rows.iter().try_for_each(|row| self.check(row))
    }
}
