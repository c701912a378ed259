//! Node service
//!
//! Public surface of the nested-set core. Owns the Row Store behind a
//! read/write lock: a mutation holds the write lock for its whole
//! read-shift-insert sequence, so at most one mutation is in flight and no
//! reader ever observes a half-applied shift.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, instrument};

use crate::application::services::{BoundaryMutationEngine, IntervalQueryEngine};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{check_rows, NodeData, NodeId, NodeRow, TreeArena, TreeBuilder};
use crate::infrastructure::traits::RowStore;

pub struct NodeService<S: RowStore> {
    store: RwLock<S>,
    builder: TreeBuilder,
    verify_reads: bool,
}

impl<S: RowStore> NodeService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: RwLock::new(store),
            builder: TreeBuilder::new(),
            verify_reads: true,
        }
    }

    /// Enable or disable defensive bound checks on fetched rows.
    pub fn with_verify_reads(mut self, enabled: bool) -> Self {
        self.verify_reads = enabled;
        self
    }

    /// Give back the store, e.g. to persist it.
    pub fn into_store(self) -> ApplicationResult<S> {
        self.store
            .into_inner()
            .map_err(|_| ApplicationError::LockPoisoned)
    }

    fn read(&self) -> ApplicationResult<RwLockReadGuard<'_, S>> {
        self.store.read().map_err(|_| ApplicationError::LockPoisoned)
    }

    fn write(&self) -> ApplicationResult<RwLockWriteGuard<'_, S>> {
        self.store.write().map_err(|_| ApplicationError::LockPoisoned)
    }

    fn query<'a>(&self, store: &'a S) -> IntervalQueryEngine<'a, S> {
        IntervalQueryEngine::new(store).verify_reads(self.verify_reads)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn create_root(&self, name: &str) -> ApplicationResult<NodeRow> {
        let mut store = self.write()?;
        BoundaryMutationEngine::new(&mut *store).create_root(name)
    }

    pub fn create_child(&self, name: &str, parent_id: NodeId) -> ApplicationResult<NodeRow> {
        let mut store = self.write()?;
        BoundaryMutationEngine::new(&mut *store).create_child(name, parent_id)
    }

    /// Delete `id` and its whole subtree; returns the number of rows removed.
    pub fn delete_subtree(&self, id: NodeId) -> ApplicationResult<usize> {
        let mut store = self.write()?;
        BoundaryMutationEngine::new(&mut *store).delete_subtree(id)
    }

    pub fn rename_node(&self, id: NodeId, name: &str) -> ApplicationResult<NodeRow> {
        let mut store = self.write()?;
        BoundaryMutationEngine::new(&mut *store).rename(id, name)
    }

    // ------------------------------------------------------------------
    // Flat queries
    // ------------------------------------------------------------------

    pub fn read_node(&self, id: NodeId) -> ApplicationResult<Option<NodeRow>> {
        let store = self.read()?;
        self.query(&store).find(id)
    }

    pub fn find_descendants(&self, id: NodeId) -> ApplicationResult<Vec<NodeRow>> {
        let store = self.read()?;
        self.query(&store).find_descendants(id)
    }

    pub fn find_immediate_children(&self, id: NodeId) -> ApplicationResult<Vec<NodeRow>> {
        let store = self.read()?;
        self.query(&store).find_immediate_children(id)
    }

    /// Root-to-node path including the node itself.
    pub fn find_ancestor_chain(&self, id: NodeId) -> ApplicationResult<Vec<NodeRow>> {
        let store = self.read()?;
        self.query(&store).find_ancestor_chain(id)
    }

    /// Strict parent of `id`, None for a root.
    ///
    /// The node's own row is dropped from its ancestor chain; the remaining
    /// linear chain is reconstructed and its single childless node is the
    /// parent.
    #[instrument(level = "debug", skip(self))]
    pub fn find_parent(&self, id: NodeId) -> ApplicationResult<Option<NodeRow>> {
        let chain: Vec<NodeRow> = self
            .find_ancestor_chain(id)?
            .into_iter()
            .filter(|row| row.id != id)
            .collect();

        let Some(tree) = self.builder.build(&chain)? else {
            debug!(node = %id, "no ancestors, node is a root");
            return Ok(None);
        };
        Ok(tree.childless_nodes().first().map(|&data| NodeRow::from(data)))
    }

    pub fn all_rows(&self) -> ApplicationResult<Vec<NodeRow>> {
        let store = self.read()?;
        self.query(&store).all()
    }

    // ------------------------------------------------------------------
    // Materialized views
    // ------------------------------------------------------------------

    /// Subtree rooted at `id`.
    pub fn descendants_tree(&self, id: NodeId) -> ApplicationResult<Option<TreeArena>> {
        let rows = self.find_descendants(id)?;
        self.reconstruct_tree(&rows)
    }

    /// `id` with its immediate children attached, nothing deeper.
    pub fn immediate_children_tree(&self, id: NodeId) -> ApplicationResult<Option<TreeArena>> {
        let store = self.read()?;
        let query = self.query(&store);
        let node = query.get(id)?;
        let mut rows = vec![node];
        rows.extend(query.find_immediate_children(id)?);
        drop(store);
        self.reconstruct_tree(&rows)
    }

    /// The tree of the leftmost root; later independent roots are ignored.
    pub fn whole_tree(&self) -> ApplicationResult<Option<TreeArena>> {
        let rows = self.all_rows()?;
        self.reconstruct_tree(&rows)
    }

    /// One tree per independent root, left to right.
    pub fn forest(&self) -> ApplicationResult<Vec<TreeArena>> {
        let rows = self.all_rows()?;
        Ok(self.builder.build_forest(&rows)?)
    }

    /// Build a tree from rows ordered by ascending `left`.
    pub fn reconstruct_tree(&self, rows: &[NodeRow]) -> ApplicationResult<Option<TreeArena>> {
        Ok(self.builder.build(rows)?)
    }

    /// Leaves of a materialized tree, left to right.
    pub fn leaves_of(&self, tree: &TreeArena) -> Vec<NodeRow> {
        tree.leaf_nodes()
            .into_iter()
            .map(|data: &NodeData| NodeRow::from(data))
            .collect()
    }

    /// Verify the nested-set invariants over every stored row.
    pub fn check_invariants(&self) -> ApplicationResult<()> {
        let rows = self.all_rows()?;
        check_rows(&rows)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::MemoryRowStore;

    fn service() -> NodeService<MemoryRowStore> {
        NodeService::new(MemoryRowStore::new())
    }

    #[test]
    fn given_root_when_finding_parent_then_none() {
        let svc = service();
        let root = svc.create_root("Root").unwrap();

        assert!(svc.find_parent(root.id).unwrap().is_none());
    }

    #[test]
    fn given_grandchild_when_finding_parent_then_returns_strict_parent() {
        let svc = service();
        let root = svc.create_root("Root").unwrap();
        let a = svc.create_child("A", root.id).unwrap();
        let a1 = svc.create_child("A1", a.id).unwrap();

        let parent = svc.find_parent(a1.id).unwrap().unwrap();

        assert_eq!(parent.id, a.id);
    }

    #[test]
    fn given_unknown_id_when_finding_parent_then_not_found() {
        let svc = service();
        let err = svc.find_parent(NodeId(3)).unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::NotFound(_))));
    }

    #[test]
    fn given_node_when_reading_then_returns_current_bounds() {
        let svc = service();
        let root = svc.create_root("Root").unwrap();
        svc.create_child("A", root.id).unwrap();

        let row = svc.read_node(root.id).unwrap().unwrap();

        assert_eq!((row.left, row.right), (1, 4));
        assert!(svc.read_node(NodeId(99)).unwrap().is_none());
    }

    #[test]
    fn given_service_when_taking_store_back_then_rows_are_kept() {
        let svc = service();
        svc.create_root("Root").unwrap();

        let store = svc.into_store().unwrap();

        assert_eq!(store.len(), 1);
    }
}
