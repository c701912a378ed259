//! In-memory row store

use std::collections::BTreeMap;
use std::io;

use itertools::Itertools;
use tracing::trace;

use crate::domain::{Interval, NewNode, NodeId, NodeRow};
use crate::infrastructure::traits::RowStore;

/// Rows keyed by id; ordered scans sort by `left` on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRowStore {
    next_id: u64,
    rows: BTreeMap<NodeId, NodeRow>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing rows, e.g. a fixture or an import.
    pub fn from_rows(rows: impl IntoIterator<Item = NodeRow>) -> Self {
        Self::from_parts(0, rows)
    }

    /// Restore a store; the id sequence never goes below the highest row id.
    pub fn from_parts(next_id: u64, rows: impl IntoIterator<Item = NodeRow>) -> Self {
        let rows: BTreeMap<NodeId, NodeRow> = rows.into_iter().map(|r| (r.id, r)).collect();
        let highest = rows.keys().map(|id| id.0).max().unwrap_or(0);
        Self {
            next_id: next_id.max(highest),
            rows,
        }
    }

    /// Last id handed out.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn ordered<'a>(&self, rows: impl Iterator<Item = &'a NodeRow>) -> Vec<NodeRow> {
        rows.sorted_by_key(|r| r.left).cloned().collect()
    }
}

impl RowStore for MemoryRowStore {
    fn max_right(&self) -> io::Result<i64> {
        Ok(self.rows.values().map(|r| r.right).max().unwrap_or(0))
    }

    fn range_by_interval(&self, left: i64, right: i64) -> io::Result<Vec<NodeRow>> {
        let outer = Interval::new(left, right);
        Ok(self.ordered(
            self.rows
                .values()
                .filter(|r| outer.contains(&r.interval())),
        ))
    }

    fn range_enclosing(&self, left: i64, right: i64) -> io::Result<Vec<NodeRow>> {
        let inner = Interval::new(left, right);
        Ok(self.ordered(
            self.rows
                .values()
                .filter(|r| r.interval().contains(&inner)),
        ))
    }

    fn shift_left_where_left_greater_than(
        &mut self,
        boundary: i64,
        delta: i64,
    ) -> io::Result<usize> {
        let mut touched = 0;
        for row in self.rows.values_mut().filter(|r| r.left > boundary) {
            row.left += delta;
            touched += 1;
        }
        trace!(boundary, delta, touched, "shifted left boundaries");
        Ok(touched)
    }

    fn shift_right_where_right_greater_or_equal(
        &mut self,
        boundary: i64,
        delta: i64,
    ) -> io::Result<usize> {
        let mut touched = 0;
        for row in self.rows.values_mut().filter(|r| r.right >= boundary) {
            row.right += delta;
            touched += 1;
        }
        trace!(boundary, delta, touched, "shifted right boundaries");
        Ok(touched)
    }

    fn delete_where_nested_in(&mut self, left: i64, right: i64) -> io::Result<usize> {
        let before = self.rows.len();
        let outer = Interval::new(left, right);
        self.rows.retain(|_, r| !outer.contains(&r.interval()));
        Ok(before - self.rows.len())
    }

    fn get_by_id(&self, id: NodeId) -> io::Result<Option<NodeRow>> {
        Ok(self.rows.get(&id).cloned())
    }

    fn all_ordered_by_left(&self) -> io::Result<Vec<NodeRow>> {
        Ok(self.ordered(self.rows.values()))
    }

    fn insert(&mut self, node: NewNode) -> io::Result<NodeRow> {
        self.next_id += 1;
        let row = node.into_row(NodeId(self.next_id));
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn rename(&mut self, id: NodeId, name: &str) -> io::Result<Option<NodeRow>> {
        Ok(self.rows.get_mut(&id).map(|row| {
            row.name = name.to_string();
            row.clone()
        }))
    }
}
