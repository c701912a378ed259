//! Row Store boundary trait
//!
//! The nested-set engines never touch storage directly; they go through
//! [`RowStore`], which can be backed by memory, a file snapshot, or a
//! database adapter.

use std::io;

use crate::domain::{NewNode, NodeId, NodeRow};

/// Flat relation of `(id, name, left, right, depth)` rows.
///
/// Callers that mutate hold `&mut` access for the whole read-then-shift
/// sequence; implementations do not need their own locking. Batch methods
/// return the number of rows they touched.
pub trait RowStore: Send + Sync {
    /// Highest `right` across all rows, 0 if empty.
    fn max_right(&self) -> io::Result<i64>;

    /// Rows with both bounds inside `[left, right]`, ascending by `left`.
    fn range_by_interval(&self, left: i64, right: i64) -> io::Result<Vec<NodeRow>>;

    /// Rows whose interval contains `[left, right]` (equal included),
    /// ascending by `left`.
    fn range_enclosing(&self, left: i64, right: i64) -> io::Result<Vec<NodeRow>>;

    /// Add `delta` to `left` of every row with `left > boundary`.
    fn shift_left_where_left_greater_than(&mut self, boundary: i64, delta: i64)
        -> io::Result<usize>;

    /// Add `delta` to `right` of every row with `right >= boundary`.
    fn shift_right_where_right_greater_or_equal(
        &mut self,
        boundary: i64,
        delta: i64,
    ) -> io::Result<usize>;

    /// Remove every row with `left >= left AND right <= right`.
    fn delete_where_nested_in(&mut self, left: i64, right: i64) -> io::Result<usize>;

    /// Point lookup.
    fn get_by_id(&self, id: NodeId) -> io::Result<Option<NodeRow>>;

    /// Every row, ascending by `left`.
    fn all_ordered_by_left(&self) -> io::Result<Vec<NodeRow>>;

    /// Append a row and assign it a fresh id.
    fn insert(&mut self, node: NewNode) -> io::Result<NodeRow>;

    /// Replace the label of a row; bounds are untouched.
    fn rename(&mut self, id: NodeId, name: &str) -> io::Result<Option<NodeRow>>;
}
