//! Tree builder: reconstructs a materialized hierarchy from nested-set rows.

use tracing::{debug, instrument, trace, warn};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::DomainError;
use crate::domain::fields::NodeFields;
use crate::domain::NodeRow;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// An open composite node whose interval may still receive children.
struct OpenNode {
    idx: generational_arena::Index,
    right: i64,
    depth: u32,
}

/// Constructs materialized trees from rows ordered by ascending `left`.
pub struct TreeBuilder<T = NodeRow> {
    fields: NodeFields<T>,
}

impl Default for TreeBuilder<NodeRow> {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder<NodeRow> {
    pub fn new() -> Self {
        Self::with_fields(NodeRow::FIELDS)
    }
}

impl<T> TreeBuilder<T> {
    pub fn with_fields(fields: NodeFields<T>) -> Self {
        Self { fields }
    }

    /// Build one tree rooted at the first row.
    ///
    /// `rows` must be sorted by ascending `left`. A row is attached to the
    /// innermost open node whose interval still contains it, provided its
    /// depth is exactly one below that node. Leaving the root's interval
    /// ends reconstruction, so trailing independent roots are ignored; use
    /// [`TreeBuilder::build_forest`] for those. Every row is visited once.
    ///
    /// Returns `Ok(None)` for empty input.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn build(&self, rows: &[T]) -> TreeResult<Option<TreeArena>> {
        let Some(first) = rows.first() else {
            return Ok(None);
        };
        self.validate(rows)?;

        let f = &self.fields;
        let mut tree = TreeArena::with_capacity(rows.len());
        let root = self.materialize(&mut tree, first, None);
        let root_right = (f.right)(first);
        if root_right == (f.left)(first) + 1 {
            trace!("root is a leaf, nothing to attach");
            return Ok(Some(tree));
        }

        let mut open = vec![OpenNode {
            idx: root,
            right: root_right,
            depth: (f.depth)(first),
        }];

        for row in &rows[1..] {
            let left = (f.left)(row);
            while open.last().is_some_and(|parent| left >= parent.right) {
                open.pop();
            }
            let Some(parent) = open.last() else {
                debug!(left, "row outside the root interval, stopping");
                break;
            };

            let Some(expected) = parent.depth.checked_add(1) else {
                return Err(DomainError::invariant(format!(
                    "row {} nests below a node at maximum depth",
                    (f.id)(row)
                )));
            };
            let depth = (f.depth)(row);
            if depth != expected {
                warn!(
                    left,
                    depth,
                    expected,
                    "depth does not match enclosing interval, skipping row"
                );
                continue;
            }

            let right = (f.right)(row);
            let idx = self.materialize(&mut tree, row, Some(parent.idx));
            if right != left + 1 {
                open.push(OpenNode { idx, right, depth });
            }
        }

        debug!(nodes = tree.len(), "tree reconstructed");
        Ok(Some(tree))
    }

    /// Build one tree per independent root found in `rows`.
    ///
    /// The input is split wherever a row starts beyond the right boundary of
    /// the current segment's root; each segment is reconstructed on its own.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn build_forest(&self, rows: &[T]) -> TreeResult<Vec<TreeArena>> {
        self.validate(rows)?;

        let f = &self.fields;
        let mut trees = Vec::new();
        let mut start = 0;
        while start < rows.len() {
            let root_right = (f.right)(&rows[start]);
            let end = rows[start..]
                .iter()
                .position(|row| (f.left)(row) > root_right)
                .map_or(rows.len(), |offset| start + offset);
            if let Some(tree) = self.build(&rows[start..end])? {
                trees.push(tree);
            }
            start = end;
        }
        Ok(trees)
    }

    fn materialize(
        &self,
        tree: &mut TreeArena,
        row: &T,
        parent: Option<generational_arena::Index>,
    ) -> generational_arena::Index {
        tree.insert_node(NodeData::from(self.fields.project(row)), parent)
    }

    /// Reject rows with an empty interval and input not ascending by `left`.
    fn validate(&self, rows: &[T]) -> TreeResult<()> {
        let f = &self.fields;
        let mut previous_left = None;
        for row in rows {
            let (left, right) = ((f.left)(row), (f.right)(row));
            if left >= right {
                return Err(DomainError::invariant(format!(
                    "row {} has left {} >= right {}",
                    (f.id)(row),
                    left,
                    right
                )));
            }
            if let Some(prev) = previous_left {
                if left <= prev {
                    return Err(DomainError::invariant(format!(
                        "rows not ascending by left: {} follows {}",
                        left, prev
                    )));
                }
            }
            previous_left = Some(left);
        }
        Ok(())
    }
}
