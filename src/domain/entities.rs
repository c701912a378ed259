//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A stored node: one row of the flat nested-set relation.
///
/// `left < right` always holds for a well-formed row. A row with
/// `right == left + 1` has no interval space for descendants and is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: NodeId,
    pub name: String,
    pub left: i64,
    pub right: i64,
    /// Distance from the tree's root, root = 0
    pub depth: u32,
}

impl NodeRow {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, left: i64, right: i64, depth: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            left,
            right,
            depth,
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.left, self.right)
    }

    pub fn is_leaf(&self) -> bool {
        self.interval().is_leaf()
    }

    /// Interval space consumed by this node and all of its descendants.
    pub fn width(&self) -> i64 {
        self.interval().width()
    }
}

impl fmt::Display for NodeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{},{},{}] #{}",
            self.name, self.left, self.right, self.depth, self.id
        )
    }
}

/// A row about to be appended; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub name: String,
    pub left: i64,
    pub right: i64,
    pub depth: u32,
}

impl NewNode {
    pub fn into_row(self, id: NodeId) -> NodeRow {
        NodeRow {
            id,
            name: self.name,
            left: self.left,
            right: self.right,
            depth: self.depth,
        }
    }
}

/// Closed `[left, right]` interval of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub left: i64,
    pub right: i64,
}

impl Interval {
    pub fn new(left: i64, right: i64) -> Self {
        Self { left, right }
    }

    pub fn is_leaf(&self) -> bool {
        self.right == self.left + 1
    }

    /// `right - left + 1`: the amount every boundary behind this interval
    /// moves when the interval is removed.
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// `other` is equal to or fully nested inside `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.left <= other.left && other.right <= self.right
    }

    /// `other` is a strict descendant of `self`.
    pub fn strictly_contains(&self, other: &Interval) -> bool {
        self.left < other.left && other.right < self.right
    }

    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.right < other.left || other.right < self.left
    }
}

/// Leaf vs composite classification, fully determined by the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Composite,
}

impl NodeKind {
    pub fn classify(left: i64, right: i64) -> Self {
        if Interval::new(left, right).is_leaf() {
            NodeKind::Leaf
        } else {
            NodeKind::Composite
        }
    }
}
