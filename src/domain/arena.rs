use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::{NodeId, NodeKind, NodeRow};

/// Scalar payload of a materialized node, copied from the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: NodeId,
    pub name: String,
    pub left: i64,
    pub right: i64,
    pub depth: u32,
}

impl From<NodeRow> for NodeData {
    fn from(row: NodeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            left: row.left,
            right: row.right,
            depth: row.depth,
        }
    }
}

impl From<&NodeData> for NodeRow {
    fn from(data: &NodeData) -> Self {
        NodeRow {
            id: data.id,
            name: data.name.clone(),
            left: data.left,
            right: data.right,
            depth: data.depth,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{},{}]", self.name, self.left, self.right)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Leaf or composite, fixed at construction from `right == left + 1`
    pub kind: NodeKind,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, ascending by `left`
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }
}

/// Materialized tree reconstructed from nested-set rows.
///
/// All nodes live in one owned generational arena; parent and child links
/// are arena indices, so there is no shared or cyclic ownership. A tree is
/// built fresh per query and never writes back to the store.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            root: None,
        }
    }

    /// Insert a node below `parent`, or as the root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let kind = NodeKind::classify(data.left, data.right);
        let node = TreeNode {
            data,
            kind,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Parent of the node at `idx`, None for the root.
    pub fn parent_of(&self, idx: Index) -> Option<&TreeNode> {
        self.get_node(idx)
            .and_then(|node| node.parent)
            .and_then(|parent| self.get_node(parent))
    }

    /// Children of the node at `idx` in ascending `left` order.
    pub fn children_of(&self, idx: Index) -> impl Iterator<Item = &TreeNode> + '_ {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&child| self.get_node(child))
    }

    pub fn find(&self, id: NodeId) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.id == id)
            .map(|(idx, _)| idx)
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_height(root)
        } else {
            0
        }
    }

    fn calculate_height(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_height(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the leaves of the tree, left to right.
    ///
    /// A node with `right == left + 1` is emitted and not descended into;
    /// every other node contributes the leaves of its children. An empty
    /// tree yields an empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<&NodeData> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves<'a>(&'a self, node_idx: Index, leaves: &mut Vec<&'a NodeData>) {
        if let Some(node) = self.get_node(node_idx) {
            if node.is_leaf() {
                leaves.push(&node.data);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// Nodes with no attached children, left to right.
    ///
    /// Unlike [`TreeArena::leaf_nodes`] this looks at the materialized shape,
    /// not the interval: the deepest row of a partial chain has no children
    /// here even when its interval is wide.
    pub fn childless_nodes(&self) -> Vec<&NodeData> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.data)
            .collect()
    }
}

/// Pre-order traversal; yields nodes in ascending `left` order.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
