//! Nested-set tree maintenance.
//!
//! A tree is stored as flat rows of `(id, name, left, right, depth)` where
//! every node owns the interval `[left, right]` and descendants are exactly
//! the rows nested inside it. The crate keeps that encoding consistent
//! across inserts and subtree deletes, answers hierarchy queries with
//! interval scans, and rebuilds in-memory trees from `left`-ordered rows.
//!
//! ```
//! use nestedset::application::services::NodeService;
//! use nestedset::infrastructure::MemoryRowStore;
//!
//! let nodes = NodeService::new(MemoryRowStore::new());
//! let root = nodes.create_root("Electronics").unwrap();
//! let tv = nodes.create_child("Televisions", root.id).unwrap();
//! assert_eq!((tv.left, tv.right), (2, 3));
//! assert_eq!(nodes.find_parent(tv.id).unwrap().map(|p| p.id), Some(root.id));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
