//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Nested-set tree maintenance over a flat row store
#[derive(Parser, Debug)]
#[command(name = "nestedset")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Row store file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "NESTEDSET_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new root node
    Root {
        /// Node label
        name: String,
    },

    /// Create a node as last child of a parent
    Child {
        /// Node label
        name: String,
        /// Parent node id
        #[arg(short, long)]
        parent: u64,
    },

    /// Delete a node and its whole subtree
    Delete {
        /// Node id
        id: u64,
    },

    /// Change the label of a node
    Rename {
        /// Node id
        id: u64,
        /// New label
        name: String,
    },

    /// Show a subtree, or every tree when no id is given
    Show {
        /// Root of the subtree
        id: Option<u64>,
    },

    /// List the immediate children of a node
    Children {
        /// Node id
        id: u64,
    },

    /// List the root-to-node path
    Ancestors {
        /// Node id
        id: u64,
    },

    /// Show the parent of a node
    Parent {
        /// Node id
        id: u64,
    },

    /// List leaves of a subtree, or of every tree
    Leaves {
        /// Root of the subtree
        id: Option<u64>,
    },

    /// List all rows ordered by left bound
    List,

    /// Verify nested-set invariants of the store
    Check,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective configuration
    Show,
    /// Print a commented config template
    Template,
}
