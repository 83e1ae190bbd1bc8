//! # Canopy Tree
//!
//! In-memory virtual file tree used as the single source of truth for a
//! project's files and folders.
//!
//! ## Key Concepts
//!
//! ### Tagged Variants
//! - `Node` is an enum: a file carries `content`, a folder carries `children`
//! - Pattern matching makes it impossible to read the content of a folder
//!
//! ### Structural Recursion
//! - Every mutation walks `&mut Vec<Node>` and recurses into folders
//! - A node's `path` is derived from its position and rebuilt on rename
//!
//! ### Paths
//! - Paths are `/`-joined names relative to the (implicit) root
//! - They are plain strings, never touched by the host filesystem

mod node;
pub mod path;
mod tree;

pub use node::{FileNode, FolderNode, Node, NodeKind};
pub use tree::{DuplicatePolicy, FileTree, Files, VisibleRow};

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors that can occur while mutating the tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("No such file or folder: {0}")]
    NotFound(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

impl TreeError {
    /// Returns true for lookup misses, which callers usually tolerate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound(_))
    }
}
