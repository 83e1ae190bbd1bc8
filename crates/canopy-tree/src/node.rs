//! Tree nodes.
//!
//! ## Learning: Enums as Tagged Unions
//!
//! A `Node` is either a file or a folder. Instead of a single struct with an
//! optional `content` and an optional `children`, each variant owns exactly
//! the data it needs. The compiler then forces every caller to decide what to
//! do with each kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path;

/// A file with in-memory text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// File name (last path segment)
    pub name: String,

    /// Full virtual path
    pub path: String,

    /// Current text content
    pub content: String,
}

impl FileNode {
    /// Creates an empty file.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: String::new(),
        }
    }
}

/// A folder holding an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder name (last path segment)
    pub name: String,

    /// Full virtual path
    pub path: String,

    /// Children in insertion order
    pub children: Vec<Node>,
}

impl FolderNode {
    /// Creates an empty folder.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }
}

/// A file or folder entry in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(FileNode),
    Folder(FolderNode),
}

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
        })
    }
}

impl Node {
    /// Returns the node's name.
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Folder(folder) => &folder.name,
        }
    }

    /// Returns the node's full path.
    pub fn path(&self) -> &str {
        match self {
            Node::File(file) => &file.path,
            Node::Folder(folder) => &folder.path,
        }
    }

    /// Returns the node type.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Folder(_) => NodeKind::Folder,
        }
    }

    /// Returns true if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    /// Returns true if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    /// Returns the file content, or `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::File(file) => Some(file.content.as_str()),
            Node::Folder(_) => None,
        }
    }

    /// Returns the children of a folder (empty for files).
    pub fn children(&self) -> &[Node] {
        match self {
            Node::File(_) => &[],
            Node::Folder(folder) => &folder.children,
        }
    }

    /// Counts this node and everything below it.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Returns the editor language for a file, based on its extension.
    pub fn language(&self) -> Option<&'static str> {
        match self {
            Node::Folder(_) => None,
            Node::File(file) => Some(match path::extension(&file.name).as_deref() {
                Some("js" | "jsx") => "javascript",
                Some("ts" | "tsx") => "typescript",
                Some("css") => "css",
                Some("html") => "html",
                Some("json") => "json",
                Some("md") => "markdown",
                Some("py") => "python",
                Some("java") => "java",
                Some("cs") => "csharp",
                Some("php") => "php",
                _ => "plaintext",
            }),
        }
    }

    /// Returns the icon name for this node.
    pub fn icon(&self) -> &'static str {
        match self {
            Node::Folder(_) => "folder",
            Node::File(file) => match path::extension(&file.name).as_deref() {
                Some("js") => "javascript",
                Some("jsx") => "react",
                Some("ts" | "tsx") => "typescript",
                Some("css") => "css",
                Some("html") => "html",
                Some("json") => "json",
                Some("md") => "markdown",
                Some("py") => "python",
                _ => "file",
            },
        }
    }

    /// Renames the node and rewrites the paths of its whole subtree.
    pub(crate) fn rename(&mut self, name: String, new_path: String) {
        let old_path = self.path().to_string();
        match self {
            Node::File(file) => {
                file.name = name;
                file.path = new_path;
            }
            Node::Folder(folder) => {
                folder.name = name;
                for child in &mut folder.children {
                    child.rebase(&old_path, &new_path);
                }
                folder.path = new_path;
            }
        }
    }

    fn rebase(&mut self, from: &str, to: &str) {
        let slot = match self {
            Node::File(file) => &mut file.path,
            Node::Folder(folder) => {
                for child in &mut folder.children {
                    child.rebase(from, to);
                }
                &mut folder.path
            }
        };
        if let Some(rebased) = path::rebase(slot.as_str(), from, to) {
            *slot = rebased;
        }
    }
}
