//! The file tree itself.
//!
//! ## Learning: Recursion over `&mut`
//!
//! Every mutation first walks down to the `Vec<Node>` that owns the target
//! (the root list or a folder's `children`) and then edits that vector in
//! place. Because the walk hands out a single `&mut` at a time, the borrow
//! checker guarantees that nothing else observes the tree half-modified.
//!
//! Lookups prune by path prefix: a folder is only entered when the target
//! path lies beneath it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::node::{FileNode, FolderNode, Node};
use crate::path;
use crate::{TreeError, TreeResult};

/// What to do when a created or renamed node would collide with a sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with [`TreeError::AlreadyExists`]
    #[default]
    Reject,
    /// Pick the first free `name (n)` variant
    Rename,
}

/// An ordered forest of root-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTree {
    roots: Vec<Node>,
}

/// A row of the flattened explorer view.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    /// Nesting level, 0 for root-level nodes
    pub depth: usize,
    /// The node shown on this row
    pub node: &'a Node,
    /// Whether the node is an expanded folder
    pub expanded: bool,
}

impl FileTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root-level nodes in insertion order.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns the total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    /// Finds a node by path.
    pub fn find(&self, target: &str) -> Option<&Node> {
        find_in(&self.roots, target)
    }

    /// Returns true if a node exists at `target`.
    pub fn contains(&self, target: &str) -> bool {
        self.find(target).is_some()
    }

    /// Returns the content of the file at `target`.
    pub fn content(&self, target: &str) -> Option<&str> {
        self.find(target).and_then(Node::content)
    }

    /// Appends an empty file to `parent` (or the root when `None`).
    ///
    /// Returns the path of the new file.
    pub fn create_file(
        &mut self,
        parent: Option<&str>,
        name: &str,
        policy: DuplicatePolicy,
    ) -> TreeResult<String> {
        self.insert(parent, name, policy, true)
    }

    /// Appends an empty folder to `parent` (or the root when `None`).
    ///
    /// Returns the path of the new folder.
    pub fn create_folder(
        &mut self,
        parent: Option<&str>,
        name: &str,
        policy: DuplicatePolicy,
    ) -> TreeResult<String> {
        self.insert(parent, name, policy, false)
    }

    fn insert(
        &mut self,
        parent: Option<&str>,
        name: &str,
        policy: DuplicatePolicy,
        is_file: bool,
    ) -> TreeResult<String> {
        path::validate_name(name)?;
        let parent = parent.filter(|p| !p.is_empty());
        let siblings = self.children_mut(parent)?;
        let name = unique_name(siblings.as_slice(), parent, name, policy, is_file, None)?;
        let new_path = path::join(parent, &name);

        let node = if is_file {
            Node::File(FileNode::new(name, new_path.clone()))
        } else {
            Node::Folder(FolderNode::new(name, new_path.clone()))
        };
        siblings.push(node);

        tracing::trace!(path = %new_path, is_file, "node created");
        Ok(new_path)
    }

    /// Replaces the content of the file at `target`.
    pub fn update_content(&mut self, target: &str, content: impl Into<String>) -> TreeResult<()> {
        match find_in_mut(&mut self.roots, target) {
            Some(Node::File(file)) => {
                file.content = content.into();
                Ok(())
            }
            Some(Node::Folder(_)) => Err(TreeError::NotAFile(target.to_string())),
            None => Err(TreeError::NotFound(target.to_string())),
        }
    }

    /// Removes the node at `target` together with its subtree.
    ///
    /// Returns the removed node.
    pub fn delete(&mut self, target: &str) -> TreeResult<Node> {
        let removed = remove_from(&mut self.roots, target)
            .ok_or_else(|| TreeError::NotFound(target.to_string()))?;
        tracing::trace!(path = %target, nodes = removed.subtree_len(), "node deleted");
        Ok(removed)
    }

    /// Renames the node at `target`, keeping its position among its siblings.
    ///
    /// Paths of every descendant are rewritten. Returns the new path.
    pub fn rename(
        &mut self,
        target: &str,
        new_name: &str,
        policy: DuplicatePolicy,
    ) -> TreeResult<String> {
        path::validate_name(new_name)?;
        let parent = path::parent(target);
        let siblings = self
            .children_mut(parent)
            .map_err(|_| TreeError::NotFound(target.to_string()))?;
        let index = siblings
            .iter()
            .position(|node| node.path() == target)
            .ok_or_else(|| TreeError::NotFound(target.to_string()))?;

        let is_file = siblings[index].is_file();
        let name = unique_name(
            siblings.as_slice(),
            parent,
            new_name,
            policy,
            is_file,
            Some(index),
        )?;
        let new_path = path::join(parent, &name);
        siblings[index].rename(name, new_path.clone());

        tracing::trace!(from = %target, to = %new_path, "node renamed");
        Ok(new_path)
    }

    /// Iterates over every file depth-first as `(path, content)`.
    pub fn files(&self) -> Files<'_> {
        Files {
            stack: vec![self.roots.iter()],
        }
    }

    /// Flattens the tree into explorer rows, descending only into folders
    /// whose path is in `expanded`.
    pub fn visible_rows(&self, expanded: &HashSet<String>) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        collect_rows(&self.roots, 0, expanded, &mut rows);
        rows
    }

    /// Resolves the children list of `parent`, or the root list for `None`.
    fn children_mut(&mut self, parent: Option<&str>) -> TreeResult<&mut Vec<Node>> {
        let Some(parent) = parent else {
            return Ok(&mut self.roots);
        };
        match find_in_mut(&mut self.roots, parent) {
            Some(Node::Folder(folder)) => Ok(&mut folder.children),
            Some(Node::File(_)) => Err(TreeError::NotAFolder(parent.to_string())),
            None => Err(TreeError::NotFound(parent.to_string())),
        }
    }
}

/// Depth-first iterator over the files of a [`FileTree`].
pub struct Files<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Files<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(Node::File(file)) => {
                    return Some((file.path.as_str(), file.content.as_str()));
                }
                Some(Node::Folder(folder)) => self.stack.push(folder.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], target: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.path() == target {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if path::is_within(target, &folder.path) {
                return find_in(&folder.children, target);
            }
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [Node], target: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.path() == target {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if path::is_within(target, &folder.path) {
                return find_in_mut(&mut folder.children, target);
            }
        }
    }
    None
}

/// Filter-and-replace at whichever level holds `target`.
fn remove_from(nodes: &mut Vec<Node>, target: &str) -> Option<Node> {
    if let Some(index) = nodes.iter().position(|node| node.path() == target) {
        return Some(nodes.remove(index));
    }
    for node in nodes.iter_mut() {
        if let Node::Folder(folder) = node {
            if path::is_within(target, &folder.path) {
                return remove_from(&mut folder.children, target);
            }
        }
    }
    None
}

fn unique_name(
    siblings: &[Node],
    parent: Option<&str>,
    name: &str,
    policy: DuplicatePolicy,
    keep_extension: bool,
    skip: Option<usize>,
) -> TreeResult<String> {
    let taken = |candidate: &str| {
        siblings
            .iter()
            .enumerate()
            .any(|(i, node)| Some(i) != skip && node.name() == candidate)
    };

    if !taken(name) {
        return Ok(name.to_string());
    }
    match policy {
        DuplicatePolicy::Reject => Err(TreeError::AlreadyExists(path::join(parent, name))),
        DuplicatePolicy::Rename => {
            let mut n = 1;
            loop {
                let candidate = path::disambiguate(name, n, keep_extension);
                if !taken(&candidate) {
                    return Ok(candidate);
                }
                n += 1;
            }
        }
    }
}

fn collect_rows<'a>(
    nodes: &'a [Node],
    depth: usize,
    expanded: &HashSet<String>,
    rows: &mut Vec<VisibleRow<'a>>,
) {
    for node in nodes {
        let is_open = node.is_folder() && expanded.contains(node.path());
        rows.push(VisibleRow {
            depth,
            node,
            expanded: is_open,
        });
        if is_open {
            collect_rows(node.children(), depth + 1, expanded, rows);
        }
    }
}
