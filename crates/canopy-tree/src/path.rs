//! Virtual path helpers.
//!
//! A path is the `/`-joined list of names from a root-level node down to the
//! node itself, e.g. `src/components/App.jsx`. Paths never start or end with
//! a separator and never contain empty segments.

use crate::{TreeError, TreeResult};

/// Path separator.
pub const SEPARATOR: char = '/';

/// Joins a child name onto an optional parent path.
///
/// An empty parent is treated the same as no parent (root level).
pub fn join(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}{SEPARATOR}{name}"),
        _ => name.to_string(),
    }
}

/// Returns the parent path, or `None` for root-level paths.
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// Returns the last segment of a path.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once(SEPARATOR).map_or(path, |(_, name)| name)
}

/// Returns the lowercased extension of a name, if it has one.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Returns true if `path` equals `ancestor` or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Moves `path` from under `from` to under `to`.
///
/// Returns `None` when `path` is not within `from`.
pub fn rebase(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_within(path, from) {
        return None;
    }
    Some(format!("{to}{}", &path[from.len()..]))
}

/// Checks that a name can be used as a single path segment.
pub fn validate_name(name: &str) -> TreeResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(SEPARATOR) {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Produces the `n`-th alternative for a taken name.
///
/// Files keep their extension last: `notes.txt` becomes `notes (1).txt`.
pub fn disambiguate(name: &str, n: usize, keep_extension: bool) -> String {
    if keep_extension {
        if let Some((stem, ext)) = name.rsplit_once('.') {
            if !stem.is_empty() {
                return format!("{stem} ({n}).{ext}");
            }
        }
    }
    format!("{name} ({n})")
}
