//! The project explorer: file tree plus the view-state that points into it.
//!
//! ## Learning: Reducers with `&mut self`
//!
//! Every operation takes `&mut self`, runs to completion, and leaves the
//! explorer in a consistent state. Since Rust allows only one `&mut` at a
//! time, no reader can ever observe a half-applied change.
//!
//! View-state (`selected_path`, `active_editor`, `expanded`) refers to nodes
//! by path. Stale expanded paths are harmless and kept; the selection and
//! active editor are cleared when the node they name is deleted.

use std::collections::HashSet;

use canopy_tree::path as vpath;
use canopy_tree::{FileTree, Node, VisibleRow};

use crate::CoreResult;
use crate::archive::ExportJob;
use crate::config::{ArchiveConfig, Config, ExplorerConfig};
use crate::event::{EventBus, ExplorerEvent};

/// Owns the virtual file tree and its selection/expansion state.
pub struct Explorer {
    /// The authoritative tree
    tree: FileTree,

    /// Highlighted node in the explorer
    selected: Option<String>,

    /// File shown in the editor pane
    active_editor: Option<String>,

    /// Expanded folder paths
    expanded: HashSet<String>,

    /// Explorer behavior
    config: ExplorerConfig,

    /// Export settings
    archive: ArchiveConfig,

    /// Change notifications
    events: EventBus,
}

impl Explorer {
    /// Creates an empty explorer with default settings.
    pub fn new() -> Self {
        Self::with_config(&Config::default(), EventBus::new())
    }

    /// Creates an empty explorer publishing to `events`.
    pub fn with_config(config: &Config, events: EventBus) -> Self {
        Self {
            tree: FileTree::new(),
            selected: None,
            active_editor: None,
            expanded: HashSet::new(),
            config: config.explorer.clone(),
            archive: config.archive.clone(),
            events,
        }
    }

    // ==================== Mutations ====================

    /// Creates an empty file under `parent` (root level when `None` or empty).
    ///
    /// On success the new file becomes selected and active. Returns the
    /// path actually used, which differs from the requested one only under
    /// [`DuplicatePolicy::Rename`](canopy_tree::DuplicatePolicy::Rename).
    pub fn create_file(&mut self, parent: Option<&str>, name: &str) -> CoreResult<String> {
        let path = self
            .tree
            .create_file(parent, name, self.config.duplicate_policy)?;

        if self.config.auto_open_created {
            self.selected = Some(path.clone());
            self.active_editor = Some(path.clone());
        }
        self.emit(ExplorerEvent::FileCreated(path.clone()));
        Ok(path)
    }

    /// Creates an empty folder under `parent` and expands it.
    pub fn create_folder(&mut self, parent: Option<&str>, name: &str) -> CoreResult<String> {
        let path = self
            .tree
            .create_folder(parent, name, self.config.duplicate_policy)?;

        if self.config.auto_expand_created {
            self.expanded.insert(path.clone());
        }
        self.emit(ExplorerEvent::FolderCreated(path.clone()));
        Ok(path)
    }

    /// Replaces the content of the file at `path`.
    pub fn update_file_content(
        &mut self,
        path: &str,
        content: impl Into<String>,
    ) -> CoreResult<()> {
        self.tree.update_content(path, content)?;
        self.emit(ExplorerEvent::ContentChanged(path.to_string()));
        Ok(())
    }

    /// Deletes the node at `path` with its whole subtree.
    ///
    /// If the active editor or the selection lies inside the removed subtree,
    /// both are cleared. Expanded entries below `path` are left stale.
    pub fn delete_item(&mut self, path: &str) -> CoreResult<Node> {
        let removed = self.tree.delete(path)?;

        let removed_here =
            |slot: &Option<String>| slot.as_deref().is_some_and(|p| vpath::is_within(p, path));
        if removed_here(&self.active_editor) || removed_here(&self.selected) {
            self.active_editor = None;
            self.selected = None;
        }
        self.emit(ExplorerEvent::ItemDeleted(path.to_string()));
        Ok(removed)
    }

    /// Renames the node at `path`, carrying view-state along.
    ///
    /// Returns the new path.
    pub fn rename_item(&mut self, path: &str, new_name: &str) -> CoreResult<String> {
        let new_path = self
            .tree
            .rename(path, new_name, self.config.duplicate_policy)?;
        if new_path == path {
            return Ok(new_path);
        }

        for slot in [&mut self.selected, &mut self.active_editor] {
            let rebased = slot
                .as_deref()
                .and_then(|p| vpath::rebase(p, path, &new_path));
            if rebased.is_some() {
                *slot = rebased;
            }
        }
        self.expanded = self
            .expanded
            .drain()
            .map(|p| vpath::rebase(&p, path, &new_path).unwrap_or(p))
            .collect();

        self.emit(ExplorerEvent::ItemRenamed {
            from: path.to_string(),
            to: new_path.clone(),
        });
        Ok(new_path)
    }

    /// Flips the expanded state of a folder. Returns the new state.
    pub fn toggle_folder(&mut self, path: &str) -> bool {
        let expanded = if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        };
        self.emit(ExplorerEvent::FolderToggled {
            path: path.to_string(),
            expanded,
        });
        expanded
    }

    /// Makes `path` the selection and the active editor.
    ///
    /// The path is not checked against the tree.
    pub fn open_file(&mut self, path: &str) {
        self.selected = Some(path.to_string());
        self.active_editor = Some(path.to_string());
        self.emit(ExplorerEvent::FileOpened(path.to_string()));
    }

    // ==================== Export ====================

    /// Snapshots every file for export.
    ///
    /// The returned job owns its data; the explorer may keep changing while
    /// the job runs.
    pub fn snapshot(&self) -> ExportJob {
        ExportJob {
            file_name: self.archive.file_name.clone(),
            files: self
                .tree
                .files()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
            compression: self.archive.compression,
            events: self.events.clone(),
        }
    }

    /// Snapshots and compresses the project in one step.
    pub async fn export_archive(&self) -> CoreResult<crate::Archive> {
        self.snapshot().run().await
    }

    // ==================== Queries ====================

    /// Returns the file tree.
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Finds a node by path.
    pub fn find(&self, path: &str) -> Option<&Node> {
        self.tree.find(path)
    }

    /// Returns the content of a file.
    pub fn file_content(&self, path: &str) -> Option<&str> {
        self.tree.content(path)
    }

    /// Returns the selected path.
    pub fn selected_path(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns the path open in the editor.
    pub fn active_editor(&self) -> Option<&str> {
        self.active_editor.as_deref()
    }

    /// Returns true if the folder at `path` is expanded.
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Returns all expanded folder paths.
    pub fn expanded_folders(&self) -> &HashSet<String> {
        &self.expanded
    }

    /// Iterates over every file as `(path, content)`.
    pub fn files(&self) -> canopy_tree::Files<'_> {
        self.tree.files()
    }

    /// Returns the rows an explorer panel would show.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        self.tree.visible_rows(&self.expanded)
    }

    /// Subscribes to explorer events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ExplorerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ExplorerEvent) {
        self.events.emit(event);
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_tree::{DuplicatePolicy, TreeError};
    use proptest::prelude::*;

    fn explorer() -> Explorer {
        Explorer::new()
    }

    #[test]
    fn test_create_file_opens_it() {
        let mut ex = explorer();
        ex.create_folder(None, "src").unwrap();
        let path = ex.create_file(Some("src"), "main.js").unwrap();

        assert_eq!(path, "src/main.js");
        assert_eq!(ex.active_editor(), Some("src/main.js"));
        assert_eq!(ex.selected_path(), Some("src/main.js"));
        assert_eq!(ex.file_content("src/main.js"), Some(""));
    }

    #[test]
    fn test_create_folder_expands_it() {
        let mut ex = explorer();
        ex.create_folder(None, "src").unwrap();
        ex.create_folder(Some("src"), "lib").unwrap();

        assert!(ex.is_expanded("src"));
        assert!(ex.is_expanded("src/lib"));
        assert_eq!(ex.active_editor(), None);
    }

    #[test]
    fn test_create_in_missing_parent_leaves_state() {
        let mut ex = explorer();
        ex.create_file(None, "a.txt").unwrap();

        let err = ex.create_file(Some("ghost"), "b.txt").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(ex.tree().len(), 1);
        assert_eq!(ex.active_editor(), Some("a.txt"));
    }

    #[test]
    fn test_auto_open_disabled() {
        let mut config = Config::default();
        config.explorer.auto_open_created = false;
        config.explorer.auto_expand_created = false;
        let mut ex = Explorer::with_config(&config, EventBus::new());

        ex.create_file(None, "a.txt").unwrap();
        ex.create_folder(None, "src").unwrap();

        assert_eq!(ex.active_editor(), None);
        assert!(!ex.is_expanded("src"));
    }

    #[test]
    fn test_duplicate_policy_from_config() {
        let mut ex = explorer();
        ex.create_file(None, "a.txt").unwrap();
        assert!(matches!(
            ex.create_file(None, "a.txt"),
            Err(crate::CoreError::Tree(TreeError::AlreadyExists(_)))
        ));

        let mut config = Config::default();
        config.explorer.duplicate_policy = DuplicatePolicy::Rename;
        let mut ex = Explorer::with_config(&config, EventBus::new());
        ex.create_file(None, "a.txt").unwrap();
        assert_eq!(ex.create_file(None, "a.txt").unwrap(), "a (1).txt");
    }

    #[test]
    fn test_update_after_create() {
        let mut ex = explorer();
        ex.create_folder(None, "docs").unwrap();
        ex.create_file(Some("docs"), "README.md").unwrap();
        ex.update_file_content("docs/README.md", "# Hello").unwrap();

        let node = ex.find("docs/README.md").unwrap();
        assert_eq!(node.content(), Some("# Hello"));
        assert_eq!(node.path(), "docs/README.md");
    }

    #[test]
    fn test_delete_active_clears_selection() {
        let mut ex = explorer();
        ex.create_file(None, "a.txt").unwrap();
        ex.create_file(None, "b.txt").unwrap();
        assert_eq!(ex.active_editor(), Some("b.txt"));

        ex.delete_item("a.txt").unwrap();
        assert_eq!(ex.active_editor(), Some("b.txt"));
        assert_eq!(ex.selected_path(), Some("b.txt"));

        ex.delete_item("b.txt").unwrap();
        assert_eq!(ex.active_editor(), None);
        assert_eq!(ex.selected_path(), None);
    }

    #[test]
    fn test_delete_folder_closes_file_inside() {
        let mut ex = explorer();
        ex.create_folder(None, "src").unwrap();
        ex.create_file(Some("src"), "main.js").unwrap();
        ex.create_file(None, "srcs.txt").unwrap();
        ex.open_file("src/main.js");

        ex.delete_item("src").unwrap();

        assert!(ex.find("src/main.js").is_none());
        assert_eq!(ex.active_editor(), None);
        assert_eq!(ex.selected_path(), None);
    }

    #[test]
    fn test_delete_sibling_prefix_keeps_editor() {
        let mut ex = explorer();
        ex.create_folder(None, "src").unwrap();
        ex.create_file(None, "srcs.txt").unwrap();

        ex.delete_item("src").unwrap();

        assert_eq!(ex.active_editor(), Some("srcs.txt"));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut ex = explorer();
        ex.create_file(None, "a.txt").unwrap();
        let before = ex.tree().clone();

        assert!(ex.delete_item("nope").unwrap_err().is_not_found());
        assert_eq!(ex.tree(), &before);
        assert_eq!(ex.active_editor(), Some("a.txt"));
    }

    #[test]
    fn test_delete_nested_folder() {
        let mut ex = explorer();
        ex.create_folder(None, "root").unwrap();
        ex.create_folder(Some("root"), "sub1").unwrap();
        ex.create_folder(Some("root/sub1"), "sub2").unwrap();
        ex.create_file(Some("root/sub1/sub2"), "file.txt").unwrap();

        ex.delete_item("root/sub1").unwrap();

        assert!(ex.find("root").is_some());
        assert!(ex.find("root/sub1/sub2").is_none());
        assert!(ex.find("root/sub1/sub2/file.txt").is_none());
        // stale expansion entries are tolerated
        assert!(ex.is_expanded("root/sub1/sub2"));
    }

    #[test]
    fn test_rename_moves_view_state() {
        let mut ex = explorer();
        ex.create_folder(None, "src").unwrap();
        ex.create_folder(Some("src"), "ui").unwrap();
        ex.create_file(Some("src/ui"), "App.jsx").unwrap();

        let new_path = ex.rename_item("src", "app").unwrap();

        assert_eq!(new_path, "app");
        assert_eq!(ex.active_editor(), Some("app/ui/App.jsx"));
        assert_eq!(ex.selected_path(), Some("app/ui/App.jsx"));
        assert!(ex.is_expanded("app"));
        assert!(ex.is_expanded("app/ui"));
        assert!(!ex.is_expanded("src"));
        assert!(ex.find("app/ui/App.jsx").is_some());
    }

    #[test]
    fn test_open_file_without_check() {
        let mut ex = explorer();
        ex.open_file("not/there.txt");
        assert_eq!(ex.active_editor(), Some("not/there.txt"));
        assert_eq!(ex.selected_path(), Some("not/there.txt"));
    }

    #[test]
    fn test_events_emitted() {
        let mut ex = explorer();
        let mut rx = ex.subscribe();

        ex.create_folder(None, "src").unwrap();
        ex.toggle_folder("src");
        ex.delete_item("src").unwrap();

        assert_eq!(rx.try_recv().unwrap(), ExplorerEvent::FolderCreated("src".into()));
        assert_eq!(
            rx.try_recv().unwrap(),
            ExplorerEvent::FolderToggled {
                path: "src".into(),
                expanded: false
            }
        );
        assert_eq!(rx.try_recv().unwrap(), ExplorerEvent::ItemDeleted("src".into()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_export_empty() {
        let archive = explorer().export_archive().await.unwrap();
        assert_eq!(archive.entries(), 0);
        assert_eq!(archive.file_name(), "project.zip");
    }

    #[tokio::test]
    async fn test_export_contents() {
        let mut ex = explorer();
        ex.create_file(None, "a.txt").unwrap();
        ex.update_file_content("a.txt", "hi").unwrap();
        ex.create_folder(None, "dir").unwrap();
        ex.create_file(Some("dir"), "b.txt").unwrap();
        ex.update_file_content("dir/b.txt", "bye").unwrap();
        ex.create_folder(None, "empty").unwrap();

        let archive = ex.export_archive().await.unwrap();

        assert_eq!(
            archive.read_entries().unwrap(),
            [
                ("a.txt".to_string(), "hi".to_string()),
                ("dir/b.txt".to_string(), "bye".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_snapshot_isolated_from_later_edits() {
        let mut ex = explorer();
        ex.create_file(None, "a.txt").unwrap();
        ex.update_file_content("a.txt", "before").unwrap();

        let job = ex.snapshot();
        ex.update_file_content("a.txt", "after").unwrap();
        ex.create_file(None, "b.txt").unwrap();
        assert_eq!(job.len(), 1);
        assert!(explorer().snapshot().is_empty());

        let entries = job.run().await.unwrap().read_entries().unwrap();
        assert_eq!(entries, [("a.txt".to_string(), "before".to_string())]);
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_restores(
            path in "[a-z]{1,6}(/[a-z]{1,6}){0,3}",
            preset in any::<bool>(),
        ) {
            let mut ex = explorer();
            if preset {
                ex.toggle_folder(&path);
            }
            let before = ex.is_expanded(&path);
            ex.toggle_folder(&path);
            prop_assert_ne!(ex.is_expanded(&path), before);
            ex.toggle_folder(&path);
            prop_assert_eq!(ex.is_expanded(&path), before);
        }

        #[test]
        fn prop_delete_other_keeps_active(
            names in proptest::collection::hash_set("[a-z]{1,6}", 2..10),
        ) {
            let mut ex = explorer();
            let names: Vec<String> = names.into_iter().collect();
            for name in &names {
                ex.create_file(None, name).unwrap();
            }
            let active = names.last().unwrap().clone();
            for name in &names[..names.len() - 1] {
                ex.delete_item(name).unwrap();
                prop_assert_eq!(ex.active_editor(), Some(active.as_str()));
            }
            ex.delete_item(&active).unwrap();
            prop_assert_eq!(ex.active_editor(), None);
            prop_assert!(ex.tree().is_empty());
        }
    }
}
