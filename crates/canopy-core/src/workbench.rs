//! Workbench facade.
//!
//! ## Learning: The Facade Pattern
//!
//! `Workbench` bundles the explorer, the terminal panel, configuration and
//! the event bus behind a single `execute` entry point. Front ends only
//! need to turn user input into [`Command`]s and print the [`Outcome`].

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::command::{Command, USAGE};
use crate::config::Config;
use crate::event::{EventBus, ExplorerEvent};
use crate::explorer::Explorer;
use crate::terminal::Terminal;
use crate::{CoreResult, Node, TreeError};

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, nothing to print
    Done,
    /// Text for the user
    Text(String),
    /// Archive written to disk
    Exported { path: PathBuf, entries: usize },
}

/// The editor shell without its UI.
pub struct Workbench {
    explorer: Explorer,
    terminal: Terminal,
    config: Config,
    events: EventBus,
    output_dir: PathBuf,
}

impl Workbench {
    /// Creates a workbench with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a workbench with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let events = EventBus::new();
        Self {
            explorer: Explorer::with_config(&config, events.clone()),
            terminal: Terminal::new(&config.terminal),
            config,
            events,
            output_dir: PathBuf::from("."),
        }
    }

    /// Sets the directory exported archives are written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Parses and executes one input line.
    pub async fn run_line(&mut self, line: &str) -> CoreResult<Outcome> {
        let cmd = Command::parse(line)?;
        self.execute(cmd).await
    }

    /// Executes a command.
    pub async fn execute(&mut self, cmd: Command) -> CoreResult<Outcome> {
        tracing::debug!("Executing {}: {:?}", cmd.display_name(), cmd);

        let outcome = match cmd {
            Command::NewFile { parent, name } => {
                self.explorer.create_file(parent.as_deref(), &name)?;
                Outcome::Done
            }
            Command::NewFolder { parent, name } => {
                self.explorer.create_folder(parent.as_deref(), &name)?;
                Outcome::Done
            }
            Command::Write { path, content } => {
                self.explorer.update_file_content(&path, content)?;
                Outcome::Done
            }
            Command::Show { path } => {
                let node = self
                    .explorer
                    .find(&path)
                    .ok_or_else(|| TreeError::NotFound(path.clone()))?;
                let content = node.content().ok_or(TreeError::NotAFile(path.clone()))?;
                Outcome::Text(content.to_string())
            }
            Command::Stat { path } => {
                let node = self
                    .explorer
                    .find(&path)
                    .ok_or_else(|| TreeError::NotFound(path.clone()))?;
                Outcome::Text(describe(node))
            }
            Command::Delete { path } => {
                self.explorer.delete_item(&path)?;
                Outcome::Done
            }
            Command::Rename { path, name } => {
                self.explorer.rename_item(&path, &name)?;
                Outcome::Done
            }
            Command::Toggle { path } => {
                self.explorer.toggle_folder(&path);
                Outcome::Done
            }
            Command::Open { path } => {
                self.explorer.open_file(&path);
                Outcome::Done
            }
            Command::Export => {
                let job = self.explorer.snapshot();
                if job.is_empty() {
                    tracing::warn!("Exporting a project without files");
                }
                let archive = job.run().await?;
                let path = archive.save_in(&self.output_dir).await?;
                Outcome::Exported {
                    path,
                    entries: archive.entries(),
                }
            }
            Command::Tree { json: true } => {
                Outcome::Text(serde_json::to_string_pretty(self.explorer.tree())?)
            }
            Command::Tree { json: false } => Outcome::Text(self.render_tree()),
            Command::Terminal { line } => match self.terminal.execute(&line) {
                Some(entry) if entry.output.is_empty() => Outcome::Text(entry.command.clone()),
                Some(entry) => Outcome::Text(format!("{}\n{}", entry.command, entry.output)),
                None => Outcome::Done,
            },
            Command::Help => {
                let mut text = String::new();
                for (usage, about) in USAGE {
                    let _ = writeln!(text, "  {usage:<22} {about}");
                }
                Outcome::Text(text.trim_end().to_string())
            }
        };
        Ok(outcome)
    }

    /// Renders the explorer panel as indented text.
    ///
    /// Folders show `▾`/`▸` for expanded/collapsed, the active editor is
    /// marked with `*`.
    pub fn render_tree(&self) -> String {
        let active = self.explorer.active_editor();
        let mut out = String::new();
        for row in self.explorer.visible_rows() {
            let indent = "  ".repeat(row.depth);
            let marker = match (row.node.is_folder(), row.expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            let star = if active == Some(row.node.path()) { " *" } else { "" };
            let _ = writeln!(out, "{indent}{marker}{}{star}", row.node.name());
        }
        out.trim_end().to_string()
    }

    /// Returns the explorer.
    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    /// Returns the explorer for direct mutation.
    pub fn explorer_mut(&mut self) -> &mut Explorer {
        &mut self.explorer
    }

    /// Returns the terminal panel.
    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the archive output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Subscribes to explorer events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ExplorerEvent> {
        self.events.subscribe()
    }
}

/// Formats the `stat` report for a node.
fn describe(node: &Node) -> String {
    let mut text = format!("path: {}\nkind: {}\nicon: {}", node.path(), node.kind(), node.icon());
    match (node.language(), node.content()) {
        (Some(language), Some(content)) => {
            let _ = write!(text, "\nlanguage: {language}\nsize: {} bytes", content.len());
        }
        _ => {
            let _ = write!(text, "\nentries: {}", node.subtree_len() - 1);
        }
    }
    text
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}
