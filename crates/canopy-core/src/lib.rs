//! # Canopy Core
//!
//! Project explorer state and everything built around it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                      Workbench                        │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐  │
//! │  │  Config  │ │ EventBus │ │ Terminal │ │ Command  │  │
//! │  └──────────┘ └──────────┘ └──────────┘ └──────────┘  │
//! │        │                                              │
//! │  ┌─────┴─────────────────────────────────────┐        │
//! │  │                 Explorer                  │        │
//! │  │  FileTree · selection · expanded folders  │        │
//! │  │                    │                      │        │
//! │  │               ExportJob ──▶ Archive       │        │
//! │  └───────────────────────────────────────────┘        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The `Explorer` is an owned value: whoever needs it receives it (or a
//! reference to it) explicitly. There is no global state.

pub mod archive;
pub mod command;
pub mod config;
pub mod event;
pub mod explorer;
pub mod terminal;
pub mod workbench;

pub use archive::{Archive, ExportJob};
pub use canopy_tree as tree;
pub use canopy_tree::{DuplicatePolicy, FileTree, Node, NodeKind, TreeError};
pub use command::Command;
pub use config::Config;
pub use event::{EventBus, EventHandler, ExplorerEvent};
pub use explorer::Explorer;
pub use terminal::Terminal;
pub use workbench::{Outcome, Workbench};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl CoreError {
    /// Returns true for lookups of paths that no longer exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Tree(err) if err.is_not_found())
    }
}
