//! Simulated terminal panel.
//!
//! Nothing is executed: a handful of commands map to canned output and
//! everything else reports "Command not found".

use crate::config::TerminalConfig;

const BANNER_COMMAND: &str = "npm run dev";
const BANNER_OUTPUT: &str = "Development server started on http://localhost:3000";
const LISTING: &str = "src  public  package.json  README.md  vite.config.js";

/// One command and its output in the scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEntry {
    /// The echoed command line, including the prompt
    pub command: String,
    /// Output text (may be empty)
    pub output: String,
}

impl TerminalEntry {
    fn new(command: &str, output: impl Into<String>) -> Self {
        Self {
            command: format!("$ {command}"),
            output: output.into(),
        }
    }
}

/// Scrollback plus canned command dispatch.
#[derive(Debug, Clone)]
pub struct Terminal {
    entries: Vec<TerminalEntry>,
    cwd: String,
}

impl Terminal {
    /// Creates a terminal, optionally seeded with the dev-server banner.
    pub fn new(config: &TerminalConfig) -> Self {
        let entries = if config.banner {
            vec![TerminalEntry::new(BANNER_COMMAND, BANNER_OUTPUT)]
        } else {
            Vec::new()
        };
        Self {
            entries,
            cwd: config.cwd.clone(),
        }
    }

    /// Runs one input line.
    ///
    /// Returns the new scrollback entry, or `None` for blank input and
    /// `clear`.
    pub fn execute(&mut self, input: &str) -> Option<&TerminalEntry> {
        let command = input.trim();
        let output = match command {
            "" => return None,
            "clear" => {
                self.entries.clear();
                return None;
            }
            "ls" => LISTING.to_string(),
            "pwd" => self.cwd.clone(),
            other => format!("Command not found: {other}"),
        };
        self.entries.push(TerminalEntry::new(command, output));
        self.entries.last()
    }

    /// Returns the scrollback, oldest first.
    pub fn entries(&self) -> &[TerminalEntry] {
        &self.entries
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new(&TerminalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        let term = Terminal::default();
        assert_eq!(term.entries().len(), 1);
        assert_eq!(term.entries()[0].command, "$ npm run dev");

        let quiet = Terminal::new(&TerminalConfig {
            banner: false,
            ..TerminalConfig::default()
        });
        assert!(quiet.entries().is_empty());
    }

    #[test]
    fn test_known_commands() {
        let mut term = Terminal::default();
        assert_eq!(term.execute("pwd").unwrap().output, "/home/project");
        assert_eq!(term.execute("  ls ").unwrap().output, LISTING);
        assert_eq!(term.entries().len(), 3);
    }

    #[test]
    fn test_unknown_and_blank() {
        let mut term = Terminal::default();
        let entry = term.execute("cargo build").unwrap();
        assert_eq!(entry.command, "$ cargo build");
        assert_eq!(entry.output, "Command not found: cargo build");

        assert!(term.execute("   ").is_none());
        assert_eq!(term.entries().len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut term = Terminal::default();
        term.execute("ls");
        assert!(term.execute("clear").is_none());
        assert!(term.entries().is_empty());
    }
}
