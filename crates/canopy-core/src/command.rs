//! Textual commands driving the workbench.
//!
//! ## Learning: The Command Pattern
//!
//! Each user action is parsed into a `Command` value first and executed
//! later by [`Workbench::execute`](crate::Workbench::execute). Scripts, the
//! interactive prompt and tests all go through the same enum.

use canopy_tree::path as vpath;

use crate::{CoreError, CoreResult};

/// Built-in workbench commands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `touch <path>`
    NewFile { parent: Option<String>, name: String },
    /// `mkdir <path>`
    NewFolder { parent: Option<String>, name: String },
    /// `write <path> <content>`
    Write { path: String, content: String },
    /// `cat <path>`
    Show { path: String },
    /// `stat <path>`
    Stat { path: String },
    /// `rm <path>`
    Delete { path: String },
    /// `mv <path> <new name>`
    Rename { path: String, name: String },
    /// `toggle <path>`
    Toggle { path: String },
    /// `open <path>`
    Open { path: String },
    /// `export`
    Export,
    /// `tree [--json]`
    Tree { json: bool },
    /// `term <line>`
    Terminal { line: String },
    /// `help`
    Help,
}

/// One-line usage for every verb, shown by `help`.
pub const USAGE: &[(&str, &str)] = &[
    ("touch <path>", "create an empty file and open it"),
    ("mkdir <path>", "create a folder and expand it"),
    ("write <path> <text>", "replace a file's content (\\n, \\t escapes)"),
    ("cat <path>", "print a file's content"),
    ("stat <path>", "show kind, language and icon of a node"),
    ("rm <path>", "delete a file or folder"),
    ("mv <path> <name>", "rename a file or folder"),
    ("toggle <path>", "expand or collapse a folder"),
    ("open <path>", "open a file in the editor"),
    ("export", "write the project archive"),
    ("tree [--json]", "show the explorer"),
    ("term <line>", "run a line in the terminal panel"),
    ("help", "show this list"),
];

impl Command {
    /// Parses a single input line.
    pub fn parse(line: &str) -> CoreResult<Self> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let cmd = match verb {
            "touch" => {
                let (parent, name) = split_path(whole_path(rest, "touch <path>")?);
                Command::NewFile { parent, name }
            }
            "mkdir" => {
                let (parent, name) = split_path(whole_path(rest, "mkdir <path>")?);
                Command::NewFolder { parent, name }
            }
            "write" => {
                let (path, content) = leading_path(rest, "write <path> <text>")?;
                Command::Write {
                    path: normalize(path),
                    content: unescape(content),
                }
            }
            "cat" => Command::Show {
                path: normalize(whole_path(rest, "cat <path>")?),
            },
            "stat" => Command::Stat {
                path: normalize(whole_path(rest, "stat <path>")?),
            },
            "rm" => Command::Delete {
                path: normalize(whole_path(rest, "rm <path>")?),
            },
            "mv" => {
                let usage = "mv <path> <name>";
                let (path, name) = leading_path(rest, usage)?;
                Command::Rename {
                    path: normalize(path),
                    name: whole_path(name, usage)?.to_string(),
                }
            }
            "toggle" => Command::Toggle {
                path: normalize(whole_path(rest, "toggle <path>")?),
            },
            "open" => Command::Open {
                path: normalize(whole_path(rest, "open <path>")?),
            },
            "export" => Command::Export,
            "tree" => match rest {
                "" => Command::Tree { json: false },
                "--json" => Command::Tree { json: true },
                _ => return Err(CoreError::InvalidCommand("usage: tree [--json]".into())),
            },
            "term" => Command::Terminal {
                line: rest.to_string(),
            },
            "help" => Command::Help,
            other => return Err(CoreError::UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::NewFile { .. } => "New File",
            Command::NewFolder { .. } => "New Folder",
            Command::Write { .. } => "Write File",
            Command::Show { .. } => "Show File",
            Command::Stat { .. } => "File Info",
            Command::Delete { .. } => "Delete",
            Command::Rename { .. } => "Rename",
            Command::Toggle { .. } => "Toggle Folder",
            Command::Open { .. } => "Open File",
            Command::Export => "Download Project",
            Command::Tree { .. } => "Show Explorer",
            Command::Terminal { .. } => "Terminal",
            Command::Help => "Help",
        }
    }
}

fn usage_error(usage: &str) -> CoreError {
    CoreError::InvalidCommand(format!("usage: {usage}"))
}

fn required<'a>(rest: &'a str, usage: &str) -> CoreResult<&'a str> {
    if rest.is_empty() {
        Err(usage_error(usage))
    } else {
        Ok(rest)
    }
}

/// Splits the leading path argument off `rest`.
///
/// Paths containing spaces must be double-quoted: `"my notes.txt" text`.
fn leading_path<'a>(rest: &'a str, usage: &str) -> CoreResult<(&'a str, &'a str)> {
    let rest = required(rest, usage)?;
    let Some(quoted) = rest.strip_prefix('"') else {
        return Ok(rest.split_once(char::is_whitespace).unwrap_or((rest, "")));
    };
    match quoted.split_once('"') {
        Some((path, tail)) if !path.is_empty() => {
            Ok((path, tail.strip_prefix(char::is_whitespace).unwrap_or(tail)))
        }
        _ => Err(usage_error(usage)),
    }
}

/// Reads all of `rest` as a single path, bare or double-quoted.
fn whole_path<'a>(rest: &'a str, usage: &str) -> CoreResult<&'a str> {
    let rest = required(rest.trim(), usage)?;
    if !rest.starts_with('"') {
        return Ok(rest);
    }
    match leading_path(rest, usage)? {
        (path, "") => Ok(path),
        _ => Err(usage_error(usage)),
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches(vpath::SEPARATOR).to_string()
}

/// Splits `a/b/c.txt` into (`Some("a/b")`, `"c.txt"`).
fn split_path(path: &str) -> (Option<String>, String) {
    let path = normalize(path);
    let parent = vpath::parent(&path).map(str::to_string);
    let name = vpath::file_name(&path).to_string();
    (parent, name)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        assert_eq!(
            Command::parse("touch src/app/main.js").unwrap(),
            Command::NewFile {
                parent: Some("src/app".into()),
                name: "main.js".into()
            }
        );
        assert_eq!(
            Command::parse("mkdir /docs/").unwrap(),
            Command::NewFolder {
                parent: None,
                name: "docs".into()
            }
        );
    }

    #[test]
    fn test_parse_write() {
        assert_eq!(
            Command::parse(r"write a.txt line one\nline\ttwo").unwrap(),
            Command::Write {
                path: "a.txt".into(),
                content: "line one\nline\ttwo".into()
            }
        );
        assert_eq!(
            Command::parse("write a.txt").unwrap(),
            Command::Write {
                path: "a.txt".into(),
                content: String::new()
            }
        );
    }

    #[test]
    fn test_parse_quoted_paths() {
        assert_eq!(
            Command::parse(r#"write "docs/my notes.txt" hello  world"#).unwrap(),
            Command::Write {
                path: "docs/my notes.txt".into(),
                content: "hello  world".into()
            }
        );
        assert_eq!(
            Command::parse(r#"cat "my notes.txt""#).unwrap(),
            Command::Show {
                path: "my notes.txt".into()
            }
        );
        assert_eq!(
            Command::parse("touch my notes.txt").unwrap(),
            Command::NewFile {
                parent: None,
                name: "my notes.txt".into()
            }
        );
        assert_eq!(
            Command::parse(r#"mv "my notes.txt" "old notes.txt""#).unwrap(),
            Command::Rename {
                path: "my notes.txt".into(),
                name: "old notes.txt".into()
            }
        );
        assert!(matches!(
            Command::parse(r#"cat "my notes.txt"#),
            Err(CoreError::InvalidCommand(_))
        ));
        assert!(matches!(
            Command::parse(r#"write "" text"#),
            Err(CoreError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_rename() {
        assert_eq!(
            Command::parse("mv src lib").unwrap(),
            Command::Rename {
                path: "src".into(),
                name: "lib".into()
            }
        );
        assert!(matches!(
            Command::parse("mv src"),
            Err(CoreError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(Command::parse("export").unwrap(), Command::Export);
        assert_eq!(Command::parse("tree --json").unwrap(), Command::Tree { json: true });
        assert_eq!(
            Command::parse("term ls -la").unwrap(),
            Command::Terminal {
                line: "ls -la".into()
            }
        );
        assert!(matches!(Command::parse("rm"), Err(CoreError::InvalidCommand(_))));
        assert!(matches!(
            Command::parse("frobnicate x"),
            Err(CoreError::UnknownCommand(verb)) if verb == "frobnicate"
        ));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Command::Export.display_name(), "Download Project");
        assert_eq!(Command::Help.display_name(), "Help");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\\n"), r"a\n");
        assert_eq!(unescape(r"trailing\"), r"trailing\");
        assert_eq!(unescape(r"\x"), r"\x");
    }
}
