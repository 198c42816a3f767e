//! Shell history file reader
//!
//! Supports bash history (one command per line) and zsh history, both the
//! plain layout and the extended `: <start>:<elapsed>;<command>` layout.
//! Zsh writes multi-line commands with backslash-newline continuations,
//! which are joined with a space.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::config::DEFAULT_MAX_HISTORY_ENTRIES;
use crate::ports::HistorySource;
use crate::records::ShellEntry;

const ZSH_EXTENDED_LINE: &str = r"^: \d+:\d+;(.+)$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFormat {
    Bash,
    Zsh,
}

/// A history file on disk, read as a [`HistorySource`]
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
    format: HistoryFormat,
    max_entries: usize,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>, format: HistoryFormat) -> Self {
        HistoryFile {
            path: path.into(),
            format,
            max_entries: DEFAULT_MAX_HISTORY_ENTRIES,
        }
    }

    /// Cap the number of entries returned
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Pick the history file for the login shell named by `shell` (usually `$SHELL`).
    ///
    /// Returns `None` for shells other than bash and zsh.
    pub fn detect(shell: &str, home: &Path) -> Option<Self> {
        if shell.contains("zsh") {
            Some(Self::new(home.join(".zsh_history"), HistoryFormat::Zsh))
        } else if shell.contains("bash") {
            Some(Self::new(home.join(".bash_history"), HistoryFormat::Bash))
        } else {
            debug!(shell, "No history file for shell");
            None
        }
    }

    /// Detect from the `SHELL` environment variable and the user's home directory
    pub fn from_env() -> Option<Self> {
        let shell = std::env::var("SHELL").ok()?;
        let home = dirs::home_dir()?;
        Self::detect(&shell, &home)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> HistoryFormat {
        self.format
    }

    /// Parse history text into entries, newest first.
    ///
    /// Blank commands are skipped and a repeated command is kept only at its
    /// most recent position.
    pub fn parse(&self, contents: &str) -> anyhow::Result<Vec<ShellEntry>> {
        let joined;
        let text = match self.format {
            HistoryFormat::Zsh => {
                joined = contents.replace("\\\n", " ");
                joined.as_str()
            }
            HistoryFormat::Bash => contents,
        };
        let lines: Vec<&str> = text.lines().collect();

        // The first line decides whether every line carries the extended prefix
        let extended = match self.format {
            HistoryFormat::Zsh => {
                let pattern =
                    Regex::new(ZSH_EXTENDED_LINE).context("Failed to compile zsh history pattern")?;
                let is_extended = lines.first().is_some_and(|first| pattern.is_match(first));
                is_extended.then_some(pattern)
            }
            HistoryFormat::Bash => None,
        };

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for &line in lines.iter().rev() {
            if entries.len() >= self.max_entries {
                break;
            }
            let cmd = match &extended {
                Some(pattern) => match pattern.captures(line).and_then(|c| c.get(1)) {
                    Some(m) => m.as_str(),
                    None => continue,
                },
                None => line,
            };
            if cmd.trim().is_empty() || !seen.insert(cmd) {
                continue;
            }
            entries.push(ShellEntry::history(cmd));
        }
        Ok(entries)
    }
}

impl HistorySource for HistoryFile {
    #[instrument(name = "history_file_read", skip(self), fields(path = %self.path.display()))]
    fn read_history(&self) -> anyhow::Result<Vec<ShellEntry>> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;
        // zsh stores metafied bytes that are not always valid UTF-8
        let contents = String::from_utf8_lossy(&bytes);
        let entries = self.parse(&contents)?;
        info!(entries = entries.len(), format = ?self.format, "Read shell history");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(entries: &[ShellEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.cmd.as_str()).collect()
    }

    #[test]
    fn test_bash_newest_first() {
        let file = HistoryFile::new("/dev/null", HistoryFormat::Bash);
        let entries = file.parse("ls\ncd /tmp\nmake\n").unwrap();

        assert_eq!(commands(&entries), vec!["make", "cd /tmp", "ls"]);
        assert!(entries.iter().all(|e| e.is_history && !e.is_completion));
    }

    #[test]
    fn test_blank_lines_skipped_and_duplicates_keep_newest() {
        let file = HistoryFile::new("/dev/null", HistoryFormat::Bash);
        let entries = file.parse("ls\n\ngit status\n   \nls\n").unwrap();
        assert_eq!(commands(&entries), vec!["ls", "git status"]);
    }

    #[test]
    fn test_zsh_extended_format() {
        let file = HistoryFile::new("/dev/null", HistoryFormat::Zsh);
        let contents = ": 1700000000:0;echo one\n: 1700000005:2;cargo test\nstray line\n";
        let entries = file.parse(contents).unwrap();
        assert_eq!(commands(&entries), vec!["cargo test", "echo one"]);
    }

    #[test]
    fn test_zsh_plain_format() {
        let file = HistoryFile::new("/dev/null", HistoryFormat::Zsh);
        let entries = file.parse("vim notes.md\nhtop\n").unwrap();
        assert_eq!(commands(&entries), vec!["htop", "vim notes.md"]);
    }

    #[test]
    fn test_zsh_continuation_lines_joined() {
        let file = HistoryFile::new("/dev/null", HistoryFormat::Zsh);
        let contents = ": 1700000000:0;for f in *; do\\\necho $f\\\ndone\n: 1700000001:0;ls\n";
        let entries = file.parse(contents).unwrap();
        assert_eq!(
            commands(&entries),
            vec!["ls", "for f in *; do echo $f done"]
        );
    }

    #[test]
    fn test_max_entries_keeps_newest() {
        let file = HistoryFile::new("/dev/null", HistoryFormat::Bash).with_max_entries(2);
        let entries = file.parse("one\ntwo\nthree\nfour\n").unwrap();
        assert_eq!(commands(&entries), vec!["four", "three"]);
    }

    #[test]
    fn test_detect_by_shell() {
        let home = Path::new("/home/ada");

        let zsh = HistoryFile::detect("/usr/bin/zsh", home).unwrap();
        assert_eq!(zsh.path(), Path::new("/home/ada/.zsh_history"));
        assert_eq!(zsh.format(), HistoryFormat::Zsh);

        let bash = HistoryFile::detect("/bin/bash", home).unwrap();
        assert_eq!(bash.path(), Path::new("/home/ada/.bash_history"));
        assert_eq!(bash.format(), HistoryFormat::Bash);

        assert!(HistoryFile::detect("/usr/bin/fish", home).is_none());
    }

    #[test]
    fn test_read_history_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bash_history");
        fs::write(&path, "ssh host\nuptime\n").unwrap();

        let entries = HistoryFile::new(&path, HistoryFormat::Bash)
            .read_history()
            .unwrap();
        assert_eq!(commands(&entries), vec!["uptime", "ssh host"]);
    }

    #[test]
    fn test_missing_file_is_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent_history");

        let err = HistoryFile::new(&path, HistoryFormat::Zsh)
            .read_history()
            .unwrap_err();
        assert!(format!("{:#}", err).contains("absent_history"));
    }
}
