//! Revision access for the approved-packages repository

use chrono::{DateTime, NaiveDate};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::models::Revision;

/// Source of historical revisions of a tracked file.
pub trait RevisionSource {
    /// Revisions that touched `path`, oldest first.
    fn revisions(&self, path: &str) -> Result<Vec<Revision>>;

    /// Full content of `path` as it existed at `revision`.
    fn content_at(&self, revision: &Revision, path: &str) -> Result<String>;
}

/// [`RevisionSource`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    git: PathBuf,
    root: PathBuf,
}

impl GitCli {
    /// Locate `git` on `PATH` and bind it to the repository at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let git = which::which("git")?;
        Ok(Self::with_executable(git, root))
    }

    /// Use an explicit git executable
    pub fn with_executable(git: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            git: git.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `git` bound to the repository, ignoring user config that changes log output
    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.git);
        command
            .args(["-c", "log.showSignature=false", "-C"])
            .arg(&self.root)
            .args(args);
        command
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.command(args).output()?;

        if !output.status.success() {
            return Err(Error::GitFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl RevisionSource for GitCli {
    fn revisions(&self, path: &str) -> Result<Vec<Revision>> {
        let path = tracked_path(path);
        let stdout = self.run(&["log", "--reverse", "--format=%H%x09%aI", "--", &path])?;
        let text = String::from_utf8(stdout).map_err(|_| Error::NotUtf8("git log".to_string()))?;
        parse_log(&text)
    }

    fn content_at(&self, revision: &Revision, path: &str) -> Result<String> {
        let object = format!("{}:{}", revision.id, tracked_path(path));
        let stdout = self.run(&["show", &object])?;
        String::from_utf8(stdout).map_err(|_| Error::NotUtf8(object))
    }
}

/// Path inside the repository in git's notation
fn tracked_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}

/// Parse `git log --format=%H%x09%aI` output.
pub fn parse_log(text: &str) -> Result<Vec<Revision>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_log_line)
        .collect()
}

fn parse_log_line(line: &str) -> Result<Revision> {
    let (id, date) = line
        .split_once('\t')
        .ok_or_else(|| Error::MalformedLog(line.to_string()))?;
    Ok(Revision::new(id.trim(), parse_date(date.trim())?))
}

/// Parse a strict ISO 8601 commit date, keeping the author's local day
fn parse_date(value: &str) -> Result<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|source| Error::InvalidDate {
            value: value.to_string(),
            source,
        })
}
