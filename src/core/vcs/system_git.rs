//! System git backend
//!
//! Uses git porcelain/plumbing commands with an isolated environment. Every
//! query runs once, before the pipeline is constructed.

use super::VcsInfo;
use crate::core::error::{ResultExt, ShipError, ShipResult, VcsError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> ShipResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ShipError::Vcs(VcsError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ShipError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Resolve everything the pipeline needs from the repository
  pub fn resolve(&self) -> ShipResult<VcsInfo> {
    let commit = self.query(&["rev-parse", "HEAD"])?;
    let short_commit = self.query(&["rev-parse", "--short=7", "HEAD"])?;
    let branch = self.current_branch()?;
    let dirty = !self.query(&["status", "--porcelain"])?.is_empty();
    let tag = self.optional(&["describe", "--tags", "--exact-match", "HEAD"]);
    let previous_tag = match &tag {
      Some(current) => self.optional(&["describe", "--tags", "--abbrev=0", &format!("{}^", current)]),
      None => self.optional(&["describe", "--tags", "--abbrev=0", "HEAD"]),
    };
    let commit_count = self
      .query(&["rev-list", "--count", "HEAD"])?
      .parse::<u64>()
      .map_err(|e| ShipError::message(format!("Unexpected commit count from git: {}", e)))?;
    let commits = self.subjects_since(previous_tag.as_deref())?;

    Ok(VcsInfo {
      commit,
      short_commit,
      branch,
      dirty,
      tag,
      previous_tag,
      commit_count,
      commits,
    })
  }

  /// Commit subjects reachable from HEAD but not from `since`, newest first
  pub fn subjects_since(&self, since: Option<&str>) -> ShipResult<Vec<String>> {
    let range = match since {
      Some(since) => format!("{}..HEAD", since),
      None => "HEAD".to_string(),
    };
    let output = self.query(&["log", "--no-merges", "--pretty=format:%s", &range])?;

    Ok(
      output
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// Get current branch name
  pub fn current_branch(&self) -> ShipResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string()); // Detached HEAD
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Run a git query and return trimmed stdout, failing on non-zero exit
  fn query(&self, args: &[&str]) -> ShipResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Vcs(VcsError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Like `query`, but a failing command (no tag, no parent) is simply `None`
  fn optional(&self, args: &[&str]) -> Option<String> {
    self.query(args).ok().filter(|s| !s.is_empty())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
