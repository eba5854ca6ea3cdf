//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Minimal appship config that passes validation anywhere (nothing to sign or publish)
pub const MINIMAL_CONFIG: &str = r#"project_name = "Example"

[build]
project = "Example.xcodeproj"
scheme = "Example"
"#;

/// A git repository laid out like a small Xcode project
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project with `config` as appship.toml and one initial commit
  pub fn new(config: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;

    std::fs::create_dir_all(path.join("Example.xcodeproj"))?;
    std::fs::write(path.join("Example.xcodeproj/project.pbxproj"), "// !$*UTF8*$!\n")?;
    std::fs::write(path.join("appship.toml"), config)?;
    std::fs::write(path.join(".gitignore"), "dist/\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;

    Ok(Self { _root: root, path })
  }

  /// Commit a change to a scratch file with the given subject
  pub fn commit(&self, message: &str) -> Result<()> {
    let log = self.path.join("CHANGES");
    let mut content = std::fs::read_to_string(&log).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&log, content)?;

    git(&self.path, &["add", "CHANGES"])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  /// Replace appship.toml (uncommitted; config is read from disk)
  pub fn write_config(&self, config: &str) -> Result<()> {
    std::fs::write(self.path.join("appship.toml"), config)?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }
}

/// Run a git command
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run appship and return its output whatever the exit status
pub fn appship(cwd: &Path, args: &[&str]) -> Result<Output> {
  let appship_bin = env!("CARGO_BIN_EXE_appship");

  Command::new(appship_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .env_remove("GITHUB_TOKEN")
    .output()
    .context("Failed to run appship")
}

/// Run appship and fail the test unless it succeeds
pub fn appship_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = appship(cwd, args)?;

  if !output.status.success() {
    anyhow::bail!(
      "appship command failed: appship {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
