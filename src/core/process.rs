//! External tool invocation
//!
//! Every adapter step talks to the outside world (xcodebuild, codesign,
//! notarytool, hdiutil, gh, git) through [`CommandRunner`], so the pipeline can
//! be exercised with a recording runner in tests.

use crate::core::error::{ResultExt, ShipError, ShipResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A single external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<String>,
  pub env: Vec<(String, String)>,
  pub cwd: Option<PathBuf>,
  /// Indexes into `args` that are rendered as `***`
  redacted: Vec<usize>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      env: Vec::new(),
      cwd: None,
      redacted: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Argument that must never appear in logs or error messages
  pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
    self.redacted.push(self.args.len());
    self.args.push(arg.into());
    self
  }

  pub fn path_arg(self, path: &Path) -> Self {
    self.arg(path.to_string_lossy())
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  pub fn current_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }
}

/// Shown in logs and errors; environment values and secret args are never printed.
impl fmt::Display for ToolCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for (i, arg) in self.args.iter().enumerate() {
      if self.redacted.contains(&i) {
        write!(f, " ***")?;
      } else if arg.contains(' ') {
        write!(f, " \"{}\"", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Runs external commands on behalf of pipeline steps
pub trait CommandRunner {
  /// Run to completion and return stdout; non-zero exit is an error
  fn run(&self, command: &ToolCommand) -> ShipResult<String>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, command: &ToolCommand) -> ShipResult<String> {
    tracing::debug!(command = %command, "running");

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    for (key, value) in &command.env {
      cmd.env(key, value);
    }
    if let Some(dir) = &command.cwd {
      cmd.current_dir(dir);
    }

    let output = cmd
      .output()
      .with_context(|| format!("Failed to run {}", command.program))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stderr = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).to_string()
      } else {
        stderr.to_string()
      };
      return Err(ShipError::Tool {
        command: command.to_string(),
        stderr,
      });
    }

    Ok(String::from_utf8(output.stdout)?)
  }
}
