//! Error types for appship with contextual messages and exit codes
//!
//! Every failure that reaches the operator goes through [`ShipError`]. Step
//! failures are wrapped with the failing step's name so the final message reads
//! `"<step>: <underlying message>"`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for appship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (external tool, git, I/O)
  System = 2,
  /// Validation failure (pre-flight checks failed)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for appship
#[derive(Debug)]
pub enum ShipError {
  /// Configuration file problems (not found, unreadable, unparsable)
  Config(ConfigError),

  /// A validation check rejected the configuration
  Validation { message: String, help: Option<String> },

  /// Git operation errors
  Vcs(VcsError),

  /// An external tool exited unsuccessfully
  Tool { command: String, stderr: String },

  /// A pipeline step failed; `source` is the step's own error
  Step { step: String, source: Box<ShipError> },

  /// A step broke the artifact read/write contract
  Contract { message: String },

  /// A changelog rule could not be compiled
  Changelog { source_list: String, pattern: String, reason: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Create a validation failure
  pub fn validation(msg: impl Into<String>) -> Self {
    ShipError::Validation {
      message: msg.into(),
      help: None,
    }
  }

  /// Create a validation failure with a suggested fix
  pub fn invalid(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Validation {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Wrap this error with the name of the step that produced it
  pub fn in_step(self, step: impl Into<String>) -> Self {
    ShipError::Step {
      step: step.into(),
      source: Box::new(self),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(err) => ShipError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Name of the failing step, if this is a step failure
  pub fn step_name(&self) -> Option<&str> {
    match self {
      ShipError::Step { step, .. } => Some(step),
      _ => None,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Validation { .. } => ExitCode::Validation,
      ShipError::Vcs(VcsError::Untagged { .. }) => ExitCode::User,
      ShipError::Vcs(_) => ExitCode::System,
      ShipError::Tool { .. } => ExitCode::System,
      ShipError::Step { source, .. } => source.exit_code(),
      ShipError::Contract { .. } => ExitCode::System,
      ShipError::Changelog { .. } => ExitCode::User,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Vcs(e) => e.help_message(),
      ShipError::Validation { help, .. } => help.clone(),
      ShipError::Step { source, .. } => source.help_message(),
      ShipError::Changelog { .. } => {
        Some("Changelog patterns use Rust regex syntax: https://docs.rs/regex/latest/regex/#syntax".to_string())
      }
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Validation { message, .. } => write!(f, "{}", message),
      ShipError::Vcs(e) => write!(f, "{}", e),
      ShipError::Tool { command, stderr } => {
        write!(f, "`{}` failed", command)?;
        let stderr = stderr.trim();
        if !stderr.is_empty() {
          write!(f, ": {}", stderr)?;
        }
        Ok(())
      }
      ShipError::Step { step, source } => write!(f, "{}: {}", step, source),
      ShipError::Contract { message } => write!(f, "pipeline contract violated: {}", message),
      ShipError::Changelog {
        source_list,
        pattern,
        reason,
      } => write!(f, "invalid changelog pattern '{}' in {}: {}", pattern, source_list, reason),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      ShipError::Step { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for ShipError {
  fn from(err: semver::Error) -> Self {
    ShipError::message(format!("Version error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// appship.toml not found
  NotFound { root: PathBuf },

  /// Explicit --config path does not exist
  Missing { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create an appship.toml in the project root (see README for a starter config).".to_string())
      }
      ConfigError::Missing { .. } => Some("Check the path passed to --config.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(
          f,
          "No appship configuration found.\nExpected file: {}/appship.toml",
          root.display()
        )
      }
      ConfigError::Missing { path } => write!(f, "Config file not found: {}", path.display()),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum VcsError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// A release needs HEAD to be tagged
  Untagged { sha: String },
}

impl VcsError {
  fn help_message(&self) -> Option<String> {
    match self {
      VcsError::RepoNotFound { path } => Some(format!(
        "Run appship from inside a git repository (looked in {})",
        path.display()
      )),
      VcsError::Untagged { .. } => {
        Some("Tag the commit (git tag v1.2.3) or use `appship snapshot` for an untagged build.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for VcsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VcsError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      VcsError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      VcsError::Untagged { sha } => write!(f, "HEAD ({}) is not tagged", sha),
    }
  }
}

/// Result type alias for appship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
