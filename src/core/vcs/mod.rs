pub mod system_git;
mod version;

pub use system_git::SystemGit;
pub use version::{VersionMode, resolve_version};

use serde::Serialize;

/// Repository facts resolved once before the pipeline starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VcsInfo {
  pub commit: String,
  pub short_commit: String,
  pub branch: String,
  /// Uncommitted changes in the work tree
  pub dirty: bool,
  /// Tag pointing exactly at HEAD
  pub tag: Option<String>,
  /// Most recent tag reachable from HEAD, excluding `tag`
  pub previous_tag: Option<String>,
  pub commit_count: u64,
  /// Commit subjects in `previous_tag..HEAD`, newest first
  #[serde(skip)]
  pub commits: Vec<String>,
}
