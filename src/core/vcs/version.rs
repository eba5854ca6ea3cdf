//! Version label resolution from repository state

use super::VcsInfo;
use crate::core::error::{ShipError, ShipResult, VcsError};
use semver::Version;

/// Which kind of version the invoked command needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMode {
  /// HEAD must be tagged
  Release,
  /// Always a synthetic `-SNAPSHOT-` label
  Snapshot,
  /// Tag when HEAD is tagged, snapshot label otherwise
  Build,
}

/// Resolve the version string for this run
pub fn resolve_version(mode: VersionMode, vcs: &VcsInfo) -> ShipResult<String> {
  match (mode, &vcs.tag) {
    (VersionMode::Release, Some(tag)) | (VersionMode::Build, Some(tag)) => Ok(strip_v(tag).to_string()),
    (VersionMode::Release, None) => Err(ShipError::Vcs(VcsError::Untagged {
      sha: vcs.short_commit.clone(),
    })),
    (VersionMode::Snapshot, _) | (VersionMode::Build, None) => Ok(snapshot_label(vcs)),
  }
}

/// `<next patch of latest tag>-SNAPSHOT-<short sha>`, `0.0.1` when there is no usable tag
fn snapshot_label(vcs: &VcsInfo) -> String {
  let latest = vcs.tag.as_deref().or(vcs.previous_tag.as_deref());
  let base = latest
    .and_then(|tag| Version::parse(strip_v(tag)).ok())
    .map(|v| Version::new(v.major, v.minor, v.patch + 1))
    .unwrap_or_else(|| Version::new(0, 0, 1));

  format!("{}-SNAPSHOT-{}", base, vcs.short_commit)
}

pub(crate) fn strip_v(tag: &str) -> &str {
  tag.strip_prefix('v').unwrap_or(tag)
}
