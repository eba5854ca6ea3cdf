//! Release notes from commit subjects
//!
//! Pure transformation: filter, order, then optionally group commit subjects.
//! No git access happens here; callers pass the subjects (newest first) that the
//! VCS resolver already collected.
//!
//! ```text
//! ## 1.2.0
//!
//! ### Features
//!
//! - feat: export to PDF
//!
//! ### Other
//!
//! - chore: bump deps
//! ```

use crate::core::config::{ChangelogConfig, ChangelogGroup};
use crate::core::error::{ShipError, ShipResult};
use regex::Regex;

/// Commit ordering in the rendered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
  /// Newest first (input order)
  Desc,
  /// Oldest first
  Asc,
}

impl SortOrder {
  /// `""` and `"desc"` keep input order; `"asc"` reverses
  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "" | "desc" => Some(Self::Desc),
      "asc" => Some(Self::Asc),
      _ => None,
    }
  }
}

struct Group {
  title: String,
  pattern: Option<Regex>,
}

/// Changelog rules with every pattern compiled
pub struct Rules {
  sort: SortOrder,
  include: Vec<Regex>,
  exclude: Vec<Regex>,
  /// Stable-sorted by `order`
  groups: Vec<Group>,
}

impl Rules {
  /// Compile every include, exclude and group pattern.
  ///
  /// The first bad pattern is reported with the list and index it came from.
  pub fn compile(config: &ChangelogConfig) -> ShipResult<Self> {
    let sort = SortOrder::parse(&config.sort).ok_or_else(|| {
      ShipError::invalid(
        format!("unknown changelog sort '{}'", config.sort),
        "changelog.sort must be \"asc\", \"desc\" or empty",
      )
    })?;

    let include = compile_list("include", &config.filters.include)?;
    let exclude = compile_list("exclude", &config.filters.exclude)?;

    let mut ordered: Vec<(usize, &ChangelogGroup)> = config.groups.iter().enumerate().collect();
    ordered.sort_by_key(|(_, group)| group.order);

    let mut groups = Vec::with_capacity(ordered.len());
    for (index, group) in ordered {
      let pattern = if group.regexp.is_empty() {
        None
      } else {
        Some(compile(&format!("groups[{}]", index), &group.regexp)?)
      };
      groups.push(Group {
        title: group.title.clone(),
        pattern,
      });
    }

    Ok(Self {
      sort,
      include,
      exclude,
      groups,
    })
  }

  /// Whether some group accepts commits no other group matched
  pub fn has_catch_all(&self) -> bool {
    self.groups.iter().any(|g| g.pattern.is_none())
  }

  fn keeps(&self, subject: &str) -> bool {
    if !self.include.is_empty() && !self.include.iter().any(|re| re.is_match(subject)) {
      return false;
    }
    !self.exclude.iter().any(|re| re.is_match(subject))
  }

  /// Index of the group `subject` lands in, if any
  fn assign(&self, subject: &str) -> Option<usize> {
    self
      .groups
      .iter()
      .position(|g| g.pattern.as_ref().is_some_and(|re| re.is_match(subject)))
      .or_else(|| self.groups.iter().position(|g| g.pattern.is_none()))
  }

  /// Render release notes for `version` from `commits` (newest first)
  pub fn render(&self, version: &str, commits: &[String]) -> String {
    let mut kept: Vec<&str> = commits.iter().map(String::as_str).filter(|c| self.keeps(c)).collect();
    if self.sort == SortOrder::Asc {
      kept.reverse();
    }

    let mut out = format!("## {}\n\n", version);

    if self.groups.is_empty() {
      for commit in kept {
        out.push_str(&format!("- {}\n", commit));
      }
      return out;
    }

    let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); self.groups.len()];
    for commit in kept {
      if let Some(index) = self.assign(commit) {
        buckets[index].push(commit);
      }
    }

    let sections: Vec<String> = self
      .groups
      .iter()
      .zip(&buckets)
      .filter(|(_, bucket)| !bucket.is_empty())
      .map(|(group, bucket)| {
        let mut section = format!("### {}\n\n", group.title);
        for commit in bucket {
          section.push_str(&format!("- {}\n", commit));
        }
        section
      })
      .collect();

    out.push_str(&sections.join("\n"));
    out
  }
}

fn compile_list(list: &str, patterns: &[String]) -> ShipResult<Vec<Regex>> {
  patterns
    .iter()
    .enumerate()
    .map(|(i, pattern)| compile(&format!("{}[{}]", list, i), pattern))
    .collect()
}

fn compile(source_list: &str, pattern: &str) -> ShipResult<Regex> {
  Regex::new(pattern).map_err(|e| ShipError::Changelog {
    source_list: source_list.to_string(),
    pattern: pattern.to_string(),
    reason: e.to_string(),
  })
}

/// Compile `config` and render the notes for `version` in one go
pub fn generate(version: &str, commits: &[String], config: &ChangelogConfig) -> ShipResult<String> {
  Ok(Rules::compile(config)?.render(version, commits))
}
