//! `${VAR}` placeholder handling for configuration values
//!
//! Substitution happens once at load time. Placeholders whose variable is unset
//! are left untouched so the `env` validation check can report them by path.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid"));

/// Replace every `${VAR}` whose variable `lookup` resolves.
pub fn substitute<F>(input: &str, lookup: F) -> String
where
  F: Fn(&str) -> Option<String>,
{
  PLACEHOLDER
    .replace_all(input, |caps: &Captures<'_>| {
      lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Names of placeholders still present in `input`
pub fn unresolved(input: &str) -> Vec<String> {
  PLACEHOLDER
    .captures_iter(input)
    .map(|caps| caps[1].to_string())
    .collect()
}
