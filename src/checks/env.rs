//! Unresolved `${VAR}` placeholders

use super::signing::notarization_enabled;
use crate::core::context::RunState;
use crate::core::env;
use crate::core::error::ShipError;
use crate::pipeline::{Step, StepOutcome, StepResult};
use serde_json::Value;

pub struct EnvCheck;

impl Step for EnvCheck {
  fn name(&self) -> &str {
    "env"
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let mut config = serde_json::to_value(state.config())?;
    // Sections this run never reads may keep their placeholders
    if let Value::Object(sections) = &mut config {
      if !notarization_enabled(state) {
        sections.remove("notarize");
      }
      if state.toggles().skip_publish
        && let Some(Value::Object(release)) = sections.get_mut("release")
      {
        release.remove("token");
      }
    }

    let mut missing = Vec::new();
    collect_unresolved(&config, String::new(), &mut missing);

    if missing.is_empty() {
      return Ok(StepOutcome::Done);
    }

    let listed: Vec<String> = missing
      .iter()
      .map(|(path, var)| format!("{} (${{{}}})", path, var))
      .collect();
    let mut vars: Vec<&str> = missing.iter().map(|(_, var)| var.as_str()).collect();
    vars.sort_unstable();
    vars.dedup();

    Err(ShipError::invalid(
      format!("unresolved environment variables in {}", listed.join(", ")),
      format!("Export {} before running appship", vars.join(", ")),
    ))
  }
}

/// Walk the serialized config, recording `(dotted.path, VAR)` for every placeholder left
fn collect_unresolved(value: &Value, path: String, out: &mut Vec<(String, String)>) {
  match value {
    Value::String(s) => out.extend(env::unresolved(s).into_iter().map(|var| (path.clone(), var))),
    Value::Array(items) => {
      for (i, item) in items.iter().enumerate() {
        collect_unresolved(item, format!("{}[{}]", path, i), out);
      }
    }
    Value::Object(map) => {
      for (key, child) in map {
        let child_path = if path.is_empty() {
          key.clone()
        } else {
          format!("{}.{}", path, key)
        };
        collect_unresolved(child, child_path, out);
      }
    }
    _ => {}
  }
}
