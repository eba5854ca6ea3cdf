use crate::core::env;
use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Configuration for appship
/// Searched in order: appship.toml, .appship.toml, .config/appship.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
  /// Product name used for bundle, package and cask names
  #[serde(default)]
  pub project_name: String,
  /// Output directory, relative to the project root
  #[serde(default = "default_dist")]
  pub dist: PathBuf,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub sign: Option<SignConfig>,
  #[serde(default)]
  pub notarize: Option<NotarizeConfig>,
  #[serde(default)]
  pub package: PackageConfig,
  #[serde(default)]
  pub changelog: ChangelogConfig,
  #[serde(default)]
  pub release: Option<ReleaseConfig>,
  #[serde(default)]
  pub cask: Option<CaskConfig>,
}

fn default_dist() -> PathBuf {
  PathBuf::from("dist")
}

/// How to drive xcodebuild
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Path to an .xcodeproj (mutually exclusive with `workspace`)
  #[serde(default)]
  pub project: Option<PathBuf>,
  /// Path to an .xcworkspace
  #[serde(default)]
  pub workspace: Option<PathBuf>,
  #[serde(default)]
  pub scheme: String,
  #[serde(default = "default_configuration")]
  pub configuration: String,
  /// Bundle name without `.app` (defaults to `project_name`)
  #[serde(default)]
  pub app_name: Option<String>,
  /// Extra arguments appended to the xcodebuild invocation
  #[serde(default)]
  pub extra_args: Vec<String>,
}

fn default_configuration() -> String {
  "Release".to_string()
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      project: None,
      workspace: None,
      scheme: String::new(),
      configuration: default_configuration(),
      app_name: None,
      extra_args: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignConfig {
  /// Keychain identity, e.g. "Developer ID Application: Example Inc (ABCDE12345)"
  pub identity: String,
  #[serde(default)]
  pub entitlements: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotarizeConfig {
  #[serde(default)]
  pub apple_id: String,
  #[serde(default)]
  pub team_id: String,
  /// App-specific password
  #[serde(default)]
  pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
  /// Any of "zip", "dmg"
  #[serde(default = "default_formats")]
  pub formats: Vec<String>,
  /// Placeholders: {name}, {version}, {short_commit}, {date}
  #[serde(default = "default_name_template")]
  pub name_template: String,
}

fn default_formats() -> Vec<String> {
  vec!["zip".to_string()]
}

fn default_name_template() -> String {
  "{name}-{version}".to_string()
}

impl Default for PackageConfig {
  fn default() -> Self {
    Self {
      formats: default_formats(),
      name_template: default_name_template(),
    }
  }
}

/// Package formats the archive steps know how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
  Zip,
  Dmg,
}

impl PackageFormat {
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "zip" => Some(Self::Zip),
      "dmg" => Some(Self::Dmg),
      _ => None,
    }
  }

  pub fn extension(self) -> &'static str {
    match self {
      Self::Zip => "zip",
      Self::Dmg => "dmg",
    }
  }
}

/// Values substituted into `package.name_template`
#[derive(Debug, Clone, Copy)]
pub struct NameVars<'a> {
  pub name: &'a str,
  pub version: &'a str,
  pub short_commit: &'a str,
  pub date: &'a str,
}

static NAME_PLACEHOLDER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("name placeholder pattern is valid"));

impl PackageConfig {
  /// Whether `format` is listed (unknown entries are ignored here and rejected by validation)
  pub fn wants(&self, format: PackageFormat) -> bool {
    self.formats.iter().any(|f| PackageFormat::parse(f) == Some(format))
  }

  /// Render the package file stem (no extension)
  pub fn render_name(&self, vars: &NameVars<'_>) -> ShipResult<String> {
    let lookup = |key: &str| match key {
      "name" => Some(vars.name),
      "version" => Some(vars.version),
      "short_commit" => Some(vars.short_commit),
      "date" => Some(vars.date),
      _ => None,
    };

    if let Some(caps) = NAME_PLACEHOLDER.captures_iter(&self.name_template).find(|c| lookup(&c[1]).is_none()) {
      return Err(ShipError::invalid(
        format!("unknown placeholder {} in package.name_template", &caps[0]),
        "Available placeholders: {name}, {version}, {short_commit}, {date}",
      ));
    }

    let rendered = NAME_PLACEHOLDER
      .replace_all(&self.name_template, |caps: &Captures<'_>| lookup(&caps[1]).unwrap_or_default().to_string())
      .into_owned();

    if rendered.trim().is_empty() || rendered.contains('/') {
      return Err(ShipError::invalid(
        format!("package.name_template renders to an unusable file name '{}'", rendered),
        "The rendered name must be non-empty and must not contain '/'",
      ));
    }
    Ok(rendered)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChangelogConfig {
  #[serde(default)]
  pub disable: bool,
  /// "asc", "desc" or empty (desc)
  #[serde(default)]
  pub sort: String,
  #[serde(default)]
  pub filters: ChangelogFilters,
  #[serde(default)]
  pub groups: Vec<ChangelogGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChangelogFilters {
  #[serde(default)]
  pub include: Vec<String>,
  #[serde(default)]
  pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogGroup {
  pub title: String,
  /// Empty pattern makes this a catch-all group
  #[serde(default)]
  pub regexp: String,
  #[serde(default)]
  pub order: i64,
}

/// GitHub release settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub owner: String,
  #[serde(default)]
  pub name: String,
  /// Falls back to $GITHUB_TOKEN when unset
  #[serde(default)]
  pub token: Option<String>,
  #[serde(default)]
  pub draft: bool,
  /// Unset means "prerelease when the version has a pre-release component"
  #[serde(default)]
  pub prerelease: Option<bool>,
}

impl ReleaseConfig {
  pub fn repository(&self) -> String {
    format!("{}/{}", self.owner, self.name)
  }

  pub fn resolved_token(&self) -> Option<String> {
    self
      .token
      .clone()
      .or_else(|| std::env::var("GITHUB_TOKEN").ok())
      .filter(|t| !t.trim().is_empty())
  }

  /// Public download URL for a file attached to the release for `tag`
  pub fn download_url(&self, tag: &str, file_name: &str) -> String {
    format!(
      "https://github.com/{}/{}/releases/download/{}/{}",
      self.owner, self.name, tag, file_name
    )
  }
}

/// Homebrew cask settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaskConfig {
  /// Cask token, e.g. "example-app"
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub homepage: String,
  #[serde(default)]
  pub tap: Option<TapConfig>,
}

/// Local checkout of a Homebrew tap repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
  pub path: PathBuf,
  #[serde(default = "default_tap_directory")]
  pub directory: String,
  #[serde(default = "default_true")]
  pub push: bool,
}

fn default_tap_directory() -> String {
  "Casks".to_string()
}

fn default_true() -> bool {
  true
}

impl ShipConfig {
  /// Find config file in search order: appship.toml, .appship.toml, .config/appship.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("appship.toml"),
      path.join(".appship.toml"),
      path.join(".config").join("appship.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, either from `explicit` or by searching `root`.
  ///
  /// Returns the parsed config and the file it came from.
  pub fn load(root: &Path, explicit: Option<&Path>) -> ShipResult<(Self, PathBuf)> {
    let config_path = match explicit {
      Some(path) if path.exists() => path.to_path_buf(),
      Some(path) => {
        return Err(ShipError::Config(ConfigError::Missing {
          path: path.to_path_buf(),
        }));
      }
      None => Self::find_config_path(root).ok_or_else(|| {
        ShipError::Config(ConfigError::NotFound {
          root: root.to_path_buf(),
        })
      })?,
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse_with(&content, |name| std::env::var(name).ok())
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok((config, config_path))
  }

  /// Parse TOML, substituting `${VAR}` in every string value through `lookup`
  pub fn parse_with<F>(content: &str, lookup: F) -> ShipResult<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut doc: toml_edit::DocumentMut = content.parse()?;
    substitute_item(doc.as_item_mut(), &lookup);
    let config: ShipConfig = toml_edit::de::from_str(&doc.to_string())?;
    Ok(config)
  }

  /// Bundle name without the `.app` suffix
  pub fn app_name(&self) -> &str {
    self.build.app_name.as_deref().unwrap_or(&self.project_name)
  }
}

fn substitute_item<F>(item: &mut toml_edit::Item, lookup: &F)
where
  F: Fn(&str) -> Option<String>,
{
  match item {
    toml_edit::Item::Value(value) => substitute_value(value, lookup),
    toml_edit::Item::Table(table) => {
      for (_, child) in table.iter_mut() {
        substitute_item(child, lookup);
      }
    }
    toml_edit::Item::ArrayOfTables(tables) => {
      for table in tables.iter_mut() {
        for (_, child) in table.iter_mut() {
          substitute_item(child, lookup);
        }
      }
    }
    toml_edit::Item::None => {}
  }
}

fn substitute_value<F>(value: &mut toml_edit::Value, lookup: &F)
where
  F: Fn(&str) -> Option<String>,
{
  match value {
    toml_edit::Value::String(s) => {
      let replaced = env::substitute(s.value(), lookup);
      if replaced != *s.value() {
        *value = toml_edit::Value::from(replaced);
      }
    }
    toml_edit::Value::Array(array) => {
      for v in array.iter_mut() {
        substitute_value(v, lookup);
      }
    }
    toml_edit::Value::InlineTable(table) => {
      for (_, v) in table.iter_mut() {
        substitute_value(v, lookup);
      }
    }
    _ => {}
  }
}
