//! Generator configuration.
//!
//! Everything has a default, so a config file is optional. When one is given
//! with `--config`, its values are laid over the stock defaults table by table
//! and the result is validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [page]
//! title = "XPlane Downloads"
//! display_names = [
//!     { from = "XPlaneUDP-", to = "XPlaneUDP for " },
//!     { from = "xp_plugin-", to = "XP Plugin for " },
//!     { from = "-x86_64", to = " x86_64" },
//! ]
//!
//! [artifacts]
//! manifest = "versions.json"
//! redirects = "_redirects"
//! page = "index.html"
//!
//! [redirects]
//! status = 302
//!
//! [colors]
//! accent = "#4CAF50"
//! accent_hover = "#45a049"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [page]
//! title = "Nightly builds"
//! ```
//!
//! Arrays replace the default wholesale. Unknown keys are rejected to catch
//! typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Redirect status codes accepted by static hosts for `_redirects` rules.
const REDIRECT_STATUSES: &[u16] = &[301, 302, 307, 308];

/// Full generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Download page text and key labelling.
    pub page: PageConfig,
    /// Output file names.
    pub artifacts: ArtifactsConfig,
    /// Redirect rule settings.
    pub redirects: RedirectsConfig,
    /// Page accent colors.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "page.title must not be empty".into(),
            ));
        }
        if let Some(rule) = self.page.display_names.iter().find(|r| r.from.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "page.display_names entry with to = {:?} has an empty `from`",
                rule.to
            )));
        }
        if !REDIRECT_STATUSES.contains(&self.redirects.status) {
            return Err(ConfigError::Validation(format!(
                "redirects.status must be one of {REDIRECT_STATUSES:?}, got {}",
                self.redirects.status
            )));
        }

        let names = [
            ("artifacts.manifest", &self.artifacts.manifest),
            ("artifacts.redirects", &self.artifacts.redirects),
            ("artifacts.page", &self.artifacts.page),
        ];
        for (field, name) in names {
            if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be a plain file name, got {name:?}"
                )));
            }
        }
        let distinct: HashSet<&String> = names.iter().map(|(_, n)| *n).collect();
        if distinct.len() != names.len() {
            return Err(ConfigError::Validation(
                "artifacts.manifest, artifacts.redirects and artifacts.page must differ".into(),
            ));
        }
        Ok(())
    }
}

/// Download page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Document title and top heading.
    pub title: String,
    /// Substitutions applied in order to a group key to produce its section
    /// heading. Each replaces the first occurrence of `from`.
    pub display_names: Vec<DisplayName>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "XPlane Downloads".to_string(),
            display_names: vec![
                DisplayName::new("XPlaneUDP-", "XPlaneUDP for "),
                DisplayName::new("xp_plugin-", "XP Plugin for "),
                DisplayName::new("-x86_64", " x86_64"),
            ],
        }
    }
}

/// One literal substitution on a group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayName {
    pub from: String,
    pub to: String,
}

impl DisplayName {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Apply display-name substitutions to a group key.
///
/// Mirrors what the page script does in the browser, so the CLI can report
/// the same headings the page will show.
pub fn display_name(key: &str, rules: &[DisplayName]) -> String {
    rules
        .iter()
        .fold(key.to_string(), |name, rule| name.replacen(&rule.from, &rule.to, 1))
}

/// Output artifact file names, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Latest-version manifest, fetched by the page at view time.
    pub manifest: String,
    /// Redirect rules in `_redirects` format.
    pub redirects: String,
    /// Download page. Never overwritten once present.
    pub page: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            manifest: "versions.json".to_string(),
            redirects: "_redirects".to_string(),
            page: "index.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedirectsConfig {
    /// HTTP status written on every rule.
    pub status: u16,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self { status: 302 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Download button and heading rule color.
    pub accent: String,
    /// Download button hover color.
    pub accent_hover: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            accent: "#4CAF50".to_string(),
            accent_hover: "#45a049".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path`, or the stock defaults when no path is given.
///
/// An explicitly named file that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let overlay = match path {
        Some(p) => {
            let content = fs::read_to_string(p).map_err(|source| ConfigError::Io {
                path: p.to_path_buf(),
                source,
            })?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Printed by `--print-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# distpage configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Download page
# ---------------------------------------------------------------------------
[page]
# Document title and top heading.
title = "XPlane Downloads"

# Section headings are derived from group keys ("<project>-<platform>") by
# applying these substitutions in order. Each replaces the first occurrence.
display_names = [
    { from = "XPlaneUDP-", to = "XPlaneUDP for " },
    { from = "xp_plugin-", to = "XP Plugin for " },
    { from = "-x86_64", to = " x86_64" },
]

# ---------------------------------------------------------------------------
# Output file names (relative to --output-dir)
# ---------------------------------------------------------------------------
[artifacts]
# Latest-version manifest. Always rewritten.
manifest = "versions.json"

# Redirect rules, one "/<key>/latest /<file> <status>" line per group.
# Always rewritten.
redirects = "_redirects"

# Download page. Written only when missing, so manual edits survive.
page = "index.html"

# ---------------------------------------------------------------------------
# Redirects
# ---------------------------------------------------------------------------
[redirects]
# HTTP status for "latest" redirects: 301, 302, 307 or 308.
status = 302

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
accent = "#4CAF50"
accent_hover = "#45a049"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-accent: {accent};
    --color-accent-hover: {accent_hover};
}}"#,
        accent = colors.accent,
        accent_hover = colors.accent_hover,
    )
}
