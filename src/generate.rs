//! Artifact generation.
//!
//! Stage 3 of the pipeline. Takes the resolved [`VersionManifest`] and writes
//! the files a static host needs to serve "latest" downloads.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── versions.json     # {"demo-linux": {"latest": "demo-v1.3.0-linux.tar.gz"}}
//! ├── _redirects        # /demo-linux/latest /demo-v1.3.0-linux.tar.gz 302
//! └── index.html        # download page, rendered in the browser from versions.json
//! ```
//!
//! The manifest and redirects are rewritten on every run. The page is only
//! written when it does not exist yet, so hand edits to a deployed page are
//! never clobbered.
//!
//! ## The Download Page
//!
//! The page does not depend on the manifest. It is a fixed shell rendered with
//! [maud](https://maud.lambda.xyz/) around two static assets embedded at
//! compile time:
//!
//! - `static/page.css`: layout (accent colors injected from config)
//! - `static/page.js`: fetches the manifest and builds one section per group
//!
//! Only configuration (title, manifest file name, display-name substitutions)
//! is baked in, via a small `window.DISTPAGE` object ahead of the script.

use crate::config::{self, SiteConfig};
use crate::resolve::VersionManifest;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/page.css");
const JS: &str = include_str!("../static/page.js");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Manifest,
    Redirects,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written,
    /// Left untouched because it already existed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

/// What [`generate`] did, one entry per artifact in write order.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub artifacts: Vec<Artifact>,
}

impl GenerateReport {
    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

pub fn generate(
    manifest: &VersionManifest,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir).map_err(|source| GenerateError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut report = GenerateReport::default();

    let manifest_path = output_dir.join(&config.artifacts.manifest);
    write_file(&manifest_path, &render_manifest(manifest)?)?;
    report.artifacts.push(Artifact {
        kind: ArtifactKind::Manifest,
        path: manifest_path,
        status: ArtifactStatus::Written,
    });

    let redirects_path = output_dir.join(&config.artifacts.redirects);
    write_file(
        &redirects_path,
        &render_redirects(manifest, config.redirects.status),
    )?;
    report.artifacts.push(Artifact {
        kind: ArtifactKind::Redirects,
        path: redirects_path,
        status: ArtifactStatus::Written,
    });

    let page_path = output_dir.join(&config.artifacts.page);
    let status = if page_path.exists() {
        debug!(path = %page_path.display(), "page exists, leaving it alone");
        ArtifactStatus::Skipped
    } else {
        write_file(&page_path, &render_page(config)?.into_string())?;
        ArtifactStatus::Written
    };
    report.artifacts.push(Artifact {
        kind: ArtifactKind::Page,
        path: page_path,
        status,
    });

    Ok(report)
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    debug!(path = %path.display(), bytes = contents.len(), "writing");
    fs::write(path, contents).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed JSON, two-space indent.
pub fn render_manifest(manifest: &VersionManifest) -> Result<String, GenerateError> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

/// Newline-joined redirect rules, no trailing newline.
pub fn render_redirects(manifest: &VersionManifest, status: u16) -> String {
    manifest
        .redirect_rules(status)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings the page script reads from `window.DISTPAGE`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageScriptConfig<'a> {
    manifest: &'a str,
    display_names: Vec<(&'a str, &'a str)>,
}

fn page_script_config(config: &SiteConfig) -> Result<String, serde_json::Error> {
    let script_config = PageScriptConfig {
        manifest: &config.artifacts.manifest,
        display_names: config
            .page
            .display_names
            .iter()
            .map(|r| (r.from.as_str(), r.to.as_str()))
            .collect(),
    };
    // "</" would end the inline script early
    Ok(serde_json::to_string(&script_config)?.replace("</", "<\\/"))
}

/// Renders the download page shell.
pub fn render_page(config: &SiteConfig) -> Result<Markup, GenerateError> {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    let script_config = page_script_config(config)?;

    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.page.title) }
                style { (PreEscaped(css)) }
            }
            body {
                h1 { (config.page.title) }
                div id="download-containers" {}
                script { (PreEscaped(format!("window.DISTPAGE = {script_config};"))) }
                script { (PreEscaped(JS)) }
            }
        }
    })
}
