//! The full scan → resolve → generate run.
//!
//! Every stage consumes the previous stage's complete output; the first error
//! ends the run. Nothing is written until resolution has succeeded for every
//! group, so a bad version never leaves a half-updated manifest behind.

use crate::config::{self, ConfigError, SiteConfig};
use crate::generate::{self, GenerateError, GenerateReport};
use crate::output;
use crate::resolve::{self, Resolution, ResolveError};
use crate::scan::{self, ScanError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the release archives.
    pub scan_dir: PathBuf,
    /// Destination for the generated artifacts.
    pub output_dir: PathBuf,
    /// Optional TOML config laid over the stock defaults.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum BuildOutcome {
    /// No archive matched the naming convention; nothing was written.
    NothingToDo,
    Generated {
        resolution: Resolution,
        report: GenerateReport,
    },
}

/// Run the pipeline, handing each progress line to `progress`.
pub fn build(
    options: &BuildOptions,
    progress: &mut dyn FnMut(String),
) -> Result<BuildOutcome, BuildError> {
    let config = config::load_config(options.config_path.as_deref())?;
    build_with_config(options, &config, progress)
}

pub fn build_with_config(
    options: &BuildOptions,
    config: &SiteConfig,
    progress: &mut dyn FnMut(String),
) -> Result<BuildOutcome, BuildError> {
    progress(output::format_scan_header(&options.scan_dir));
    let scanned = scan::scan(&options.scan_dir)?;
    for line in output::format_scan_output(&scanned) {
        progress(line);
    }

    if scanned.is_empty() {
        info!(dir = %options.scan_dir.display(), "no archives found");
        progress(output::format_nothing_to_do());
        return Ok(BuildOutcome::NothingToDo);
    }

    let resolution = resolve::resolve(&scanned)?;
    for line in output::format_resolve_output(&resolution, &config.page.display_names) {
        progress(line);
    }

    let report = generate::generate(&resolution.manifest, &options.output_dir, config)?;
    for line in output::format_generate_output(&report) {
        progress(line);
    }
    info!(
        groups = resolution.manifest.len(),
        output = %options.output_dir.display(),
        "build complete"
    );

    Ok(BuildOutcome::Generated { resolution, report })
}
