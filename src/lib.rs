//! # distpage
//!
//! Build-time generator for software download pages. Point it at a directory
//! of release archives and it writes what a static host needs to always serve
//! the newest build.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      releases/   →  ScanResult        (archive names grouped by project + platform)
//! 2. Resolve   ScanResult  →  VersionManifest   (highest version per group)
//! 3. Generate  manifest    →  out/              (versions.json, _redirects, index.html)
//! ```
//!
//! Stages run once, in order, and the first error ends the run. Skipping a
//! badly named archive is the only non-fatal problem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `<project>-v<version>-<platform>.tar.gz` filename parser |
//! | [`version`] | Three-part numeric versions with component-wise ordering |
//! | [`scan`] | Stage 1 — lists the release directory and groups archives |
//! | [`resolve`] | Stage 2 — picks the latest archive per group, builds the manifest |
//! | [`generate`] | Stage 3 — writes the manifest, redirect rules and download page |
//! | [`pipeline`] | Runs the three stages and reports progress |
//! | [`config`] | Optional TOML config: page title, display names, file names |
//! | [`output`] | CLI output formatting for every stage |
//!
//! # Design Decisions
//!
//! ## The Page Renders Itself
//!
//! The download page is not derived from the manifest. It is a fixed shell
//! whose script fetches `versions.json` in the browser and builds one section
//! per group. A new release therefore only changes the manifest and the
//! redirect rules; the page can be written once and then edited by hand.
//! Existing pages are never overwritten.
//!
//! ## Stable "latest" URLs
//!
//! Every group gets a `/<project>-<platform>/latest` redirect to the concrete
//! archive, in the `_redirects` format understood by Netlify and Cloudflare
//! Pages, so download scripts can pin to a URL that never changes.
//!
//! ## Numeric Versions Only
//!
//! Versions compare as integer triples: `2.10.0` beats `2.9.9`. A name that
//! looks like an archive but carries a malformed version aborts the run rather
//! than quietly dropping a release from the page.

pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod scan;
pub mod version;

#[cfg(test)]
pub(crate) mod test_helpers;
