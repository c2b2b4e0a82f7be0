//! Latest-version resolution.
//!
//! Stage 2 of the pipeline. Each scan group collapses to the single archive
//! with the highest [`Version`]. A malformed version anywhere aborts the whole
//! resolution, so a manifest is either complete or not produced at all.
//!
//! The resulting [`VersionManifest`] is the one data structure every artifact
//! is derived from. It serializes as:
//!
//! ```json
//! {
//!   "demo-linux": {
//!     "latest": "demo-v1.3.0-linux.tar.gz"
//!   }
//! }
//! ```

use crate::scan::{FileEntry, ScanResult};
use crate::version::{Version, VersionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid version in {filename}: {source}")]
    Version {
        filename: String,
        #[source]
        source: VersionError,
    },
}

/// Latest archive for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestEntry {
    pub latest: String,
}

/// Group key → latest archive, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionManifest {
    pub entries: BTreeMap<String, LatestEntry>,
}

impl VersionManifest {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn latest(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.latest.as_str())
    }

    /// One redirect rule per group, in manifest order.
    pub fn redirect_rules(&self, status: u16) -> Vec<RedirectRule<'_>> {
        self.entries
            .iter()
            .map(|(key, entry)| RedirectRule {
                key,
                filename: &entry.latest,
                status,
            })
            .collect()
    }
}

/// A `/{key}/latest /{filename} {status}` routing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectRule<'a> {
    pub key: &'a str,
    pub filename: &'a str,
    pub status: u16,
}

impl fmt::Display for RedirectRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/latest /{} {}", self.key, self.filename, self.status)
    }
}

/// Per-group detail kept alongside the manifest for progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub key: String,
    pub latest: Version,
    pub filename: String,
    pub candidates: usize,
}

/// Manifest plus the summaries that produced it.
#[derive(Debug, Default)]
pub struct Resolution {
    pub manifest: VersionManifest,
    pub groups: Vec<GroupSummary>,
}

pub fn resolve(scan: &ScanResult) -> Result<Resolution, ResolveError> {
    let mut resolution = Resolution::default();

    for (key, files) in &scan.groups {
        let Some((version, entry)) = latest_in_group(files)? else {
            continue;
        };
        debug!(group = %key, %version, candidates = files.len(), "resolved latest");
        resolution.manifest.entries.insert(
            key.clone(),
            LatestEntry {
                latest: entry.filename.clone(),
            },
        );
        resolution.groups.push(GroupSummary {
            key: key.clone(),
            latest: version,
            filename: entry.filename.clone(),
            candidates: files.len(),
        });
    }

    Ok(resolution)
}

/// Highest-versioned entry of a group. Every version is validated even when
/// it cannot win.
fn latest_in_group(files: &[FileEntry]) -> Result<Option<(Version, &FileEntry)>, ResolveError> {
    let mut versioned = files
        .iter()
        .map(|f| {
            f.version
                .parse::<Version>()
                .map(|v| (v, f))
                .map_err(|source| ResolveError::Version {
                    filename: f.filename.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Ties only happen for identical versions; filename keeps it deterministic
    versioned.sort_by(|(va, fa), (vb, fb)| va.cmp(vb).then_with(|| fa.filename.cmp(&fb.filename)));
    Ok(versioned.pop())
}
