//! Release directory scanning.
//!
//! Stage 1 of the pipeline. Lists a single directory (no recursion), keeps the
//! regular files ending in `.tar.gz`, and groups them by project and platform:
//!
//! ```text
//! releases/
//! ├── demo-v1.2.0-linux.tar.gz     → group "demo-linux"
//! ├── demo-v1.3.0-linux.tar.gz     → group "demo-linux"
//! ├── demo-v1.3.0-macos.tar.gz     → group "demo-macos"
//! ├── demo-v1.2-linux.tar.gz       → skipped, doesn't match the naming convention
//! ├── notes.tar.gz                 → skipped, doesn't match the naming convention
//! └── README.md                    → ignored, not an archive
//! ```
//!
//! Skipped archives are reported, never fatal. Failing to read the directory
//! or any of its entries is fatal. An empty [`ScanResult`] means there is
//! nothing to publish.

use crate::naming::{ARCHIVE_SUFFIX, parse_archive_name};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One archive that matched the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub project: String,
    /// Raw `X.Y.Z` version text; components are validated during resolution.
    pub version: String,
    pub platform: String,
}

/// What happened to one `.tar.gz` file, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Matched the naming convention and joined a group.
    Found(String),
    /// Did not match the naming convention.
    Skipped(String),
    /// Name is not valid UTF-8 and cannot be published; shown lossily.
    NotUnicode(String),
}

/// Outcome of scanning one directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Entries keyed by `"{project}-{platform}"`.
    pub groups: BTreeMap<String, Vec<FileEntry>>,
    /// Per-file outcomes, in listing order.
    pub events: Vec<ScanEvent>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Archives that joined a group.
    pub fn found(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Found(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Archives left out, for whatever reason.
    pub fn skipped(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Skipped(name) | ScanEvent::NotUnicode(name) => Some(name.as_str()),
                ScanEvent::Found(_) => None,
            })
            .collect()
    }
}

pub fn scan(dir: &Path) -> Result<ScanResult, ScanError> {
    let dir_error = |source: io::Error| ScanError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut names: Vec<OsString> = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(ARCHIVE_SUFFIX) {
            continue;
        }
        if is_file(&entry).map_err(dir_error)? {
            names.push(name);
        }
    }
    names.sort();

    let mut result = ScanResult::default();
    for name in names {
        let filename = match name.into_string() {
            Ok(filename) => filename,
            Err(raw) => {
                let shown = raw.to_string_lossy().into_owned();
                debug!(file = %shown, "archive name is not UTF-8");
                result.events.push(ScanEvent::NotUnicode(shown));
                continue;
            }
        };
        match parse_archive_name(&filename) {
            Some(parsed) => {
                let key = parsed.group_key();
                debug!(file = %filename, group = %key, "archive matched");
                result.groups.entry(key).or_default().push(FileEntry {
                    filename: filename.clone(),
                    project: parsed.project,
                    version: parsed.version,
                    platform: parsed.platform,
                });
                result.events.push(ScanEvent::Found(filename));
            }
            None => {
                debug!(file = %filename, "archive skipped");
                result.events.push(ScanEvent::Skipped(filename));
            }
        }
    }

    Ok(result)
}

/// Regular file, or a symlink to one. Dangling links are not files.
fn is_file(entry: &fs::DirEntry) -> io::Result<bool> {
    let file_type = entry.file_type()?;
    if file_type.is_symlink() {
        return Ok(entry.path().is_file());
    }
    Ok(file_type.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::release_dir;

    #[test]
    fn groups_by_project_and_platform() {
        let tmp = release_dir(&[
            "demo-v1.2.0-linux.tar.gz",
            "demo-v1.3.0-linux.tar.gz",
            "demo-v1.3.0-macos.tar.gz",
        ]);
        let result = scan(tmp.path()).unwrap();

        let keys: Vec<&str> = result.groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["demo-linux", "demo-macos"]);
        assert_eq!(result.groups["demo-linux"].len(), 2);
        assert_eq!(result.groups["demo-macos"].len(), 1);
        assert_eq!(result.found().len(), 3);
        assert!(result.skipped().is_empty());
    }

    #[test]
    fn entry_fields_recovered() {
        let tmp = release_dir(&["XPlaneUDP-v0.4.12-linux-x86_64.tar.gz"]);
        let result = scan(tmp.path()).unwrap();

        let entry = &result.groups["XPlaneUDP-linux-x86_64"][0];
        assert_eq!(
            entry,
            &FileEntry {
                filename: "XPlaneUDP-v0.4.12-linux-x86_64.tar.gz".into(),
                project: "XPlaneUDP".into(),
                version: "0.4.12".into(),
                platform: "linux-x86_64".into(),
            }
        );
    }

    #[test]
    fn non_matching_archives_skipped() {
        let tmp = release_dir(&["notes.tar.gz", "demo-v1.0.0-linux.tar.gz"]);
        let result = scan(tmp.path()).unwrap();

        assert_eq!(result.skipped(), ["notes.tar.gz"]);
        assert_eq!(result.found(), ["demo-v1.0.0-linux.tar.gz"]);
    }

    #[test]
    fn events_follow_listing_order() {
        let tmp = release_dir(&[
            "demo-v1.3.0-linux.tar.gz",
            "b-notes.tar.gz",
            "demo-v1.2.0-linux.tar.gz",
            "a-notes.tar.gz",
        ]);
        let result = scan(tmp.path()).unwrap();

        assert_eq!(
            result.events,
            [
                ScanEvent::Skipped("a-notes.tar.gz".into()),
                ScanEvent::Skipped("b-notes.tar.gz".into()),
                ScanEvent::Found("demo-v1.2.0-linux.tar.gz".into()),
                ScanEvent::Found("demo-v1.3.0-linux.tar.gz".into()),
            ]
        );
    }

    #[test]
    fn versions_without_three_components_skipped() {
        let tmp = release_dir(&[
            "demo-v1.2-linux.tar.gz",
            "demo-v1.2.3.4-linux.tar.gz",
            "tool-vnightly-linux.tar.gz",
            "demo-v1.3.0-linux.tar.gz",
        ]);
        let result = scan(tmp.path()).unwrap();

        assert_eq!(
            result.skipped(),
            [
                "demo-v1.2-linux.tar.gz",
                "demo-v1.2.3.4-linux.tar.gz",
                "tool-vnightly-linux.tar.gz",
            ]
        );
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups["demo-linux"].len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = release_dir(&["demo-v1.0.0-linux.tar.gz"]);
        let raw = OsStr::from_bytes(b"demo\xff-v1.1.0-linux.tar.gz");
        fs::write(tmp.path().join(raw), b"placeholder").unwrap();
        let result = scan(tmp.path()).unwrap();

        assert_eq!(
            result.groups["demo-linux"],
            [FileEntry {
                filename: "demo-v1.0.0-linux.tar.gz".into(),
                project: "demo".into(),
                version: "1.0.0".into(),
                platform: "linux".into(),
            }]
        );
        assert!(result.events.contains(&ScanEvent::NotUnicode(
            "demo\u{FFFD}-v1.1.0-linux.tar.gz".into()
        )));
        assert_eq!(result.found(), ["demo-v1.0.0-linux.tar.gz"]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_ignored() {
        let tmp = release_dir(&[]);
        std::os::unix::fs::symlink(
            tmp.path().join("gone"),
            tmp.path().join("demo-v1.0.0-linux.tar.gz"),
        )
        .unwrap();
        assert!(scan(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn non_archives_ignored_silently() {
        let tmp = release_dir(&["bogus.zip", "README.md", "demo-v1.0.0-linux.zip"]);
        let result = scan(tmp.path()).unwrap();

        assert!(result.is_empty());
        assert!(result.events.is_empty());
    }

    #[test]
    fn directories_ignored() {
        let tmp = release_dir(&[]);
        fs::create_dir(tmp.path().join("demo-v1.0.0-linux.tar.gz")).unwrap();
        let result = scan(tmp.path()).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn empty_directory_is_empty_result() {
        let tmp = release_dir(&[]);
        assert!(scan(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = release_dir(&[]);
        let missing = tmp.path().join("nope");
        let err = scan(&missing).unwrap_err();

        assert!(matches!(err, ScanError::Directory { ref path, .. } if *path == missing));
    }

    #[test]
    fn malformed_version_kept_for_resolver() {
        let tmp = release_dir(&["demo-v1.x.0-linux.tar.gz"]);
        let result = scan(tmp.path()).unwrap();

        assert_eq!(result.groups["demo-linux"][0].version, "1.x.0");
    }
}
