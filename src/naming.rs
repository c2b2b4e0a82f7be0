//! Filename parsing for release archives.
//!
//! Every archive published on the download page follows one convention:
//!
//! ```text
//! <project>-v<version>-<platform>.tar.gz
//! ```
//!
//! - `XPlaneUDP-v1.2.0-linux-x86_64.tar.gz` → project="XPlaneUDP", version="1.2.0", platform="linux-x86_64"
//! - `demo-v2.10.0-macos.tar.gz` → project="demo", version="2.10.0", platform="macos"
//!
//! The project may not contain a dash and the platform may not contain a dot;
//! the platform is everything between the version and `.tar.gz`.
//!
//! ## Version Text
//!
//! The version must be three dot-separated components; anything else
//! (`v1.2`, `v1.2.3.4`, `vnightly`) is not a release archive and is skipped.
//! The components themselves are captured verbatim and checked later by
//! [`crate::version`]. A file with a broken component (`demo-v1.x.0-linux.tar.gz`)
//! is therefore still recognised here, and rejected loudly by the resolver
//! instead of silently disappearing from the page.

use regex::Regex;
use std::sync::LazyLock;

/// Suffix every candidate archive must carry.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

static ARCHIVE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^-]+)-v([^.-]+\.[^.-]+\.[^.-]+)-([^.]+)\.tar\.gz$")
        .expect("archive name pattern is valid")
});

/// Result of parsing an archive filename like `demo-v1.3.0-linux.tar.gz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    pub project: String,
    /// Version text between `-v` and the platform, unvalidated.
    pub version: String,
    pub platform: String,
}

impl ArchiveName {
    /// Key shared by every release of one project on one platform.
    pub fn group_key(&self) -> String {
        format!("{}-{}", self.project, self.platform)
    }
}

/// Parse an archive filename. Returns `None` when the name does not have
/// the `<project>-v<version>-<platform>.tar.gz` shape.
pub fn parse_archive_name(filename: &str) -> Option<ArchiveName> {
    let caps = ARCHIVE_NAME.captures(filename)?;
    Some(ArchiveName {
        project: caps[1].to_string(),
        version: caps[2].to_string(),
        platform: caps[3].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_archive() {
        let n = parse_archive_name("demo-v1.3.0-linux.tar.gz").unwrap();
        assert_eq!(n.project, "demo");
        assert_eq!(n.version, "1.3.0");
        assert_eq!(n.platform, "linux");
        assert_eq!(n.group_key(), "demo-linux");
    }

    #[test]
    fn platform_may_contain_dashes() {
        let n = parse_archive_name("XPlaneUDP-v0.4.12-linux-x86_64.tar.gz").unwrap();
        assert_eq!(n.project, "XPlaneUDP");
        assert_eq!(n.version, "0.4.12");
        assert_eq!(n.platform, "linux-x86_64");
        assert_eq!(n.group_key(), "XPlaneUDP-linux-x86_64");
    }

    #[test]
    fn project_with_underscore() {
        let n = parse_archive_name("xp_plugin-v10.0.1-windows.tar.gz").unwrap();
        assert_eq!(n.project, "xp_plugin");
        assert_eq!(n.group_key(), "xp_plugin-windows");
    }

    #[test]
    fn malformed_version_is_still_recognised() {
        let n = parse_archive_name("demo-v1.x.0-linux.tar.gz").unwrap();
        assert_eq!(n.version, "1.x.0");
    }

    #[test]
    fn version_needs_three_components() {
        assert_eq!(parse_archive_name("demo-v1.2-linux.tar.gz"), None);
        assert_eq!(parse_archive_name("demo-v1.2.3.4-linux.tar.gz"), None);
        assert_eq!(parse_archive_name("demo-v1..0-linux.tar.gz"), None);
        assert_eq!(parse_archive_name("tool-vnightly-linux.tar.gz"), None);
    }

    #[test]
    fn missing_v_prefix_rejected() {
        assert_eq!(parse_archive_name("demo-1.2.0-linux.tar.gz"), None);
    }

    #[test]
    fn missing_platform_rejected() {
        assert_eq!(parse_archive_name("demo-v1.2.0.tar.gz"), None);
    }

    #[test]
    fn dotted_platform_rejected() {
        assert_eq!(parse_archive_name("demo-v1.2.0-linux.x64.tar.gz"), None);
    }

    #[test]
    fn other_extensions_rejected() {
        assert_eq!(parse_archive_name("demo-v1.2.0-linux.zip"), None);
        assert_eq!(parse_archive_name("demo-v1.2.0-linux.tar.gz.sha256"), None);
        assert_eq!(parse_archive_name("bogus.zip"), None);
    }

    #[test]
    fn leading_junk_rejected() {
        assert_eq!(parse_archive_name("-v1.2.0-linux.tar.gz"), None);
    }
}
