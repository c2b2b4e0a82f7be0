//! Shared test utilities for the distpage test suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = release_dir(&["demo-v1.2.0-linux.tar.gz", "demo-v1.3.0-linux.tar.gz"]);
//! let result = scan(tmp.path()).unwrap();
//! assert_eq!(result.groups["demo-linux"].len(), 2);
//! ```

use tempfile::TempDir;

/// Create a temp directory holding one placeholder file per name.
///
/// Archive contents are never read, only their names.
pub fn release_dir(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        std::fs::write(tmp.path().join(name), b"placeholder").unwrap();
    }
    tmp
}
