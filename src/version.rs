//! Three-part numeric release versions.
//!
//! Versions compare component-wise as integers, so `2.10.0` sorts after
//! `2.9.9`. Anything other than exactly three decimal components is an error.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    #[error("version '{0}' must have exactly three components (major.minor.patch)")]
    ComponentCount(String),
    #[error("version '{version}' has a non-numeric component '{component}'")]
    NonNumeric { version: String, component: String },
}

/// A `major.minor.patch` version. Ordering is derived field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        let &[major, minor, patch] = parts.as_slice() else {
            return Err(VersionError::ComponentCount(s.to_string()));
        };
        let component = |c: &str| {
            // `u64::from_str` accepts a leading '+', which is not a digit
            if c.is_empty() || !c.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::NonNumeric {
                    version: s.to_string(),
                    component: c.to_string(),
                });
            }
            c.parse::<u64>().map_err(|_| VersionError::NonNumeric {
                version: s.to_string(),
                component: c.to_string(),
            })
        };
        Ok(Self::new(component(major)?, component(minor)?, component(patch)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
