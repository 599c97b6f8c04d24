//! Host version parsing and compatibility checks.
//!
//! Host releases identify themselves with a year-style major version
//! ("2026") or a dotted form ("2026.1", "2026.1.3"). Commands may declare
//! the host versions they support; an empty declaration supports all.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The version string was not one to three dot-separated numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid host version string")]
pub struct ParseVersionError;

/// A parsed host version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for HostVersion {
    type Err = ParseVersionError;

    /// Accepts one to three dot-separated numeric components; missing
    /// components default to zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseVersionError);
        }
        let mut parts = [0u32; 3];
        let mut count = 0;
        for piece in s.split('.') {
            if count >= parts.len() {
                return Err(ParseVersionError);
            }
            parts[count] = piece.parse().map_err(|_| ParseVersionError)?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse a version string, `None` for anything unparseable.
pub fn parse_version(s: &str) -> Option<HostVersion> {
    s.parse().ok()
}

/// Compare two version strings.
///
/// Unparseable versions order before parseable ones; two unparseable
/// versions compare equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Whether the current host version is in a command's supported list.
///
/// An empty list means the command supports every version.
pub fn is_version_supported(current: &str, supported: &[String]) -> bool {
    supported.is_empty() || supported.iter().any(|v| v == current)
}
