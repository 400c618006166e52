//! Version helpers shared by the manifest and lockfile rewriters.
use regex::Regex;
use semver::Version;
use std::fmt;

use crate::{error::PropagatorError, result::Result};

/// Trailing `major.minor.patch` of a constraint string. Anything before it
/// (protocol, repository locator, `#`, `^`, `~`) is left untouched.
const TRAILING_VERSION_PATTERN: &str = r"(\d+\.\d+\.\d+)$";

/// Version published by a release event, with the tag it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedVersion {
    pub tag: String,
    pub version: Version,
}

impl ReleasedVersion {
    /// Parse a release tag such as `4.0.0` or `v4.0.0`.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let version =
            Version::parse(stripped).map_err(PropagatorError::from)?;
        Ok(Self {
            tag: trimmed.to_string(),
            version,
        })
    }

    /// Fully qualified tag ref names this release may have been pushed as.
    pub fn tag_ref_candidates(&self) -> Vec<String> {
        let mut candidates = vec![format!("refs/tags/{}", self.tag)];
        for name in [
            self.version.to_string(),
            format!("v{}", self.version),
        ] {
            let candidate = format!("refs/tags/{name}");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }

    /// Strictly greater by major, then minor, then patch.
    pub fn is_newer_than(&self, current: &Version) -> bool {
        let released = &self.version;
        (released.major, released.minor, released.patch)
            > (current.major, current.minor, current.patch)
    }
}

impl fmt::Display for ReleasedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Extract the trailing numeric version of a constraint string, if any.
pub fn trailing_version(constraint: &str) -> Result<Option<Version>> {
    let re = Regex::new(TRAILING_VERSION_PATTERN)?;
    match re.captures(constraint.trim_end()) {
        Some(captures) => {
            let version =
                Version::parse(&captures[1]).map_err(PropagatorError::from)?;
            Ok(Some(version))
        }
        None => Ok(None),
    }
}

/// Replace the trailing numeric version of a constraint string.
pub fn replace_trailing_version(
    constraint: &str,
    released: &ReleasedVersion,
) -> Result<String> {
    let re = Regex::new(TRAILING_VERSION_PATTERN)?;
    let replacement = released.version.to_string();
    Ok(re
        .replace(constraint.trim_end(), regex::NoExpand(&replacement))
        .to_string())
}
