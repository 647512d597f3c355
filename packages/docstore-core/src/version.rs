//! Document compatibility versions and the open-time gate.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::document::Node;
use crate::vocabulary::{VERSION_ATTRIBUTES, VERSION_NODE};

/// Four-part version stamped into every document.
///
/// Ordering compares `major`, then `minor`, then `release`, then `revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CompatibilityVersion {
    pub major: u32,
    pub minor: u32,
    pub release: u32,
    pub revision: u32,
}

impl CompatibilityVersion {
    pub const fn new(major: u32, minor: u32, release: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            release,
            revision,
        }
    }

    fn parts(&self) -> [u32; 4] {
        [self.major, self.minor, self.release, self.revision]
    }
}

/// Version written by a store that does not configure one.
pub const DEFAULT_CURRENT_VERSION: CompatibilityVersion = CompatibilityVersion::new(2, 0, 0, 0);

/// Oldest version accepted by default.
pub const DEFAULT_MINIMUM_VERSION: CompatibilityVersion = CompatibilityVersion::new(1, 0, 0, 0);

impl fmt::Display for CompatibilityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.release, self.revision
        )
    }
}

/// Error parsing a `major.minor.release.revision` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version '{0}': expected four dot-separated numbers")]
pub struct ParseVersionError(pub String);

impl FromStr for CompatibilityVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseVersionError(s.to_string()))?;
        match parts.as_slice() {
            [major, minor, release, revision] => {
                Ok(Self::new(*major, *minor, *release, *revision))
            }
            _ => Err(ParseVersionError(s.to_string())),
        }
    }
}

/// Why a document's version is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionMismatch {
    #[error("Document has no readable compatibility version")]
    NoVersion,

    #[error("Document version {stored} is newer than supported version {current}")]
    Newer {
        stored: CompatibilityVersion,
        current: CompatibilityVersion,
    },

    #[error("Document version {stored} is older than minimum version {minimum}")]
    Older {
        stored: CompatibilityVersion,
        minimum: CompatibilityVersion,
    },
}

/// Accepts `stored` when `minimum <= stored <= current`.
///
/// A missing version is never accepted.
pub fn check_version(
    stored: Option<CompatibilityVersion>,
    current: CompatibilityVersion,
    minimum: CompatibilityVersion,
) -> Result<(), VersionMismatch> {
    let stored = stored.ok_or(VersionMismatch::NoVersion)?;
    if stored > current {
        Err(VersionMismatch::Newer { stored, current })
    } else if stored < minimum {
        Err(VersionMismatch::Older { stored, minimum })
    } else {
        Ok(())
    }
}

/// Reads the version marker from the document root.
///
/// Returns `None` when the marker is absent or any of its four parts is
/// missing or not a number.
pub fn read_version(root: &Node) -> Option<CompatibilityVersion> {
    let marker = root.child(VERSION_NODE)?;

    let mut parts = [0u32; 4];
    for (slot, attribute) in parts.iter_mut().zip(VERSION_ATTRIBUTES) {
        match marker.attribute(attribute).map(|text| text.trim().parse::<u32>()) {
            Some(Ok(value)) => *slot = value,
            _ => {
                tracing::warn!(
                    "Version marker attribute '{}' is missing or malformed: {:?}",
                    attribute,
                    marker.attribute(attribute)
                );
                return None;
            }
        }
    }

    let [major, minor, release, revision] = parts;
    Some(CompatibilityVersion::new(major, minor, release, revision))
}

/// Replaces any version marker on the root with one for `version`.
pub fn write_version(root: &mut Node, version: CompatibilityVersion) {
    root.remove_children_where(|child| child.name() == VERSION_NODE);

    let mut marker = Node::new(VERSION_NODE);
    for (attribute, part) in VERSION_ATTRIBUTES.iter().zip(version.parts()) {
        marker.set_attribute(*attribute, part.to_string());
    }
    root.push(marker);
}
