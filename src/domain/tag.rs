use crate::domain::Version;
use crate::error::Result;

/// Tag naming scheme built around a literal prefix (e.g. "v" -> "v1.2.3")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNaming {
    prefix: String,
}

impl TagNaming {
    /// Create a naming scheme for the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        TagNaming {
            prefix: prefix.into(),
        }
    }

    /// Full release tag, e.g. "v1.2.3"
    pub fn release_tag(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Movable major tag, e.g. "v1"
    pub fn major_tag(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version.major)
    }

    /// Movable minor tag, e.g. "v1.2"
    pub fn minor_tag(&self, version: &Version) -> String {
        format!("{}{}.{}", self.prefix, version.major, version.minor)
    }

    /// Check whether a tag is a full release tag under this scheme.
    /// Movable major/minor tags do not match.
    pub fn is_release_tag(&self, tag: &str) -> bool {
        tag.strip_prefix(self.prefix.as_str())
            .is_some_and(|bare| Version::parse(bare).is_ok())
    }

    /// Extract the version from a tag, stripping the prefix when present
    pub fn version_of(&self, tag: &str) -> Result<Version> {
        let bare = tag.strip_prefix(self.prefix.as_str()).unwrap_or(tag);
        Version::parse(bare)
    }
}

impl Default for TagNaming {
    fn default() -> Self {
        TagNaming::new("v")
    }
}
