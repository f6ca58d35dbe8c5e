use crate::domain::BumpLevel;
use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation (major.minor.patch only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `M.m.p` string.
    ///
    /// Exactly three dot-separated runs of ASCII digits are accepted. Signs,
    /// whitespace, empty components, pre-release and build suffixes are
    /// rejected with [`BumpError::InvalidVersion`]. Tag prefixes such as `v`
    /// must be stripped by the caller.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(BumpError::invalid_version(format!(
                "'{}' - expected MAJOR.MINOR.PATCH",
                input
            )));
        };

        Ok(Version {
            major: parse_component(input, major)?,
            minor: parse_component(input, minor)?,
            patch: parse_component(input, patch)?,
        })
    }

    /// Apply a bump level, zeroing every lower-order component.
    ///
    /// Fails with [`BumpError::InvalidVersion`] if the incremented component
    /// would overflow.
    pub fn bump(&self, level: BumpLevel) -> Result<Self> {
        let overflow =
            || BumpError::invalid_version(format!("'{}' cannot be bumped {}", self, level));

        Ok(match level {
            BumpLevel::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            BumpLevel::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            BumpLevel::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
            BumpLevel::None => *self,
        })
    }
}

fn parse_component(input: &str, part: &str) -> Result<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BumpError::invalid_version(format!(
            "'{}' - component '{}' is not a non-negative integer",
            input, part
        )));
    }

    part.parse::<u32>().map_err(|_| {
        BumpError::invalid_version(format!("'{}' - component '{}' is out of range", input, part))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Bump a textual version and return the formatted result.
///
/// ```
/// use git_bump::domain::{bump_version, BumpLevel};
///
/// assert_eq!(bump_version("1.2.3", BumpLevel::Major).unwrap(), "2.0.0");
/// assert_eq!(bump_version("1.2.3", BumpLevel::None).unwrap(), "1.2.3");
/// ```
pub fn bump_version(version: &str, level: BumpLevel) -> Result<String> {
    Ok(Version::parse(version)?.bump(level)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_invalid() {
        for input in [
            "", "1.2", "1.2.3.4", "v1.2.3", "1.2.x", "1..3", "-1.2.3", "+1.2.3", " 1.2.3",
            "1.2.3 ", "1.2.3-rc.1", "1.2.3+build", "99999999999.0.0",
        ] {
            let err = Version::parse(input).unwrap_err();
            assert!(
                matches!(err, BumpError::InvalidVersion(_)),
                "expected InvalidVersion for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_version_parse_drops_leading_zeros() {
        let v = Version::parse("01.002.0").unwrap();
        assert_eq!(v, Version::new(1, 2, 0));
        assert_eq!(v.to_string(), "1.2.0");
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = Version::new(1, 2, 3).bump(BumpLevel::Major).unwrap();
        assert_eq!(bumped, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = Version::new(1, 2, 3).bump(BumpLevel::Minor).unwrap();
        assert_eq!(bumped, Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = Version::new(1, 2, 3).bump(BumpLevel::Patch).unwrap();
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_none_is_identity() {
        let v = Version::new(4, 5, 6);
        assert_eq!(v.bump(BumpLevel::None).unwrap(), v);
    }

    #[test]
    fn test_bump_increases_and_zeroes_lower_components() {
        let v = Version::new(3, 7, 9);
        for level in [BumpLevel::Patch, BumpLevel::Minor, BumpLevel::Major] {
            let bumped = v.bump(level).unwrap();
            assert!(bumped > v);
            match level {
                BumpLevel::Major => assert_eq!((bumped.minor, bumped.patch), (0, 0)),
                BumpLevel::Minor => assert_eq!(bumped.patch, 0),
                _ => {}
            }
        }
    }

    #[test]
    fn test_version_bump_overflow() {
        let v = Version::new(u32::MAX, 0, 0);
        assert!(v.bump(BumpLevel::Major).is_err());
        assert_eq!(v.bump(BumpLevel::Minor).unwrap(), Version::new(u32::MAX, 1, 0));
    }

    #[test]
    fn test_bump_version_strings() {
        assert_eq!(bump_version("1.2.3", BumpLevel::Major).unwrap(), "2.0.0");
        assert_eq!(bump_version("1.2.3", BumpLevel::Minor).unwrap(), "1.3.0");
        assert_eq!(bump_version("1.2.3", BumpLevel::Patch).unwrap(), "1.2.4");
        assert_eq!(bump_version("1.2.3", BumpLevel::None).unwrap(), "1.2.3");
        assert!(bump_version("1.2", BumpLevel::Patch).is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 3, 0));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    }
}
