use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Magnitude of a version increment.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `None < Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl BumpLevel {
    /// Lowercase name, as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpLevel::None => "none",
            BumpLevel::Patch => "patch",
            BumpLevel::Minor => "minor",
            BumpLevel::Major => "major",
        }
    }

    /// Capitalized name used to label triggering commits ("Minor: feat: ...")
    pub fn label(&self) -> &'static str {
        match self {
            BumpLevel::None => "None",
            BumpLevel::Patch => "Patch",
            BumpLevel::Minor => "Minor",
            BumpLevel::Major => "Major",
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(BumpLevel::None),
            "patch" => Ok(BumpLevel::Patch),
            "minor" => Ok(BumpLevel::Minor),
            "major" => Ok(BumpLevel::Major),
            other => Err(format!("unknown bump level '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(BumpLevel::None < BumpLevel::Patch);
        assert!(BumpLevel::Patch < BumpLevel::Minor);
        assert!(BumpLevel::Minor < BumpLevel::Major);
        assert_eq!(BumpLevel::default(), BumpLevel::None);
    }

    #[test]
    fn test_label_is_capitalized() {
        assert_eq!(BumpLevel::Major.label(), "Major");
        assert_eq!(BumpLevel::Patch.label(), "Patch");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("minor".parse::<BumpLevel>().unwrap(), BumpLevel::Minor);
        assert_eq!("MAJOR".parse::<BumpLevel>().unwrap(), BumpLevel::Major);
        assert!("huge".parse::<BumpLevel>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for level in [
            BumpLevel::None,
            BumpLevel::Patch,
            BumpLevel::Minor,
            BumpLevel::Major,
        ] {
            assert_eq!(level.to_string().parse::<BumpLevel>().unwrap(), level);
        }
    }
}
