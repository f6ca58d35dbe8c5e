use crate::analyzer::NoBumpOutput;
use crate::domain::{BumpLevel, TagNaming};
use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the configuration file looked up in the working directory and the
/// user config directory.
pub const CONFIG_FILE_NAME: &str = ".versionrc.toml";

/// Subject prefix of the commits this tool writes
pub const DEFAULT_COMMIT_PREFIX: &str = "chore: bump version";

/// Subject prefix of the commits that realign manifests with the latest tag
pub const SYNC_COMMIT_PREFIX: &str = "chore: sync package version";

/// Mapping from lowercase commit type (e.g. "feat") to the bump it triggers.
///
/// Types absent from the mapping are unknown. A type mapped to
/// [`BumpLevel::None`] is known and simply triggers nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, BumpLevel>",
    into = "BTreeMap<String, BumpLevel>"
)]
pub struct TypeMapping(BTreeMap<String, BumpLevel>);

impl TypeMapping {
    /// An empty mapping, where every type is unknown
    pub fn empty() -> Self {
        TypeMapping(BTreeMap::new())
    }

    pub fn get(&self, commit_type: &str) -> Option<BumpLevel> {
        self.0.get(commit_type).copied()
    }

    pub fn insert(&mut self, commit_type: impl AsRef<str>, level: BumpLevel) {
        self.0.insert(commit_type.as_ref().to_lowercase(), level);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TypeMapping {
    fn default() -> Self {
        [
            ("feat", BumpLevel::Minor),
            ("fix", BumpLevel::Patch),
            ("perf", BumpLevel::Patch),
            ("refactor", BumpLevel::Patch),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: AsRef<str>> FromIterator<(K, BumpLevel)> for TypeMapping {
    fn from_iter<I: IntoIterator<Item = (K, BumpLevel)>>(iter: I) -> Self {
        let mut mapping = TypeMapping::empty();
        for (commit_type, level) in iter {
            mapping.insert(commit_type, level);
        }
        mapping
    }
}

impl From<BTreeMap<String, BumpLevel>> for TypeMapping {
    fn from(map: BTreeMap<String, BumpLevel>) -> Self {
        map.into_iter().collect()
    }
}

impl From<TypeMapping> for BTreeMap<String, BumpLevel> {
    fn from(mapping: TypeMapping) -> Self {
        mapping.0
    }
}

/// The configuration consumed by commit analysis.
///
/// Passed explicitly into every analysis call; nothing reads a global default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub type_mapping: TypeMapping,
    /// Subjects starting with this prefix are self-generated bump commits
    pub exclusion_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            type_mapping: TypeMapping::default(),
            exclusion_prefix: DEFAULT_COMMIT_PREFIX.to_string(),
        }
    }
}

/// Where the current version lives and which files get rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Version tracked by git tags only
    #[default]
    Git,
    /// Cargo.toml `version = "..."`
    Rust,
    /// package.json `"version": "..."`
    Node,
}

impl Preset {
    /// Manifest files used when none are configured
    pub fn default_package_files(&self) -> Vec<String> {
        match self {
            Preset::Git => vec![],
            Preset::Rust => vec!["Cargo.toml".to_string()],
            Preset::Node => vec!["package.json".to_string()],
        }
    }
}

fn default_commit_prefix() -> String {
    DEFAULT_COMMIT_PREFIX.to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Represents the complete configuration for git-bump.
///
/// Every field has a serde default, so a partial (or empty) file is valid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Replaces the built-in mapping entirely when present
    #[serde(default)]
    pub types: TypeMapping,

    #[serde(default = "default_commit_prefix")]
    pub commit_prefix: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default)]
    pub preset: Preset,

    /// Falls back to the preset's files when unset
    #[serde(default)]
    pub package_files: Option<Vec<String>>,

    #[serde(default)]
    pub push: bool,

    #[serde(default)]
    pub tag: bool,

    #[serde(default)]
    pub release_notes: bool,

    #[serde(default)]
    pub changelog: bool,

    #[serde(default)]
    pub update_major_tag: bool,

    #[serde(default)]
    pub update_minor_tag: bool,

    #[serde(default)]
    pub git_user_name: Option<String>,

    #[serde(default)]
    pub git_user_email: Option<String>,

    #[serde(default)]
    pub no_bump_output: NoBumpOutput,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            types: TypeMapping::default(),
            commit_prefix: default_commit_prefix(),
            tag_prefix: default_tag_prefix(),
            preset: Preset::default(),
            package_files: None,
            push: false,
            tag: false,
            release_notes: false,
            changelog: false,
            update_major_tag: false,
            update_minor_tag: false,
            git_user_name: None,
            git_user_email: None,
            no_bump_output: NoBumpOutput::default(),
        }
    }
}

impl Config {
    /// The analysis settings derived from this configuration
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            type_mapping: self.types.clone(),
            exclusion_prefix: self.commit_prefix.clone(),
        }
    }

    /// Configured package files, or the preset's defaults
    pub fn package_files(&self) -> Vec<String> {
        self.package_files
            .clone()
            .unwrap_or_else(|| self.preset.default_package_files())
    }

    pub fn tag_naming(&self) -> TagNaming {
        TagNaming::new(self.tag_prefix.clone())
    }

    /// Movable major/minor tags are requested
    pub fn updates_movable_tags(&self) -> bool {
        self.update_major_tag || self.update_minor_tag
    }
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| BumpError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
        .map_err(|e| BumpError::config(format!("{}: {}", path.display(), e)))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter (read or parse failures are errors)
/// 2. `.versionrc.toml` in current directory
/// 3. `.versionrc.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config_file(Path::new(path));
    }

    let candidates = [
        Some(PathBuf::from(CONFIG_FILE_NAME)),
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)),
    ];

    Ok(discover_config(candidates.into_iter().flatten()))
}

/// Uses the first existing candidate file.
///
/// A discovered file that cannot be read or parsed is reported and replaced
/// by the defaults.
pub fn discover_config<I>(candidates: I) -> Config
where
    I: IntoIterator<Item = PathBuf>,
{
    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }

        debug!(path = %candidate.display(), "loading configuration");
        return match read_config_file(&candidate) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %candidate.display(),
                    error = %e,
                    "invalid configuration file, using defaults"
                );
                Config::default()
            }
        };
    }

    Config::default()
}
