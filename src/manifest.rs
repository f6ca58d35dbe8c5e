//! Where the current version is read from and which files a release rewrites
//!
//! - [GitStrategy]: the version lives only in release tags
//! - [ManifestStrategy]: the version lives in package manifests
//!   (`Cargo.toml`, `package.json`) and is rewritten in place

use crate::config::{Config, Preset};
use crate::domain::Version;
use crate::error::{BumpError, Result};
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait Strategy {
    /// Version the next release is computed from
    fn current_version(&self) -> Result<Version>;

    /// Write `version` into every managed file.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - The files actually rewritten, relative to the root
    fn update_files(&self, version: &Version) -> Result<Vec<String>>;

    /// Whether this strategy keeps a version outside of git tags
    fn tracks_files(&self) -> bool;
}

/// Version derived from the latest release tag; nothing to rewrite
#[derive(Debug, Clone, Default)]
pub struct GitStrategy {
    tag_version: Option<Version>,
}

impl GitStrategy {
    pub fn new(tag_version: Option<Version>) -> Self {
        GitStrategy { tag_version }
    }
}

impl Strategy for GitStrategy {
    fn current_version(&self) -> Result<Version> {
        Ok(self.tag_version.unwrap_or_default())
    }

    fn update_files(&self, _version: &Version) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn tracks_files(&self) -> bool {
        false
    }
}

/// Manifest dialects with a single `version` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `version = "1.2.3"` at the start of a line
    Cargo,
    /// `"version": "1.2.3"` as a key of the top-level object
    Node,
}

impl ManifestFormat {
    fn pattern(&self) -> &'static str {
        match self {
            ManifestFormat::Cargo => r#"(?m)^(version\s*=\s*")([^"]+)(")"#,
            ManifestFormat::Node => r#"("version"\s*:\s*")([^"]+)(")"#,
        }
    }

    fn default_file(&self) -> &'static str {
        match self {
            ManifestFormat::Cargo => "Cargo.toml",
            ManifestFormat::Node => "package.json",
        }
    }
}

/// Reads the version from the first package file and rewrites it in all of
/// them
#[derive(Debug, Clone)]
pub struct ManifestStrategy {
    format: ManifestFormat,
    root: PathBuf,
    files: Vec<String>,
    pattern: Regex,
}

impl ManifestStrategy {
    /// `files` are relative to `root`; an empty list means the format's
    /// default manifest
    pub fn new(
        format: ManifestFormat,
        root: impl Into<PathBuf>,
        files: Vec<String>,
    ) -> Result<Self> {
        let files = if files.is_empty() {
            vec![format.default_file().to_string()]
        } else {
            files
        };

        let pattern = Regex::new(format.pattern())
            .map_err(|e| BumpError::manifest(format!("Invalid version pattern: {}", e)))?;

        Ok(ManifestStrategy {
            format,
            root: root.into(),
            files,
            pattern,
        })
    }

    fn primary_file(&self) -> &str {
        // `new` guarantees at least one file
        self.files
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.format.default_file())
    }

    fn path_of(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Byte range of the version value in `contents`, if the file has one
    fn locate_version(&self, file: &str, contents: &str) -> Result<Option<Range<usize>>> {
        match self.format {
            ManifestFormat::Cargo => Ok(self
                .pattern
                .captures(contents)
                .and_then(|captures| captures.get(2))
                .map(|value| value.range())),
            ManifestFormat::Node => locate_top_level_json_version(&self.pattern, file, contents),
        }
    }
}

/// Find the top-level `"version"` of a JSON document.
///
/// The document is parsed to learn the package version; the pattern then
/// supplies the byte span of the one occurrence that sits directly in the
/// root object, so nested `"version"` keys are never touched.
fn locate_top_level_json_version(
    pattern: &Regex,
    file: &str,
    contents: &str,
) -> Result<Option<Range<usize>>> {
    let document: serde_json::Value = serde_json::from_str(contents)
        .map_err(|e| BumpError::manifest(format!("{} is not valid JSON: {}", file, e)))?;

    let Some(version) = document.get("version").and_then(serde_json::Value::as_str) else {
        return Ok(None);
    };

    for captures in pattern.captures_iter(contents) {
        let (Some(key), Some(value)) = (captures.get(0), captures.get(2)) else {
            continue;
        };
        if json_depth_at(contents, key.start()) == Some(1) && value.as_str() == version {
            return Ok(Some(value.range()));
        }
    }

    Err(BumpError::manifest(format!(
        "Cannot locate the top-level version field in {}",
        file
    )))
}

/// Object/array nesting depth at byte `pos`, or `None` inside a string
fn json_depth_at(contents: &str, pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in &contents.as_bytes()[..pos] {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    (!in_string).then_some(depth)
}

impl Strategy for ManifestStrategy {
    fn current_version(&self) -> Result<Version> {
        let file = self.primary_file();
        let path = self.path_of(file);

        if !path.exists() {
            return Err(BumpError::manifest(format!("{} not found", file)));
        }

        let contents = fs::read_to_string(&path)?;
        let range = self
            .locate_version(file, &contents)?
            .ok_or_else(|| BumpError::manifest(format!("No version field found in {}", file)))?;

        Version::parse(&contents[range])
    }

    fn update_files(&self, version: &Version) -> Result<Vec<String>> {
        let mut updated = Vec::new();

        for file in &self.files {
            let path = self.path_of(file);
            if !path.exists() {
                debug!(file = %file, "skipping missing package file");
                continue;
            }

            let mut contents = fs::read_to_string(&path)?;
            let Some(range) = self.locate_version(file, &contents)? else {
                debug!(file = %file, "no version field, leaving file untouched");
                continue;
            };

            contents.replace_range(range, &version.to_string());
            fs::write(&path, contents)?;
            updated.push(file.clone());
        }

        debug!(files = ?updated, version = %version, "updated package files");
        Ok(updated)
    }

    fn tracks_files(&self) -> bool {
        true
    }
}

/// Select the strategy for this run.
///
/// `raw` runs only report a version, so they always use [GitStrategy].
pub fn load_strategy(
    config: &Config,
    root: &Path,
    tag_version: Option<Version>,
    raw: bool,
) -> Result<Box<dyn Strategy>> {
    let format = match (raw, config.preset) {
        (true, _) | (false, Preset::Git) => {
            return Ok(Box::new(GitStrategy::new(tag_version)));
        }
        (false, Preset::Rust) => ManifestFormat::Cargo,
        (false, Preset::Node) => ManifestFormat::Node,
    };

    Ok(Box::new(ManifestStrategy::new(
        format,
        root,
        config.package_files(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CARGO_TOML: &str = r#"[package]
name = "demo"
version = "1.2.3"
edition = "2021"

[dependencies]
serde = { version = "1.0" }
"#;

    const PACKAGE_JSON: &str = r#"{
  "name": "demo",
  "version":  "0.4.1",
  "dependencies": {
    "left-pad": "1.0.0"
  }
}
"#;

    #[test]
    fn test_git_strategy_without_tag() {
        let strategy = GitStrategy::new(None);
        assert_eq!(strategy.current_version().unwrap(), Version::new(0, 0, 0));
        assert!(strategy
            .update_files(&Version::new(1, 0, 0))
            .unwrap()
            .is_empty());
        assert!(!strategy.tracks_files());
    }

    #[test]
    fn test_cargo_read_and_update() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), CARGO_TOML).unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Cargo, dir.path(), vec![]).unwrap();
        assert_eq!(strategy.current_version().unwrap(), Version::new(1, 2, 3));

        let updated = strategy.update_files(&Version::new(1, 3, 0)).unwrap();
        assert_eq!(updated, vec!["Cargo.toml".to_string()]);

        let contents = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert!(contents.contains("version = \"1.3.0\""));
        assert!(contents.contains("serde = { version = \"1.0\" }"));
    }

    #[test]
    fn test_node_update_preserves_formatting() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), PACKAGE_JSON).unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Node, dir.path(), vec![]).unwrap();
        assert_eq!(strategy.current_version().unwrap(), Version::new(0, 4, 1));

        strategy.update_files(&Version::new(0, 5, 0)).unwrap();
        let contents = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(contents, PACKAGE_JSON.replace("0.4.1", "0.5.0"));
    }

    #[test]
    fn test_node_nested_version_before_top_level() {
        let dir = TempDir::new().unwrap();
        let manifest = r#"{"name":"demo","publishConfig":{"version":"9.9.9"},"version":"1.0.0"}"#;
        fs::write(dir.path().join("package.json"), manifest).unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Node, dir.path(), vec![]).unwrap();
        assert_eq!(strategy.current_version().unwrap(), Version::new(1, 0, 0));

        strategy.update_files(&Version::new(1, 1, 0)).unwrap();
        let contents = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(
            contents,
            r#"{"name":"demo","publishConfig":{"version":"9.9.9"},"version":"1.1.0"}"#
        );
    }

    #[test]
    fn test_node_version_inside_string_is_ignored() {
        let dir = TempDir::new().unwrap();
        let manifest = r#"{
  "description": "set \"version\": \"0.0.1\" here",
  "scripts": { "v": "echo \"version\":\"2.0.0\"" },
  "version": "3.1.4"
}
"#;
        fs::write(dir.path().join("package.json"), manifest).unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Node, dir.path(), vec![]).unwrap();
        assert_eq!(strategy.current_version().unwrap(), Version::new(3, 1, 4));
    }

    #[test]
    fn test_node_without_top_level_version() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"demo","engines":{"version":"1.0.0"}}"#,
        )
        .unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Node, dir.path(), vec![]).unwrap();
        assert!(matches!(
            strategy.current_version().unwrap_err(),
            BumpError::Manifest(_)
        ));
        assert!(strategy
            .update_files(&Version::new(1, 0, 0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_node_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{ \"version\": \"1.0.0\",").unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Node, dir.path(), vec![]).unwrap();
        assert!(matches!(
            strategy.current_version().unwrap_err(),
            BumpError::Manifest(_)
        ));
    }

    #[test]
    fn test_json_depth_at() {
        let doc = r#"{"a":{"b":"}"},"c":1}"#;
        assert_eq!(json_depth_at(doc, 1), Some(1));
        assert_eq!(json_depth_at(doc, doc.find("\"b\"").unwrap()), Some(2));
        assert_eq!(json_depth_at(doc, doc.find("}\"").unwrap()), None);
        assert_eq!(json_depth_at(doc, doc.find("\"c\"").unwrap()), Some(1));
    }

    #[test]
    fn test_missing_primary_file() {
        let dir = TempDir::new().unwrap();
        let strategy = ManifestStrategy::new(ManifestFormat::Cargo, dir.path(), vec![]).unwrap();
        let err = strategy.current_version().unwrap_err();
        assert!(matches!(err, BumpError::Manifest(_)));
    }

    #[test]
    fn test_missing_secondary_file_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), CARGO_TOML).unwrap();

        let strategy = ManifestStrategy::new(
            ManifestFormat::Cargo,
            dir.path(),
            vec!["Cargo.toml".to_string(), "crates/cli/Cargo.toml".to_string()],
        )
        .unwrap();

        let updated = strategy.update_files(&Version::new(2, 0, 0)).unwrap();
        assert_eq!(updated, vec!["Cargo.toml".to_string()]);
    }

    #[test]
    fn test_no_version_field() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\nmembers = []\n").unwrap();

        let strategy = ManifestStrategy::new(ManifestFormat::Cargo, dir.path(), vec![]).unwrap();
        assert!(matches!(
            strategy.current_version().unwrap_err(),
            BumpError::Manifest(_)
        ));
    }

    #[test]
    fn test_load_strategy_raw_forces_git() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            preset: Preset::Rust,
            ..Config::default()
        };

        let strategy =
            load_strategy(&config, dir.path(), Some(Version::new(3, 1, 4)), true).unwrap();
        assert!(!strategy.tracks_files());
        assert_eq!(strategy.current_version().unwrap(), Version::new(3, 1, 4));

        let strategy = load_strategy(&config, dir.path(), None, false).unwrap();
        assert!(strategy.tracks_files());
    }
}
