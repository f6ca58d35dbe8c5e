// tests/config_test.rs
use git_bump::analyzer::NoBumpOutput;
use git_bump::config::{discover_config, load_config, Config, Preset, CONFIG_FILE_NAME};
use git_bump::domain::BumpLevel;
use git_bump::BumpError;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.types.get("feat"), Some(BumpLevel::Minor));
    assert_eq!(config.types.get("fix"), Some(BumpLevel::Patch));
    assert_eq!(config.commit_prefix, "chore: bump version");
    assert_eq!(config.tag_prefix, "v");
    assert_eq!(config.preset, Preset::Git);
    assert_eq!(config.no_bump_output, NoBumpOutput::Current);
    assert!(!config.push && !config.tag && !config.changelog);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
preset = "rust"
tag_prefix = "release-"
package_files = ["Cargo.toml", "cli/Cargo.toml"]
tag = true
update_major_tag = true
no_bump_output = "silent"

[types]
feat = "minor"
fix = "patch"
docs = "none"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.preset, Preset::Rust);
    assert_eq!(config.tag_prefix, "release-");
    assert_eq!(
        config.package_files(),
        vec!["Cargo.toml".to_string(), "cli/Cargo.toml".to_string()]
    );
    assert!(config.tag);
    assert!(config.updates_movable_tags());
    assert_eq!(config.no_bump_output, NoBumpOutput::Silent);

    assert_eq!(config.types.get("docs"), Some(BumpLevel::None));
    assert_eq!(config.types.get("perf"), None);
    assert_eq!(config.analysis().type_mapping.len(), 3);
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load_config(Some(missing.to_str().unwrap())).is_err());
}

#[test]
fn test_explicit_invalid_file_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"preset = \"cobol\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, BumpError::Config(_)));
}

#[test]
fn test_discover_first_existing_candidate() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(second.path().join(CONFIG_FILE_NAME), "tag_prefix = \"x\"\n").unwrap();

    let config = discover_config(vec![
        first.path().join(CONFIG_FILE_NAME),
        second.path().join(CONFIG_FILE_NAME),
    ]);
    assert_eq!(config.tag_prefix, "x");
}

#[test]
fn test_discovered_invalid_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[types]\nfeat = 3\n").unwrap();

    assert_eq!(discover_config(vec![path]), Config::default());
}

#[test]
fn test_tag_naming_from_config() {
    let config = Config {
        tag_prefix: "rel/".to_string(),
        ..Config::default()
    };
    let naming = config.tag_naming();
    assert!(naming.is_release_tag("rel/1.2.3"));
    assert!(!naming.is_release_tag("v1.2.3"));
}
