//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tally_config::{ConfigError, ConfigLoader, Isolation, RunConfig, CONFIG_FILE_NAME};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> std::path::PathBuf {
    let config_path = dir.join(CONFIG_FILE_NAME);
    fs::write(&config_path, content).unwrap();
    config_path
}

fn clear_env() {
    for key in [
        "TALLY_ISOLATION",
        "TALLY_PARALLEL",
        "TALLY_STRICT",
        "TALLY_NO_COLOR",
        "NO_COLOR",
    ] {
        env::remove_var(key);
    }
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn test_load_when_no_config_exists() {
    let temp_dir = TempDir::new().unwrap();

    let config = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(!config.is_project());
    assert_eq!(config.run, RunConfig::default());
}

#[test]
fn test_load_with_empty_config() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "");

    let config = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(config.is_project());
    assert_eq!(config.run, RunConfig::default());
}

#[test]
fn test_load_from_subdirectory_finds_parent() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[run]
parallel = true
"#,
    );

    let nested = temp_dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let config = ConfigLoader::new()
        .without_env()
        .load_from_directory(&nested)
        .unwrap();

    assert!(config.run.parallel);
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

#[test]
fn test_full_run_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[run]
isolation = "test-body"
parallel = true
strict_exit = true
no_color = true
"#,
    );

    let config = ConfigLoader::new().without_env().load_from_file(&path).unwrap();

    assert_eq!(
        config.run,
        RunConfig {
            isolation: Isolation::TestBody,
            parallel: true,
            strict_exit: true,
            no_color: true,
        }
    );
}

// ============================================================================
// Error Cases
// ============================================================================

#[test]
fn test_invalid_toml_syntax() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[run\nparallel = true");

    let result = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path());

    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[test]
fn test_unknown_field_rejected() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[run]
timeout = 30
"#,
    );

    let result = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path());

    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[test]
fn test_unknown_isolation_rejected() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[run]
isolation = "sandbox"
"#,
    );

    let result = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path());

    assert!(result.is_err());
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[run]
isolation = "lifecycle"
strict_exit = false
"#,
    );

    env::set_var("TALLY_ISOLATION", "test-body");
    env::set_var("TALLY_STRICT", "true");

    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.run.isolation, Isolation::TestBody);
    assert!(config.run.strict_exit);
}

#[test]
#[serial]
fn test_no_color_env() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("NO_COLOR", "1");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    clear_env();

    assert!(config.unwrap().run.no_color);
}

#[test]
#[serial]
fn test_without_env_ignores_variables() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TALLY_PARALLEL", "1");
    let config = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path());
    clear_env();

    assert!(!config.unwrap().run.parallel);
}
