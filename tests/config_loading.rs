// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use timebox::config::{load_and_validate, load_or_default};
use timebox::errors::TimeboxError;
use timebox::types::{Category, WarnPolicy};
use timebox_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_loaded() {
    let file = write_config(
        r#"
[supervisor]
default_timeout_ms = 2500
default_message = "Backend slow, try again"
slow_warning_ms = 1000
warn_policy = "once"
progress_interval_ms = 200
cancel_grace_ms = 50

[preset.query]
timeout_ms = 4000

[preset.insert]
message = "Could not save listing in time"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.default_deadline().timeout_ms(), 2_500);
    assert_eq!(cfg.default_deadline().message(), "Backend slow, try again");
    assert_eq!(cfg.default_deadline().grace(), Duration::from_millis(50));
    assert_eq!(cfg.slow_warning(), Duration::from_millis(1_000));
    assert_eq!(cfg.warn_policy(), WarnPolicy::Once);
    assert_eq!(cfg.progress_interval(), Duration::from_millis(200));

    assert_eq!(cfg.preset(Category::Query).timeout_ms(), 4_000);
    assert_eq!(cfg.preset(Category::Query).message(), "Database query timed out");
    assert_eq!(cfg.preset(Category::Insert).timeout_ms(), 30_000);
    assert_eq!(cfg.preset(Category::Insert).message(), "Could not save listing in time");
    assert_eq!(cfg.preset(Category::Auth).timeout_ms(), 20_000);
}

#[test]
fn empty_file_means_builtin_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg, ConfigFileBuilder::new().build());
}

#[test]
fn explicit_path_must_exist() {
    let missing = std::path::Path::new("/definitely/not/here/Timebox.toml");
    match load_or_default(Some(missing)) {
        Err(TimeboxError::IoError(_)) => {}
        other => panic!("expected IoError, got {other:?}"),
    }
}

#[test]
fn unknown_preset_name_returns_structured_error() {
    let file = write_config(
        r#"
[preset.delete]
timeout_ms = 100
"#,
    );

    match load_and_validate(file.path()) {
        Err(TimeboxError::UnknownCategory(name)) => assert_eq!(name, "delete"),
        other => panic!("expected UnknownCategory, got {other:?}"),
    }
}

#[test]
fn zero_preset_timeout_returns_config_error() {
    let file = write_config(
        r#"
[preset.auth]
timeout_ms = 0
"#,
    );

    match load_and_validate(file.path()) {
        Err(TimeboxError::ConfigError(msg)) => {
            assert!(msg.contains("preset.auth"));
            assert!(msg.contains(">= 1"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn bad_warn_policy_is_a_toml_error() {
    let file = write_config(
        r#"
[supervisor]
warn_policy = "sometimes"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TimeboxError::TomlError(_))
    ));
}

#[test]
fn builder_rejects_empty_default_message() {
    let res = ConfigFileBuilder::new().default_message("   ").try_build();
    assert!(matches!(res, Err(TimeboxError::ConfigError(_))));
}
