// tests/config_loading.rs

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use taskline::config::load_and_validate;
use taskline::errors::TasklineError;
use taskline::registry::Registry;
use taskline::report::CollectingReporter;
use taskline::types::ProgressMode;
use taskline_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_tasks_in_file_order() {
    let file = write_config(
        r#"
[config]
progress = "never"

[[task]]
name = "zeta"
cmd = "echo zeta"

[[task]]
name = "alpha"
before = "echo before"
cmd = "echo alpha"
after = "echo after"
deps = ["zeta"]

[[task]]
name = "mid"
cmd = "echo mid"
dependencies = ["alpha", "zeta"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.config.progress, ProgressMode::Never);
    assert_eq!(cfg.labels().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    assert_eq!(cfg.task[1].before.as_deref(), Some("echo before"));
    assert_eq!(cfg.task[2].deps, vec!["alpha", "zeta"]);

    let registry =
        Registry::with_reporter(cfg.definitions(), Arc::new(CollectingReporter::new())).unwrap();
    assert_eq!(registry.labels(), vec!["zeta", "alpha", "mid"]);
    let alpha = registry.get("alpha").unwrap();
    assert!(alpha.has_before());
    assert!(alpha.has_after());
    assert_eq!(alpha.dependencies(), ["zeta".to_string()]);
}

#[test]
fn progress_defaults_to_auto() {
    let file = write_config(
        r#"
[[task]]
name = "only"
cmd = "true"
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.progress, ProgressMode::Auto);
}

#[test]
fn empty_config_is_rejected() {
    let file = write_config("[config]\nprogress = \"auto\"\n");
    match load_and_validate(file.path()) {
        Err(TasklineError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_dependency_returns_config_error() {
    let file = write_config(
        r#"
[[task]]
name = "A"
cmd = "echo A"
deps = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TasklineError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("a", "echo 1").build())
        .with_task(TaskConfigBuilder::new("a", "echo 2").build())
        .build_raw();

    match taskline::config::ConfigFile::try_from(raw) {
        Err(TasklineError::ConfigError(msg)) => assert!(msg.contains("more than once")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn blank_commands_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("a", "echo 1").after("  ").build())
        .build_raw();

    match taskline::config::ConfigFile::try_from(raw) {
        Err(TasklineError::ConfigError(msg)) => assert!(msg.contains("empty `after`")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn forward_reference_is_caught_by_the_registry() {
    let cfg = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("test", "echo test").dep("build").build())
        .with_task(TaskConfigBuilder::new("build", "echo build").build())
        .build();

    let result = Registry::with_reporter(cfg.definitions(), Arc::new(CollectingReporter::new()));
    match result {
        Err(TasklineError::DependencyOrder { task, dependency }) => {
            assert_eq!(task, "test");
            assert_eq!(dependency, "build");
        }
        Err(e) => panic!("expected DependencyOrder, got {e:?}"),
        Ok(_) => panic!("expected an error"),
    }
}

#[test]
fn unknown_fields_are_a_toml_error() {
    let file = write_config(
        r#"
[[task]]
name = "a"
cmd = "echo a"
command = "typo"
"#,
    );
    assert!(matches!(
        load_and_validate(file.path()),
        Err(TasklineError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Taskline.toml");
    assert!(matches!(
        load_and_validate(&path),
        Err(TasklineError::IoError(_))
    ));
}
