// tests/dependency_rules.rs

use std::error::Error;
use std::sync::Arc;

use taskline::errors::TasklineError;
use taskline::registry::{Registry, TaskDefinition};
use taskline::report::{CollectingReporter, TaskEvent};
use taskline::types::TaskStatus;
use taskline_test_utils::init_tracing;
use taskline_test_utils::recorder::CallRecorder;

type TestResult = Result<(), Box<dyn Error>>;

fn collecting() -> Arc<CollectingReporter> {
    Arc::new(CollectingReporter::new())
}

#[test]
fn forward_reference_fails_whole_construction() {
    let rec = CallRecorder::new();
    let result = Registry::with_reporter(
        vec![
            ("a", rec.definition("a")),
            ("b", rec.definition("b").depends_on("c")),
            ("c", rec.definition("c")),
        ],
        collecting(),
    );

    match result {
        Err(TasklineError::DependencyOrder { task, dependency }) => {
            assert_eq!(task, "b");
            assert_eq!(dependency, "c");
        }
        Err(e) => panic!("expected DependencyOrder, got {e:?}"),
        Ok(_) => panic!("expected construction to fail"),
    }
}

#[test]
fn dependency_order_message_names_both_tasks() {
    let err = TasklineError::DependencyOrder {
        task: "b".into(),
        dependency: "c".into(),
    };
    assert_eq!(
        err.to_string(),
        "\"b\" cannot depend on \"c\" because \"b\" runs before \"c\""
    );
}

#[test]
fn self_dependency_is_rejected() {
    let rec = CallRecorder::new();
    let result = Registry::with_reporter(
        vec![("a", rec.definition("a").depends_on("a"))],
        collecting(),
    );
    assert!(matches!(
        result,
        Err(TasklineError::DependencyOrder { .. })
    ));
}

#[tokio::test]
async fn rejected_ad_hoc_task_leaves_registry_unchanged() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(vec![("a", rec.definition("a"))], collecting())?;

    let err = registry
        .run_with("late", rec.definition("late").depends_on("missing"))
        .await
        .expect_err("unknown dependency");

    assert!(matches!(err, TasklineError::DependencyOrder { .. }));
    assert_eq!(registry.labels(), vec!["a"]);
    assert!(!registry.contains("late"));
    assert!(rec.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_labels_are_errors() -> TestResult {
    init_tracing();
    let registry = Registry::with_reporter(
        Vec::<(String, TaskDefinition)>::new(),
        collecting(),
    )?;

    assert!(registry.is_empty());
    assert!(matches!(
        registry.get("nope"),
        Err(TasklineError::UnknownLabel(label)) if label == "nope"
    ));
    assert!(matches!(
        registry.run_task("nope").await,
        Err(TasklineError::UnknownLabel(_))
    ));
    Ok(())
}

#[tokio::test]
async fn not_run_error_lists_further_unmet_dependencies() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![
            ("fetch", rec.definition("fetch")),
            ("lint", rec.definition("lint")),
            ("build", rec.definition("build").dependencies(["fetch", "lint"])),
            ("test", rec.definition("test").depends_on("build")),
        ],
        collecting(),
    )?;

    let err = registry.run_task("test").await.expect_err("build never ran");

    match &err {
        TasklineError::DependencyNotRun {
            task,
            dependency,
            unmet,
        } => {
            assert_eq!(task, "test");
            assert_eq!(dependency, "build");
            assert_eq!(unmet, &vec!["fetch".to_string(), "lint".to_string()]);
        }
        other => panic!("expected DependencyNotRun, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "cannot run \"test\" before its dependency \"build\" \
         (which itself still needs \"fetch\", \"lint\")"
    );
    assert!(rec.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn unmet_search_stops_after_one_level() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![
            ("a", rec.definition("a")),
            ("b", rec.definition("b").depends_on("a")),
            ("c", rec.definition("c").depends_on("b")),
            ("d", rec.definition("d").depends_on("c")),
        ],
        collecting(),
    )?;

    match registry.run_task("d").await {
        Err(TasklineError::DependencyNotRun {
            dependency, unmet, ..
        }) => {
            assert_eq!(dependency, "c");
            assert_eq!(unmet, vec!["b"]);
        }
        other => panic!("expected DependencyNotRun, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn unmet_chain_omits_dependencies_that_already_ran() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![
            ("fetch", rec.definition("fetch")),
            ("lint", rec.definition("lint")),
            ("build", rec.definition("build").dependencies(["fetch", "lint"])),
            ("test", rec.definition("test").depends_on("build")),
        ],
        collecting(),
    )?;

    registry.run_task("fetch").await?;

    match registry.run_task("test").await {
        Err(TasklineError::DependencyNotRun { unmet, .. }) => {
            assert_eq!(unmet, vec!["lint"]);
        }
        other => panic!("expected DependencyNotRun, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn skip_propagates_down_a_chain() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let reporter = collecting();
    let registry = Registry::with_reporter(
        vec![
            ("a", rec.failing_definition("a")),
            ("b", rec.full_definition("b").depends_on("a")),
            ("c", rec.full_definition("c").depends_on("b")),
            ("d", rec.definition("d")),
        ],
        reporter.clone(),
    )?;

    let summary = registry.run().await?;

    assert_eq!(rec.calls(), vec!["a:callback", "d:callback"]);
    assert_eq!(registry.get("b")?.status(), TaskStatus::Skipped);
    assert_eq!(registry.get("c")?.status(), TaskStatus::Skipped);
    assert_eq!(summary.skipped, vec!["b", "c"]);
    assert_eq!(summary.succeeded, vec!["d"]);

    let skipped: Vec<(String, String)> = reporter
        .events()
        .into_iter()
        .filter_map(|e| match e {
            TaskEvent::Skipped { label, dependency } => Some((label, dependency)),
            _ => None,
        })
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("b".to_string(), "a".to_string()),
            ("c".to_string(), "b".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn skipped_task_is_started_before_its_skip_is_reported() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let reporter = collecting();
    let registry = Registry::with_reporter(
        vec![
            ("a", rec.failing_definition("a")),
            ("b", rec.definition("b").depends_on("a")),
        ],
        reporter.clone(),
    )?;

    registry.run().await?;

    assert_eq!(reporter.started(), vec!["a", "b"]);
    let for_b: Vec<&'static str> = reporter
        .events()
        .into_iter()
        .filter(|e| e.label() == Some("b"))
        .map(|e| match e {
            TaskEvent::Started { .. } => "started",
            TaskEvent::Skipped { .. } => "skipped",
            _ => "other",
        })
        .collect();
    assert_eq!(for_b, vec!["started", "skipped"]);
    Ok(())
}

#[tokio::test]
async fn first_unsatisfied_dependency_in_declaration_order_wins() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![
            ("broken", rec.failing_definition("broken")),
            ("pending", rec.definition("pending")),
            (
                "target",
                rec.definition("target").dependencies(["broken", "pending"]),
            ),
        ],
        collecting(),
    )?;

    registry.run_task("broken").await?;

    // `broken` is checked first and failed, so this is a skip, not an error.
    assert_eq!(registry.run_task("target").await?, TaskStatus::Skipped);

    let reversed = Registry::with_reporter(
        vec![
            ("broken", rec.failing_definition("broken")),
            ("pending", rec.definition("pending")),
            (
                "target",
                rec.definition("target").dependencies(["pending", "broken"]),
            ),
        ],
        collecting(),
    )?;
    reversed.run_task("broken").await?;

    assert!(matches!(
        reversed.run_task("target").await,
        Err(TasklineError::DependencyNotRun { dependency, .. }) if dependency == "pending"
    ));
    Ok(())
}

#[tokio::test]
async fn overwritten_label_keeps_its_position() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![("a", rec.definition("a")), ("b", rec.definition("b"))],
        collecting(),
    )?;

    registry.run_with("a", rec.definition("a2")).await?;
    assert_eq!(registry.labels(), vec!["a", "b"]);

    registry.run().await?;
    assert_eq!(rec.calls(), vec!["a2:callback", "a2:callback", "b:callback"]);
    Ok(())
}

#[tokio::test]
async fn overwrite_cannot_depend_on_a_later_label() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![("a", rec.definition("a")), ("b", rec.definition("b"))],
        collecting(),
    )?;

    // `a` keeps its first slot, so it cannot wait on `b`.
    let err = registry
        .run_with("a", rec.definition("a2").depends_on("b"))
        .await
        .expect_err("b is ordered after a");
    match err {
        TasklineError::DependencyOrder { task, dependency } => {
            assert_eq!(task, "a");
            assert_eq!(dependency, "b");
        }
        other => panic!("expected DependencyOrder, got {other:?}"),
    }

    // The original `a` is still registered and bulk runs keep working.
    for _ in 0..2 {
        let summary = registry.run().await?;
        assert_eq!(summary.succeeded, vec!["a", "b"]);
    }
    assert_eq!(
        rec.calls(),
        vec!["a:callback", "b:callback", "a:callback", "b:callback"]
    );
    assert_eq!(registry.get("b")?.status(), TaskStatus::Succeeded);
    Ok(())
}

#[tokio::test]
async fn overwrite_may_depend_on_an_earlier_label() -> TestResult {
    init_tracing();
    let rec = CallRecorder::new();
    let registry = Registry::with_reporter(
        vec![("a", rec.definition("a")), ("b", rec.definition("b"))],
        collecting(),
    )?;

    registry.run_task("a").await?;
    let status = registry
        .run_with("b", rec.definition("b2").depends_on("a"))
        .await?;

    assert_eq!(status, TaskStatus::Succeeded);
    assert_eq!(registry.labels(), vec!["a", "b"]);
    assert_eq!(rec.calls(), vec!["a:callback", "b2:callback"]);
    Ok(())
}
