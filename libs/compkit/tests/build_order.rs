//! Dependency-ordered build scenarios.

mod common;

use common::{calls, journal, position, TestComponent};
use compkit::{ComponentError, LifecycleState, Manager};

#[test]
fn build_all_respects_dependencies() {
    let j = journal();
    let mut m = Manager::default();
    // Registered leaf last on purpose.
    m.add_components([
        TestComponent::new("api", &["db", "cache"], &j).arc(),
        TestComponent::new("cache", &["db"], &j).arc(),
        TestComponent::new("db", &[], &j).arc(),
    ])
    .unwrap();

    m.build_all().unwrap();

    let order = m.build_order();
    assert_eq!(order.len(), 3);
    assert_eq!(order, vec!["db", "cache", "api"]);

    m.close_all();
    assert_eq!(calls(&j, "close"), vec!["api", "cache", "db"]);
}

#[test]
fn dependency_built_before_dependent_hook_runs() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("a", &["b"], &j).arc(),
        TestComponent::new("b", &["c"], &j).arc(),
        TestComponent::new("c", &[], &j).arc(),
        TestComponent::new("x", &[], &j).arc(),
        TestComponent::new("y", &["c"], &j).arc(),
    ])
    .unwrap();

    // TestComponent::build fails if a dependency is not built yet.
    m.build_all().unwrap();

    let built = calls(&j, "build");
    assert_eq!(built.len(), 5);
    assert!(position(&built, "c") < position(&built, "b"));
    assert!(position(&built, "b") < position(&built, "a"));
    assert!(position(&built, "c") < position(&built, "y"));
    for category in ["a", "b", "c", "x", "y"] {
        assert_eq!(m.state(category), Some(LifecycleState::Built));
    }
}

#[test]
fn each_component_built_exactly_once() {
    let j = journal();
    let mut m = Manager::default();
    // Diamond: "shared" is reachable through two paths.
    m.add_components([
        TestComponent::new("top", &["left", "right"], &j).arc(),
        TestComponent::new("left", &["shared"], &j).arc(),
        TestComponent::new("right", &["shared"], &j).arc(),
        TestComponent::new("shared", &[], &j).arc(),
    ])
    .unwrap();

    m.build_all().unwrap();
    m.build_all().unwrap();
    m.build_one("top").unwrap();

    let built = calls(&j, "build");
    assert_eq!(built.len(), 4);
    assert_eq!(built.iter().filter(|c| *c == "shared").count(), 1);
    assert_eq!(calls(&j, "built").len(), 4);
}

#[test]
fn build_one_builds_only_the_closure() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("cache", &["db"], &j).arc(),
        TestComponent::new("db", &[], &j).arc(),
        TestComponent::new("mailer", &[], &j).arc(),
    ])
    .unwrap();

    m.build_one("cache").unwrap();
    assert_eq!(m.build_order(), vec!["db", "cache"]);
    assert_eq!(m.state("mailer"), Some(LifecycleState::Registered));

    // Second call is a no-op.
    m.build_one("cache").unwrap();
    assert_eq!(calls(&j, "build"), vec!["db", "cache"]);

    // A later full pass only builds what is left.
    m.build_all().unwrap();
    assert_eq!(m.build_order(), vec!["db", "cache", "mailer"]);
}

#[test]
fn build_one_unknown_category() {
    let mut m = Manager::default();
    match m.build_one("ghost").unwrap_err() {
        ComponentError::UnknownCategory {
            category,
            required_by,
        } => {
            assert_eq!(category, "ghost");
            assert!(required_by.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn two_component_cycle_detected() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("X", &["Y"], &j).arc(),
        TestComponent::new("Y", &["X"], &j).arc(),
    ])
    .unwrap();

    match m.build_all().unwrap_err() {
        ComponentError::CyclicDependency {
            component,
            dependency,
        } => {
            let mut named = vec![component, dependency];
            named.sort();
            assert_eq!(named, vec!["X", "Y"]);
        }
        other => panic!("expected CyclicDependency, got: {other:?}"),
    }

    assert!(calls(&j, "build").is_empty());
    assert_eq!(m.state("X"), Some(LifecycleState::Registered));
    assert_eq!(m.state("Y"), Some(LifecycleState::Registered));
    assert!(m.build_order().is_empty());
}

#[test]
fn longer_cycle_and_self_reference_detected() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("a", &["b"], &j).arc(),
        TestComponent::new("b", &["c"], &j).arc(),
        TestComponent::new("c", &["a"], &j).arc(),
    ])
    .unwrap();
    let err = m.build_one("a").unwrap_err();
    assert!(matches!(err, ComponentError::CyclicDependency { .. }));
    assert!(err.to_string().contains("interdependent"));
    assert!(calls(&j, "build").is_empty());

    let mut m = Manager::default();
    m.add_component(TestComponent::new("me", &["me"], &j).arc())
        .unwrap();
    match m.build_all().unwrap_err() {
        ComponentError::CyclicDependency {
            component,
            dependency,
        } => {
            assert_eq!(component, "me");
            assert_eq!(dependency, "me");
        }
        other => panic!("expected CyclicDependency, got: {other:?}"),
    }
}

#[test]
fn unknown_dependency_builds_nothing_from_that_branch() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("api", &["db", "missing"], &j).arc(),
        TestComponent::new("db", &[], &j).arc(),
    ])
    .unwrap();

    match m.build_one("api").unwrap_err() {
        ComponentError::UnknownCategory {
            category,
            required_by,
        } => {
            assert_eq!(category, "missing");
            assert_eq!(required_by.as_deref(), Some("api"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(calls(&j, "build").is_empty());
    assert!(m.build_order().is_empty());
}

#[test]
fn build_failure_aborts_pass_and_keeps_earlier_builds() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("db", &[], &j).arc(),
        TestComponent::new("cache", &["db"], &j)
            .failing_build()
            .arc(),
        TestComponent::new("api", &["cache"], &j).arc(),
    ])
    .unwrap();

    let err = m.build_one("api").unwrap_err();
    match &err {
        ComponentError::BuildFailed { component, source } => {
            assert_eq!(component, "cache");
            assert!(source.to_string().contains("build refused"));
        }
        other => panic!("expected BuildFailed, got: {other:?}"),
    }

    assert_eq!(m.build_order(), vec!["db"]);
    assert_eq!(m.state("cache"), Some(LifecycleState::Registered));
    assert_eq!(m.state("api"), Some(LifecycleState::Registered));

    // Only what finished building is closed.
    m.close_all();
    assert_eq!(calls(&j, "close"), vec!["db"]);
}

#[test]
fn build_all_failure_stops_the_whole_pass() {
    let j = journal();
    let mut m = Manager::default();
    m.add_components([
        TestComponent::new("a", &["bad"], &j).arc(),
        TestComponent::new("b", &["bad"], &j).arc(),
        TestComponent::new("c", &["a", "b"], &j).arc(),
        TestComponent::new("bad", &[], &j).failing_build().arc(),
    ])
    .unwrap();

    match &m.build_all().unwrap_err() {
        ComponentError::BuildFailed { component, .. } => assert_eq!(component, "bad"),
        other => panic!("expected BuildFailed, got: {other:?}"),
    }

    // Every component needs "bad", so nothing else reached its build hook.
    assert_eq!(calls(&j, "build"), vec!["bad"]);
    assert!(m.build_order().is_empty());
    for category in ["a", "b", "c", "bad"] {
        assert_eq!(m.state(category), Some(LifecycleState::Registered));
    }

    m.close_all();
    assert!(calls(&j, "close").is_empty());
}

#[test]
fn dependencies_computed_at_runtime() {
    let j = journal();
    let mut m = Manager::default();

    let shards: Vec<String> = (0..3).map(|i| format!("shard-{i}")).collect();
    for shard in &shards {
        m.add_component(TestComponent::new(shard, &[], &j).arc())
            .unwrap();
    }
    let wanted: Vec<&str> = shards.iter().map(String::as_str).collect();
    m.add_component(TestComponent::new("router", &wanted, &j).arc())
        .unwrap();
    drop(wanted);
    drop(shards);

    m.build_all().unwrap();

    let order = m.build_order();
    let router = position(&order, "router");
    for i in 0..3 {
        assert!(position(&order, &format!("shard-{i}")) < router);
    }
}
