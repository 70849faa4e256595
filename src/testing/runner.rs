//! Sequential test runner.
//!
//! A [`TestRunner`] takes an ordered list of target identifiers and drives them to one terminal outcome:
//!
//! 1. every identifier is validated before anything is resolved
//! 2. targets are resolved and run one at a time, in list order
//! 3. each target gets a single subject instance; its `test_` methods run in declaration order, each one
//!    awaited (and its pending work drained) before the next starts
//! 4. the first failure of any kind stops the run
//!
//! There is no fan-out and no cancellation. Given the same targets the runner always invokes the same
//! methods in the same order.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::FutureExt;

use super::config::RunnerConfig;
use super::error::{ConfigurationError, FailureCause, RunFailure, panic_message};
use super::registry::TargetResolver;
use super::reporter::{RunReporter, TracingReporter};
use super::subject::{SubjectInstance, TestOutcome};

/// Only methods whose name starts with this prefix are run by [`TestRunner`].
pub const TEST_METHOD_PREFIX: &str = "test_";

/// Check a target identifier: non-empty, made of ASCII letters, digits, `_`, `-` and `/` only.
pub fn validate_target(target: &str) -> Result<(), ConfigurationError> {
    let valid = !target.is_empty()
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/'));
    if valid {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidTarget {
            target: target.to_string(),
        })
    }
}

/// What a successful run did. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Targets resolved and completed, empty ones included
    pub targets: usize,
    /// Targets without a single `test_` method
    pub empty_targets: usize,
    pub methods_passed: usize,
    pub elapsed: Duration,
}

/// Runs test targets in order and stops at the first failure.
pub struct TestRunner<'r> {
    targets: Vec<String>,
    resolver: &'r dyn TargetResolver,
    config: RunnerConfig,
    reporter: Box<dyn RunReporter + 'r>,
}

impl<'r> TestRunner<'r> {
    pub fn new<I, T>(targets: I, resolver: &'r dyn TargetResolver) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            resolver,
            config: RunnerConfig::default(),
            reporter: Box::new(TracingReporter),
        }
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default [`TracingReporter`].
    pub fn with_reporter(mut self, reporter: impl RunReporter + 'r) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every target. Settles exactly once: with a summary when all targets pass, otherwise with the first
    /// failure.
    #[tracing::instrument(name = "test_run", skip_all, fields(targets = self.targets.len()))]
    pub async fn run(self) -> Result<RunSummary, RunFailure> {
        let TestRunner {
            targets,
            resolver,
            config,
            mut reporter,
        } = self;

        reporter.on_run_start(&targets);
        let outcome = execute(&targets, resolver, &config, reporter.as_mut()).await;
        match &outcome {
            Ok(summary) => reporter.on_run_complete(summary),
            Err(failure) => reporter.on_run_failed(failure),
        }
        outcome
    }
}

async fn execute(
    targets: &[String],
    resolver: &dyn TargetResolver,
    config: &RunnerConfig,
    reporter: &mut dyn RunReporter,
) -> Result<RunSummary, RunFailure> {
    let started = Instant::now();

    // Nothing is resolved until every identifier is known to be well formed
    for target in targets {
        validate_target(target).map_err(|source| RunFailure::Configuration {
            target: target.clone(),
            source,
        })?;
    }

    let mut summary = RunSummary::default();
    for target in targets {
        reporter.on_target_start(target);
        let class = resolver
            .resolve(target)
            .await
            .map_err(|source| RunFailure::Resolution {
                target: target.clone(),
                source,
            })?;

        let methods: Vec<&'static str> = class
            .method_names()
            .into_iter()
            .filter(|name| name.starts_with(TEST_METHOD_PREFIX))
            .collect();

        summary.targets += 1;
        if methods.is_empty() {
            reporter.on_target_empty(target);
            reporter.on_target_passed(target, 0);
            summary.empty_targets += 1;
            continue;
        }

        let mut instance = class.instantiate();
        for method in &methods {
            reporter.on_method_start(target, method);
            let method_started = Instant::now();
            run_method(instance.as_mut(), method, config)
                .await
                .map_err(|cause| RunFailure::Method {
                    target: target.clone(),
                    method: method.to_string(),
                    cause,
                })?;
            reporter.on_method_passed(target, method, method_started.elapsed());
            summary.methods_passed += 1;
        }
        reporter.on_target_passed(target, methods.len());
    }

    summary.elapsed = started.elapsed();
    Ok(summary)
}

/// Invoke one method and wait for its completion signal, then for any work it left pending.
async fn run_method(instance: &mut dyn SubjectInstance, method: &str, config: &RunnerConfig) -> TestOutcome {
    let invocation = instance
        .invoke(method)
        .ok_or_else(|| FailureCause::Unhandled(format!("{method} is not a method of this subject")))?;

    let guarded = AssertUnwindSafe(invocation).catch_unwind().map(settle);

    match config.method_timeout {
        Some(limit) => tokio::time::timeout(limit, guarded)
            .await
            .unwrap_or_else(|_| Err(FailureCause::Timeout(limit)))?,
        None => guarded.await?,
    }

    let case = instance.test_case();
    if config.drain_pending_work {
        // Pending work is test logic too; a panic there fails the method
        AssertUnwindSafe(case.await_pending(config.pending_timeout))
            .catch_unwind()
            .map(settle)
            .await
    } else {
        let discarded = case.take_pending().len();
        if discarded > 0 {
            tracing::debug!(method, discarded, "discarding pending work");
        }
        Ok(())
    }
}

fn settle(caught: Result<TestOutcome, Box<dyn Any + Send>>) -> TestOutcome {
    caught.unwrap_or_else(|payload| Err(FailureCause::Panic(panic_message(payload.as_ref()))))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::future::LocalBoxFuture;

    use super::*;
    use crate::testing::error::ResolutionError;
    use crate::testing::registry::SuiteRegistry;
    use crate::testing::subject::SubjectClass;

    #[test]
    fn test_validate_target_accepts_path_like_identifiers() {
        for target in ["plur-tests/unit/plur/UnitTest", "a", "A_b-9/c", "///"] {
            assert!(validate_target(target).is_ok(), "{target}");
        }
    }

    #[test]
    fn test_validate_target_rejects_other_characters() {
        for target in ["", "has space", "dotted.path", "../escape", "tab\t", "ünï"] {
            assert_eq!(
                validate_target(target),
                Err(ConfigurationError::InvalidTarget {
                    target: target.to_string()
                }),
                "{target:?}"
            );
        }
    }

    /// Counts every resolve attempt.
    struct Spy<'a> {
        inner: SuiteRegistry,
        resolved: &'a RefCell<Vec<String>>,
    }

    impl TargetResolver for Spy<'_> {
        fn resolve<'a>(&'a self, target: &'a str) -> LocalBoxFuture<'a, Result<Box<dyn SubjectClass>, ResolutionError>> {
            self.resolved.borrow_mut().push(target.to_string());
            self.inner.resolve(target)
        }
    }

    #[tokio::test]
    async fn test_empty_target_list_resolves_immediately() {
        let registry = SuiteRegistry::new();
        let summary = TestRunner::new(Vec::<String>::new(), &registry).run().await.unwrap();
        assert_eq!(summary.targets, 0);
        assert_eq!(summary.methods_passed, 0);
    }

    #[tokio::test]
    async fn test_invalid_target_rejected_before_any_resolution() {
        let resolved = RefCell::new(Vec::new());
        let spy = Spy {
            inner: SuiteRegistry::new(),
            resolved: &resolved,
        };
        let failure = TestRunner::new(["fine/target", "not.fine"], &spy)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(failure, RunFailure::Configuration { ref target, .. } if target == "not.fine"));
        assert!(resolved.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_target_is_a_resolution_failure() {
        let registry = SuiteRegistry::new();
        let failure = TestRunner::new(["missing/Suite"], &registry).run().await.unwrap_err();
        assert!(matches!(
            failure,
            RunFailure::Resolution {
                source: ResolutionError::NotFound { .. },
                ..
            }
        ));
        assert_eq!(failure.target(), "missing/Suite");
    }

    #[tokio::test]
    async fn test_loader_error_is_a_resolution_failure() {
        let mut registry = SuiteRegistry::new();
        registry.register_loader("broken/Suite", || async {
            Err::<Box<dyn SubjectClass>, _>("syntax error in module")
        });

        match TestRunner::new(["broken/Suite"], &registry).run().await.unwrap_err() {
            RunFailure::Resolution {
                source: ResolutionError::Load { reason, .. },
                ..
            } => assert_eq!(reason, "syntax error in module"),
            other => panic!("expected a load failure, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct Recording {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl RunReporter for Recording {
        fn on_target_start(&mut self, target: &str) {
            self.events.borrow_mut().push(format!("start {target}"));
        }
        fn on_target_empty(&mut self, target: &str) {
            self.events.borrow_mut().push(format!("empty {target}"));
        }
        fn on_method_passed(&mut self, _target: &str, method: &str, _elapsed: Duration) {
            self.events.borrow_mut().push(format!("pass {method}"));
        }
        fn on_target_passed(&mut self, target: &str, methods: usize) {
            self.events.borrow_mut().push(format!("done {target} {methods}"));
        }
        fn on_run_failed(&mut self, failure: &RunFailure) {
            self.events.borrow_mut().push(format!("failed {}", failure.target()));
        }
    }

    #[tokio::test]
    async fn test_target_start_precedes_resolution_failure() {
        let registry = SuiteRegistry::new();
        let reporter = Recording::default();
        let events = Rc::clone(&reporter.events);

        let failure = TestRunner::new(["missing/Suite"], &registry)
            .with_reporter(reporter)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(failure, RunFailure::Resolution { .. }));
        assert_eq!(*events.borrow(), vec!["start missing/Suite", "failed missing/Suite"]);
    }

    #[tokio::test]
    async fn test_reporter_sees_empty_target_as_passed() {
        use crate::testing::case::TestCase;
        use crate::testing::subject::{TestMethod, TestMethods, TestSubject};
        use plur_derive::Plurified;

        #[derive(Plurified)]
        #[plur(namepath = "runner/Empty")]
        struct Empty {
            case: TestCase,
        }

        impl TestMethods for Empty {
            fn methods() -> Vec<TestMethod<Self>> {
                Vec::new()
            }
        }

        impl TestSubject for Empty {
            fn create() -> Self {
                Self {
                    case: TestCase::for_subject::<Self>(),
                }
            }
            fn case(&mut self) -> &mut TestCase {
                &mut self.case
            }
        }

        let mut registry = SuiteRegistry::new();
        registry.register::<Empty>("runner/Empty");
        let reporter = Recording::default();
        let events = Rc::clone(&reporter.events);

        let summary = TestRunner::new(["runner/Empty"], &registry)
            .with_reporter(reporter)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.empty_targets, 1);
        assert_eq!(
            *events.borrow(),
            vec!["start runner/Empty", "empty runner/Empty", "done runner/Empty 0"]
        );
    }
}
