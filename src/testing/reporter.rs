//! Run reporting.
//!
//! The runner never prints. Everything it has to say goes through a [`RunReporter`], which keeps execution
//! apart from presentation:
//!
//! - [`TracingReporter`] (default) turns each hook into a `tracing` event with structured fields
//! - [`ConsoleReporter`] writes colored progress to stderr for the `plur test` command
//!
//! Reporting is informational only; no hook can change the outcome of a run.

use std::time::Duration;

use super::error::RunFailure;
use super::runner::RunSummary;

/// Receives progress from a [`TestRunner`](super::TestRunner).
pub trait RunReporter {
    /// Called once, before the first target is validated
    fn on_run_start(&mut self, _targets: &[String]) {}

    /// Called when a target is about to be resolved, before any of its methods run
    fn on_target_start(&mut self, target: &str);

    /// Called when a target has no `test_` methods
    fn on_target_empty(&mut self, target: &str);

    /// Called right before a method is invoked
    fn on_method_start(&mut self, _target: &str, _method: &str) {}

    /// Called when a method's completion signal settled successfully
    fn on_method_passed(&mut self, target: &str, method: &str, elapsed: Duration);

    /// Called when every method of a target passed
    fn on_target_passed(&mut self, target: &str, methods: usize);

    /// Called with the failure that stopped the run
    fn on_run_failed(&mut self, failure: &RunFailure);

    /// Called when every target passed
    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

impl<R: RunReporter + ?Sized> RunReporter for &mut R {
    fn on_run_start(&mut self, targets: &[String]) {
        (**self).on_run_start(targets);
    }

    fn on_target_start(&mut self, target: &str) {
        (**self).on_target_start(target);
    }

    fn on_target_empty(&mut self, target: &str) {
        (**self).on_target_empty(target);
    }

    fn on_method_start(&mut self, target: &str, method: &str) {
        (**self).on_method_start(target, method);
    }

    fn on_method_passed(&mut self, target: &str, method: &str, elapsed: Duration) {
        (**self).on_method_passed(target, method, elapsed);
    }

    fn on_target_passed(&mut self, target: &str, methods: usize) {
        (**self).on_target_passed(target, methods);
    }

    fn on_run_failed(&mut self, failure: &RunFailure) {
        (**self).on_run_failed(failure);
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        (**self).on_run_complete(summary);
    }
}

/// Reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn on_run_start(&mut self, targets: &[String]) {
        tracing::debug!(targets = targets.len(), "starting test run");
    }

    fn on_target_start(&mut self, target: &str) {
        tracing::info!(target_id = target, "Beginning test");
    }

    fn on_target_empty(&mut self, target: &str) {
        tracing::warn!(target_id = target, "No test methods found");
    }

    fn on_method_start(&mut self, target: &str, method: &str) {
        tracing::debug!(target_id = target, method, "running");
    }

    fn on_method_passed(&mut self, target: &str, method: &str, elapsed: Duration) {
        tracing::info!(
            target_id = target,
            method,
            elapsed_ms = elapsed.as_millis() as u64,
            "Test passed"
        );
    }

    fn on_target_passed(&mut self, target: &str, methods: usize) {
        tracing::info!(target_id = target, methods, "Target fully tested");
    }

    fn on_run_failed(&mut self, failure: &RunFailure) {
        match failure.method() {
            Some(method) => tracing::error!(target_id = failure.target(), method, error = %failure, "Test failed"),
            None => tracing::error!(target_id = failure.target(), error = %failure, "Test run failed"),
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        tracing::info!(
            targets = summary.targets,
            methods_passed = summary.methods_passed,
            empty_targets = summary.empty_targets,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "All tests passed"
        );
    }
}

/// Colored terminal reporter
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RunReporter for ConsoleReporter {
    fn on_target_start(&mut self, target: &str) {
        if self.verbose {
            eprintln!("\x1b[1m{target}\x1b[0m");
        } else {
            eprint!("{target} ");
        }
    }

    fn on_target_empty(&mut self, target: &str) {
        if self.verbose {
            eprintln!("  \x1b[33mno test methods\x1b[0m");
        } else {
            eprint!("\x1b[33m(empty)\x1b[0m");
        }
        tracing::debug!(target_id = target, "empty target");
    }

    fn on_method_start(&mut self, _target: &str, method: &str) {
        if self.verbose {
            eprint!("  {method} ... ");
        }
    }

    fn on_method_passed(&mut self, _target: &str, _method: &str, elapsed: Duration) {
        if self.verbose {
            eprintln!("\x1b[32mPASSED\x1b[0m ({}ms)", elapsed.as_millis());
        } else {
            eprint!("\x1b[32m.\x1b[0m");
        }
    }

    fn on_target_passed(&mut self, _target: &str, _methods: usize) {
        if !self.verbose {
            eprintln!();
        }
    }

    fn on_run_failed(&mut self, failure: &RunFailure) {
        if self.verbose {
            if failure.method().is_some() {
                eprintln!("\x1b[31mFAILED\x1b[0m");
            }
        } else {
            eprintln!("\x1b[31mF\x1b[0m");
        }
        eprintln!();
        match (failure.method(), failure.cause()) {
            (Some(method), Some(cause)) => {
                eprintln!("\x1b[31m{}: {method}()\x1b[0m", failure.target());
                eprintln!("{cause}");
            }
            _ => eprintln!("\x1b[31m{failure}\x1b[0m"),
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        eprintln!();
        let mut parts = vec![format!("\x1b[32m{} passed\x1b[0m", summary.methods_passed)];
        if summary.empty_targets > 0 {
            parts.push(format!("\x1b[33m{} empty\x1b[0m", summary.empty_targets));
        }
        eprintln!(
            "====== {} across {} targets in {:.2}s ======",
            parts.join(", "),
            summary.targets,
            summary.elapsed.as_secs_f64()
        );
    }
}
