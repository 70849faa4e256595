//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::time::Duration;

use crate::testing::{ConsoleReporter, RunnerConfig, SuiteRegistry, TestRunner};

use super::{CliError, CliResult, ExitCode};

/// Options for `plur test`, already mapped from flags.
#[derive(Debug, Clone, Default)]
pub struct TestOptions {
    /// Targets to run; empty means every registered suite
    pub targets: Vec<String>,
    pub verbose: bool,
    pub timeout_ms: Option<u64>,
    pub no_pending: bool,
}

impl TestOptions {
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::default()
            .with_method_timeout(self.timeout_ms.map(Duration::from_millis))
            .with_pending_work(!self.no_pending)
    }
}

/// Run the selected suites of `registry` on a current-thread runtime.
pub fn run_tests(registry: &SuiteRegistry, options: &TestOptions) -> CliResult<ExitCode> {
    let targets: Vec<String> = if options.targets.is_empty() {
        registry.identifiers().into_iter().map(str::to_string).collect()
    } else {
        options.targets.clone()
    };
    tracing::debug!(targets = targets.len(), "selected test targets");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {e}")))?;

    let runner = TestRunner::new(targets, registry)
        .with_config(options.runner_config())
        .with_reporter(ConsoleReporter::new(options.verbose));

    match runtime.block_on(runner.run()) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(failure) => Err(CliError::failure(format!("{:?}", miette::Report::new(failure)))),
    }
}

/// Print every registered target, one per line.
pub fn list_suites(registry: &SuiteRegistry) -> CliResult<ExitCode> {
    if registry.is_empty() {
        return Err(CliError::failure("No test suites registered"));
    }
    for identifier in registry.identifiers() {
        println!("{identifier}");
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::suites::default_registry;

    #[test]
    fn test_options_map_onto_runner_config() {
        let options = TestOptions {
            timeout_ms: Some(250),
            no_pending: true,
            ..TestOptions::default()
        };
        let config = options.runner_config();
        assert_eq!(config.method_timeout, Some(Duration::from_millis(250)));
        assert!(!config.drain_pending_work);

        assert_eq!(TestOptions::default().runner_config(), RunnerConfig::default());
    }

    #[test]
    fn test_run_tests_passes_builtin_suites() {
        let exit = run_tests(&default_registry(), &TestOptions::default()).unwrap();
        assert_eq!(exit, ExitCode::SUCCESS);
    }

    #[test]
    fn test_run_tests_fails_on_unknown_target() {
        let options = TestOptions {
            targets: vec!["plur-tests/unit/plur/Missing".to_string()],
            ..TestOptions::default()
        };
        let err = run_tests(&default_registry(), &options).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("plur-tests/unit/plur/Missing"));
    }

    #[test]
    fn test_list_suites_rejects_empty_registry() {
        assert!(list_suites(&SuiteRegistry::new()).is_err());
        assert_eq!(list_suites(&default_registry()).unwrap(), ExitCode::SUCCESS);
    }
}
