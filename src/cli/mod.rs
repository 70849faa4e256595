//! CLI module for plur
//!
//! This module provides the `plur` command-line interface.
//!
//! ## Commands
//!
//! - `test [TARGET...]` - Run test suites in order, stopping at the first failure
//! - `list` - List the registered test suites
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::process;

use clap::{Parser, Subcommand};

use crate::suites::default_registry;
use crate::version::PLUR_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Plurified objects and a sequential async test runner
#[derive(Parser, Debug)]
#[command(name = "plur")]
#[command(version = PLUR_VERSION)]
#[command(about = "Plurified objects and a sequential async test runner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run test suites in order, stopping at the first failure
    Test {
        /// Suites to run (default: every registered suite)
        #[arg(value_name = "TARGET")]
        targets: Vec<String>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Fail a test method that has not settled after this many milliseconds
        #[arg(long = "timeout-ms", value_name = "MS")]
        timeout_ms: Option<u64>,
        /// Do not wait for pending work registered by test methods
        #[arg(long = "no-pending")]
        no_pending: bool,
    },

    /// List registered test suites
    List,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let registry = default_registry();
    match cli.command {
        Command::Test {
            targets,
            verbose,
            timeout_ms,
            no_pending,
        } => commands::run_tests(
            &registry,
            &commands::TestOptions {
                targets,
                verbose,
                timeout_ms,
                no_pending,
            },
        ),
        Command::List => commands::list_suites(&registry),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_test_defaults() {
        let cli = Cli::try_parse_from(["plur", "test"]).unwrap();
        if let Command::Test {
            targets,
            verbose,
            timeout_ms,
            no_pending,
        } = cli.command
        {
            assert!(targets.is_empty());
            assert!(!verbose);
            assert_eq!(timeout_ms, None);
            assert!(!no_pending);
        } else {
            panic!("Expected Test command");
        }
    }

    #[test]
    fn test_cli_parse_test_with_flags() {
        let cli = Cli::try_parse_from([
            "plur",
            "test",
            "plur-tests/unit/plur/UnitTest",
            "plur-tests/unit/plur/ObjectTest",
            "-v",
            "--timeout-ms",
            "1500",
            "--no-pending",
        ])
        .unwrap();
        if let Command::Test {
            targets,
            verbose,
            timeout_ms,
            no_pending,
        } = cli.command
        {
            assert_eq!(targets, ["plur-tests/unit/plur/UnitTest", "plur-tests/unit/plur/ObjectTest"]);
            assert!(verbose);
            assert_eq!(timeout_ms, Some(1500));
            assert!(no_pending);
        } else {
            panic!("Expected Test command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["plur", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_cli_rejects_bad_timeout() {
        assert!(Cli::try_parse_from(["plur", "test", "--timeout-ms", "soon"]).is_err());
    }

    #[test]
    fn test_execute_rejects_invalid_target() {
        let cli = Cli::try_parse_from(["plur", "test", "not a target"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
