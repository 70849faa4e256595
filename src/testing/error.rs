//! Failure taxonomy for test runs.
//!
//! A run rejects with exactly one [`RunFailure`]. Method failures keep their [`FailureCause`] verbatim so the
//! caller can tell an assertion apart from an unhandled error, a panic or a timeout, even though the runner
//! treats them all the same way (abort the run).

use std::any::Any;
use std::time::Duration;

use miette::Diagnostic;
use plur_core::PlurError;
use thiserror::Error;

use super::assertion::AssertionFailure;

/// A malformed run configuration, detected before any target is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid test target {target:?}")]
    InvalidTarget { target: String },
}

/// A target identifier that could not be turned into a test subject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no test subject registered as {target}")]
    NotFound { target: String },

    #[error("failed to load {target}: {reason}")]
    Load { target: String, reason: String },
}

/// Why a single test method failed.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error("unhandled error: {0}")]
    Unhandled(String),

    #[error("panicked: {0}")]
    Panic(String),

    #[error("timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
}

impl FailureCause {
    pub fn unhandled(err: impl std::fmt::Display) -> Self {
        FailureCause::Unhandled(err.to_string())
    }

    pub fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            FailureCause::Assertion(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<PlurError> for FailureCause {
    fn from(err: PlurError) -> Self {
        FailureCause::unhandled(err)
    }
}

impl From<std::io::Error> for FailureCause {
    fn from(err: std::io::Error) -> Self {
        FailureCause::unhandled(err)
    }
}

/// The terminal outcome of a rejected run.
#[derive(Debug, Error, Diagnostic)]
pub enum RunFailure {
    #[error("invalid test target: {target:?}")]
    #[diagnostic(
        code(plur::test::invalid_target),
        help("test targets may only contain ASCII letters, digits, '_', '-' and '/'")
    )]
    Configuration {
        target: String,
        #[source]
        source: ConfigurationError,
    },

    #[error("test target {target} could not be resolved")]
    #[diagnostic(code(plur::test::resolution), help("is the suite registered under this identifier?"))]
    Resolution {
        target: String,
        #[source]
        source: ResolutionError,
    },

    #[error("test failed: {target}: {method}()")]
    #[diagnostic(code(plur::test::method_failed))]
    Method {
        target: String,
        method: String,
        #[source]
        cause: FailureCause,
    },
}

impl RunFailure {
    /// Identifier of the target that stopped the run.
    pub fn target(&self) -> &str {
        match self {
            RunFailure::Configuration { target, .. }
            | RunFailure::Resolution { target, .. }
            | RunFailure::Method { target, .. } => target,
        }
    }

    /// The failing method, when the failure happened inside one.
    pub fn method(&self) -> Option<&str> {
        match self {
            RunFailure::Method { method, .. } => Some(method),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            RunFailure::Method { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
