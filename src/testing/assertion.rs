//! The single typed assertion failure raised by [`TestCase`](super::TestCase) primitives.

use std::fmt;

/// Result of an assertion primitive.
pub type AssertResult<T = ()> = Result<T, AssertionFailure>;

pub(crate) const ASSERTION_FAILED: &str = "Assertion failed";
pub(crate) const NOT_STRICTLY_EQUAL: &str = "Values are not strictly equal";

/// Structured data attached to an [`AssertionFailure`].
#[derive(Debug, Clone, PartialEq)]
pub enum FailurePayload {
    None,
    /// `assert` saw a falsy condition.
    Condition { observed: bool },
    /// `assert_truthy` saw a falsy value.
    Falsy { observed: String },
    /// Strict equality failed.
    Mismatch { expected: String, actual: String },
    /// A property check failed before values could be compared.
    Property {
        property: String,
        expected: String,
        actual: String,
    },
    /// The callback under `assert_try` raised.
    Cause(String),
    /// Free-form data passed to `fail`.
    Data(serde_json::Value),
}

/// A failed assertion: a human message plus a structured payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionFailure {
    pub message: String,
    pub payload: FailurePayload,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: FailurePayload::None,
        }
    }

    pub fn with_payload(mut self, payload: FailurePayload) -> Self {
        self.payload = payload;
        self
    }

    pub(crate) fn mismatch(message: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(message).with_payload(FailurePayload::Mismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// `(expected, actual)` when this failure came from a strict-equality check.
    pub fn expected_actual(&self) -> Option<(&str, &str)> {
        match &self.payload {
            FailurePayload::Mismatch { expected, actual } => Some((expected.as_str(), actual.as_str())),
            _ => None,
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        match &self.payload {
            FailurePayload::None => Ok(()),
            FailurePayload::Condition { observed } => write!(f, " (observed: {observed})"),
            FailurePayload::Falsy { observed } => write!(f, " (observed: {observed})"),
            FailurePayload::Mismatch { expected, actual } => {
                write!(f, " (expected: {expected}, actual: {actual})")
            }
            FailurePayload::Property {
                property,
                expected,
                actual,
            } => write!(f, " (property: {property}, expected: {expected}, actual: {actual})"),
            FailurePayload::Cause(cause) => write!(f, " (cause: {cause})"),
            FailurePayload::Data(data) => write!(f, " (data: {data})"),
        }
    }
}

impl std::error::Error for AssertionFailure {}

/// Use the caller's message, or `default` when it is empty.
pub(crate) fn message_or<'a>(message: &'a str, default: &'a str) -> &'a str {
    if message.is_empty() { default } else { message }
}
