//! Asynchronous unit-test engine.
//!
//! Two pieces do the work:
//!
//! - [`TestCase`]: assertion primitives, emission expectations and pending work for one subject
//! - [`TestRunner`]: resolves target identifiers, runs their `test_` methods strictly one at a time, and
//!   settles once with a [`RunSummary`] or the first [`RunFailure`]
//!
//! ## Writing a suite
//!
//! ```ignore
//! use plur::testing::{AssertResult, TestCase, TestSubject};
//! use plur::{Plurified, test_suite};
//!
//! #[derive(Plurified)]
//! #[plur(namepath = "plur-tests/unit/plur/UnitTest", extends = TestCase)]
//! struct UnitTest {
//!     case: TestCase,
//! }
//!
//! #[test_suite]
//! impl UnitTest {
//!     fn test_math(&mut self) -> AssertResult {
//!         self.case.assert_equals(1 + 1, 2, "")
//!     }
//! }
//!
//! impl TestSubject for UnitTest {
//!     fn create() -> Self {
//!         Self { case: TestCase::for_subject::<Self>() }
//!     }
//!     fn case(&mut self) -> &mut TestCase {
//!         &mut self.case
//!     }
//! }
//! ```
//!
//! Register it in a [`SuiteRegistry`] and hand that to a [`TestRunner`].

pub mod assertion;
pub mod case;
pub mod config;
pub mod emitter;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod runner;
pub mod subject;

pub use futures::future::LocalBoxFuture;

pub use assertion::{AssertResult, AssertionFailure, FailurePayload};
pub use case::{Constructor, CreationSpec, DEFAULT_SLEEP, TestCase};
pub use config::{DEFAULT_PENDING_TIMEOUT, RunnerConfig};
pub use emitter::{Emitter, Event, SubscriptionId};
pub use error::{ConfigurationError, FailureCause, ResolutionError, RunFailure};
pub use registry::{SuiteRegistry, TargetResolver};
pub use reporter::{ConsoleReporter, RunReporter, TracingReporter};
pub use runner::{RunSummary, TEST_METHOD_PREFIX, TestRunner, validate_target};
pub use subject::{
    IntoTestOutcome, MethodFn, SubjectClass, SubjectHandle, SubjectInstance, TestMethod, TestMethods, TestOutcome,
    TestSubject,
};
