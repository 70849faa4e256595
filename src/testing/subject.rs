//! Test subjects and their methods.
//!
//! A subject is a plurified type that embeds a [`TestCase`] and exposes `test*` methods. Method lists are
//! usually produced by `#[test_suite]`, which records them in declaration order.
//!
//! The runner only sees the type-erased halves: [`SubjectClass`] (what a target resolves to) and
//! [`SubjectInstance`] (the single instance created per target).

use std::marker::PhantomData;

use futures::future::LocalBoxFuture;
use plur_core::Plurified;

use super::case::TestCase;
use super::error::FailureCause;

/// Completion signal of one test method.
pub type TestOutcome = Result<(), FailureCause>;

/// Converts whatever a test method returns into a [`TestOutcome`].
pub trait IntoTestOutcome {
    fn into_outcome(self) -> TestOutcome;
}

impl IntoTestOutcome for () {
    fn into_outcome(self) -> TestOutcome {
        Ok(())
    }
}

impl<E: Into<FailureCause>> IntoTestOutcome for Result<(), E> {
    fn into_outcome(self) -> TestOutcome {
        self.map_err(Into::into)
    }
}

pub type MethodFn<S> = for<'a> fn(&'a mut S) -> LocalBoxFuture<'a, TestOutcome>;

/// A named, zero-argument test method of `S`.
pub struct TestMethod<S> {
    name: &'static str,
    invoke: MethodFn<S>,
}

impl<S> TestMethod<S> {
    pub const fn new(name: &'static str, invoke: MethodFn<S>) -> Self {
        Self { name, invoke }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invoke<'a>(&self, subject: &'a mut S) -> LocalBoxFuture<'a, TestOutcome> {
        (self.invoke)(subject)
    }
}

impl<S> Clone for TestMethod<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for TestMethod<S> {}

impl<S> std::fmt::Debug for TestMethod<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TestMethod").field(&self.name).finish()
    }
}

/// The declared methods of a subject, in declaration order.
pub trait TestMethods {
    fn methods() -> Vec<TestMethod<Self>>
    where
        Self: Sized;
}

/// A default-constructible subject with an embedded [`TestCase`].
pub trait TestSubject: Plurified + TestMethods + Sized + 'static {
    fn create() -> Self;

    fn case(&mut self) -> &mut TestCase;

    /// Run every declared `test*` method in order, stopping at the first failure.
    ///
    /// For ad hoc runs; orchestrated runs go through [`TestRunner`](super::TestRunner).
    fn run_all_local_tests(&mut self) -> LocalBoxFuture<'_, TestOutcome> {
        Box::pin(async move {
            for method in Self::methods() {
                method.invoke(&mut *self).await?;
            }
            Ok(())
        })
    }
}

/// Type-level view of a resolved target.
pub trait SubjectClass {
    fn namepath(&self) -> &'static str;

    /// Every declared method name, in declaration order.
    fn method_names(&self) -> Vec<&'static str>;

    fn instantiate(&self) -> Box<dyn SubjectInstance>;
}

/// The one instance the runner drives for a target.
pub trait SubjectInstance {
    /// Start `method`, or `None` if the subject has no method by that name.
    fn invoke<'a>(&'a mut self, method: &str) -> Option<LocalBoxFuture<'a, TestOutcome>>;

    fn test_case(&mut self) -> &mut TestCase;
}

impl<S: TestSubject> SubjectInstance for S {
    fn invoke<'a>(&'a mut self, method: &str) -> Option<LocalBoxFuture<'a, TestOutcome>> {
        let method = S::methods().into_iter().find(|m| m.name() == method)?;
        Some(method.invoke(self))
    }

    fn test_case(&mut self) -> &mut TestCase {
        self.case()
    }
}

/// Bridges a concrete [`TestSubject`] to [`SubjectClass`].
pub struct SubjectHandle<S> {
    _subject: PhantomData<fn() -> S>,
}

impl<S> SubjectHandle<S> {
    pub fn new() -> Self {
        Self { _subject: PhantomData }
    }
}

impl<S> Default for SubjectHandle<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TestSubject> SubjectClass for SubjectHandle<S> {
    fn namepath(&self) -> &'static str {
        let class = S::class_info();
        class.namepath().unwrap_or(class.type_name())
    }

    fn method_names(&self) -> Vec<&'static str> {
        S::methods().iter().map(TestMethod::name).collect()
    }

    fn instantiate(&self) -> Box<dyn SubjectInstance> {
        Box::new(S::create())
    }
}
