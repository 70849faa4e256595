//! Assertion primitives and emission bookkeeping for one test subject.
//!
//! A [`TestCase`] is created once per subject, right before its methods run, and dropped afterwards. It owns
//! its emitter, its emission counters and its pending-work list; nothing is shared across subjects.
//!
//! ## Messages
//!
//! Every assertion takes a `message`. An empty message selects the primitive's default text (for example
//! `"Values are not strictly equal"`).

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, LocalBoxFuture};
use plur_core::{ClassInfo, IPlurified, Interface, Object, Plurified, Value};
use plur_derive::Plurified;

use super::assertion::{
    ASSERTION_FAILED, AssertResult, AssertionFailure, FailurePayload, NOT_STRICTLY_EQUAL, message_or,
};
use super::emitter::{Emitter, SubscriptionId};
use super::error::{FailureCause, panic_message};
use super::subject::TestOutcome;

/// Default pause for [`TestCase::sleep`].
pub const DEFAULT_SLEEP: Duration = Duration::from_millis(500);

type PendingWork = LocalBoxFuture<'static, TestOutcome>;

/// Base state every test subject embeds.
#[derive(Plurified)]
#[plur(namepath = "plur/test/Test")]
pub struct TestCase {
    namepath_prefix: String,
    emitter: Emitter,
    expected_emissions: BTreeMap<String, usize>,
    actual_emissions: BTreeMap<String, (Rc<Cell<usize>>, SubscriptionId)>,
    pending: Vec<PendingWork>,
}

impl TestCase {
    /// A case for the subject identified by `namepath`; event names are qualified with `"{namepath}."`.
    pub fn new(namepath: &str) -> Self {
        Self {
            namepath_prefix: format!("{namepath}."),
            emitter: Emitter::new(),
            expected_emissions: BTreeMap::new(),
            actual_emissions: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// A case for subject type `S`, keyed by its resolved namepath.
    pub fn for_subject<S: Plurified>() -> Self {
        let class = S::class_info();
        Self::new(class.namepath().unwrap_or(class.type_name()))
    }

    pub fn namepath_prefix(&self) -> &str {
        &self.namepath_prefix
    }

    /// `suffix` qualified with this case's namepath prefix.
    pub fn qualify(&self, suffix: &str) -> String {
        format!("{}{}", self.namepath_prefix, suffix)
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    pub fn assert(&self, condition: bool, message: &str) -> AssertResult {
        if condition {
            return Ok(());
        }
        Err(AssertionFailure::new(message_or(message, ASSERTION_FAILED))
            .with_payload(FailurePayload::Condition { observed: condition }))
    }

    /// Fails when `value` is falsy: `undefined`, `null`, `false`, `0`, `NaN` or `""`.
    pub fn assert_truthy(&self, value: impl Into<Value>, message: &str) -> AssertResult {
        let value = value.into();
        if value.truthy() {
            return Ok(());
        }
        Err(AssertionFailure::new(message_or(message, ASSERTION_FAILED)).with_payload(FailurePayload::Falsy {
            observed: format!("{value:?}"),
        }))
    }

    /// Strict equality. Both sides must be the same type; [`Value`]s never coerce.
    pub fn assert_equals<T: PartialEq + Debug>(&self, actual: T, expected: T, message: &str) -> AssertResult {
        if actual == expected {
            return Ok(());
        }
        Err(AssertionFailure::mismatch(
            message_or(message, NOT_STRICTLY_EQUAL),
            format!("{expected:?}"),
            format!("{actual:?}"),
        ))
    }

    /// `object` must own `property` (not inherit it) and its value must strictly equal `expected`.
    pub fn assert_owns(
        &self,
        object: Option<&Object>,
        property: &str,
        expected: impl Into<Value>,
        message: &str,
    ) -> AssertResult {
        let expected = expected.into();
        let Some(object) = object else {
            return Err(property_failure(
                message_or(message, "Actual object is undefined"),
                property,
                &expected,
                "undefined".to_string(),
            ));
        };
        let Some(actual) = object.get_own(property) else {
            let inherited = object.get(property).cloned().unwrap_or_default();
            return Err(property_failure(
                message_or(message, "Object does not own property"),
                property,
                &expected,
                inherited.to_string(),
            ));
        };
        strictly_equal(actual, &expected, message_or(message, "Object does not own property"))
    }

    /// `object` must resolve `property` through its prototype chain; with `expected`, the value must also
    /// strictly equal it.
    pub fn assert_has(
        &self,
        object: Option<&Object>,
        property: &str,
        expected: Option<Value>,
        message: &str,
    ) -> AssertResult {
        let expected_text = expected.as_ref().map_or_else(|| "<any>".to_string(), Value::to_string);
        let Some(object) = object else {
            return Err(AssertionFailure::new(message_or(message, "Object is undefined")).with_payload(
                FailurePayload::Property {
                    property: property.to_string(),
                    expected: expected_text,
                    actual: "undefined".to_string(),
                },
            ));
        };
        let actual = match object.get(property) {
            Some(value) if !value.is_undefined() => value,
            _ => {
                return Err(
                    AssertionFailure::new(message_or(message, "Object property is undefined")).with_payload(
                        FailurePayload::Property {
                            property: property.to_string(),
                            expected: expected_text,
                            actual: "undefined".to_string(),
                        },
                    ),
                );
            }
        };
        match expected {
            Some(expected) => strictly_equal(actual, &expected, message_or(message, NOT_STRICTLY_EQUAL)),
            None => Ok(()),
        }
    }

    /// Construct an object from `spec` and check its class wiring. Returns the created object.
    pub fn assert_creation<A>(&self, spec: CreationSpec<A>, message: &str) -> AssertResult<Box<dyn Plurified>> {
        let CreationSpec {
            constructor,
            arguments,
            parent,
            interfaces,
            namepath,
        } = spec;
        let object = (constructor.build)(arguments);
        let class = object.class();

        let concrete = object.as_any().type_id();
        if concrete != constructor.type_id {
            return Err(AssertionFailure::mismatch(
                message_or(message, "Constructor not found"),
                constructor.type_name,
                class.type_name(),
            ));
        }

        if let Some(parent) = parent {
            let actual = class.parent().map(ClassInfo::type_id);
            if actual != Some(parent) {
                return Err(AssertionFailure::mismatch(
                    message_or(message, "Parent constructor not inherited"),
                    format!("{parent:?}"),
                    class.parent().map_or("<none>", ClassInfo::type_name),
                ));
            }
        }

        if let Some(interfaces) = interfaces {
            let mut expected: BTreeSet<&'static str> = interfaces.into_iter().collect();
            expected.insert(IPlurified::NAMEPATH);
            self.assert_equals(class.implemented(), &expected, message_or(message, "Interface not implemented"))?;
        }

        let type_level = &constructor.class;
        if type_level.own_namepath() != Some(namepath) {
            return Err(AssertionFailure::mismatch(
                message_or(message, "Constructor does not own namepath"),
                namepath,
                type_level.own_namepath().unwrap_or("<inherited>"),
            ));
        }
        if class.own_namepath() != Some(namepath) || object.namepath() != namepath {
            return Err(AssertionFailure::mismatch(
                message_or(message, "Prototype does not own namepath"),
                namepath,
                class.own_namepath().unwrap_or("<inherited>"),
            ));
        }

        Ok(object)
    }

    /// Run `callback`; an `Err` or a panic fails with the cause attached. Returns the callback's value.
    pub fn assert_try<T, E: Display>(&self, callback: impl FnOnce() -> Result<T, E>, message: &str) -> AssertResult<T> {
        let failure = |cause: String| {
            AssertionFailure::new(message_or(message, ASSERTION_FAILED)).with_payload(FailurePayload::Cause(cause))
        };
        match panic::catch_unwind(AssertUnwindSafe(callback)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(failure(err.to_string())),
            Err(payload) => Err(failure(panic_message(payload.as_ref()))),
        }
    }

    /// Run `callback`; it must return `Err` or panic.
    pub fn assert_catch<T, E>(&self, callback: impl FnOnce() -> Result<T, E>, message: &str) -> AssertResult {
        match panic::catch_unwind(AssertUnwindSafe(callback)) {
            Ok(Ok(_)) => Err(AssertionFailure::new(message_or(message, ASSERTION_FAILED))),
            Ok(Err(_)) | Err(_) => Ok(()),
        }
    }

    /// Fail unconditionally.
    pub fn fail<T>(&self, message: &str, data: Option<serde_json::Value>) -> AssertResult<T> {
        let failure = AssertionFailure::new(message_or(message, ASSERTION_FAILED));
        Err(match data {
            Some(data) => failure.with_payload(FailurePayload::Data(data)),
            None => failure,
        })
    }

    // ------------------------------------------------------------------
    // Emissions
    // ------------------------------------------------------------------

    /// Expect `expected_count` emissions of the qualified `suffix` and start counting them.
    ///
    /// Registering the same event type again replaces the previous expectation and restarts its count.
    pub fn assert_emission(&mut self, suffix: &str, expected_count: usize) -> SubscriptionId {
        let event_type = self.qualify(suffix);
        if let Some((_, previous)) = self.actual_emissions.remove(&event_type) {
            self.emitter.off(previous);
        }

        let counter = Rc::new(Cell::new(0));
        let observed = Rc::clone(&counter);
        let subscription = self
            .emitter
            .on(event_type.clone(), move |_| observed.set(observed.get() + 1));

        self.expected_emissions.insert(event_type.clone(), expected_count);
        self.actual_emissions.insert(event_type, (counter, subscription));
        subscription
    }

    /// Reconcile every registered expectation against the observed count. Not called automatically.
    pub fn assert_expected_emissions(&self) -> AssertResult {
        for (event_type, expected) in &self.expected_emissions {
            let actual = self
                .actual_emissions
                .get(event_type)
                .map_or(0, |(counter, _)| counter.get());
            self.assert_equals(
                actual,
                *expected,
                &format!("Incorrect emission count for event type: {event_type}"),
            )?;
        }
        Ok(())
    }

    /// Emit the qualified `suffix` on this case's emitter.
    pub fn emit(&mut self, suffix: &str, data: serde_json::Value) -> usize {
        let event_type = self.qualify(suffix);
        self.emitter.emit(&event_type, data)
    }

    pub fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    // ------------------------------------------------------------------
    // Pending work
    // ------------------------------------------------------------------

    /// Register work the runner should wait on before the current method counts as complete.
    pub fn add_pending(&mut self, work: impl Future<Output = TestOutcome> + 'static) {
        self.pending.push(Box::pin(work));
    }

    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_pending(&mut self) -> Vec<LocalBoxFuture<'static, TestOutcome>> {
        std::mem::take(&mut self.pending)
    }

    /// Drain and await all pending work concurrently, failing on the first error or when `timeout` elapses.
    pub async fn await_pending(&mut self, timeout: Option<Duration>) -> TestOutcome {
        let pending = self.take_pending();
        if pending.is_empty() {
            return Ok(());
        }
        let all = future::try_join_all(pending);
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, all).await {
                Ok(outcome) => outcome.map(drop),
                Err(_) => Err(FailureCause::Timeout(limit)),
            },
            None => all.await.map(drop),
        }
    }

    /// Pause the current test, [`DEFAULT_SLEEP`] when `duration` is `None`.
    pub async fn sleep(&self, duration: Option<Duration>) {
        tokio::time::sleep(duration.unwrap_or(DEFAULT_SLEEP)).await;
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("namepath_prefix", &self.namepath_prefix)
            .field("expected_emissions", &self.expected_emissions)
            .field("pending", &self.pending.len())
            .finish()
    }
}

fn property_failure(message: &str, property: &str, expected: &Value, actual: String) -> AssertionFailure {
    AssertionFailure::new(message).with_payload(FailurePayload::Property {
        property: property.to_string(),
        expected: expected.to_string(),
        actual,
    })
}

/// Strict equality on [`Value`]s, reported with their display form.
fn strictly_equal(actual: &Value, expected: &Value, message: &str) -> AssertResult {
    if actual == expected {
        return Ok(());
    }
    Err(AssertionFailure::mismatch(message, expected.to_string(), actual.to_string()))
}

/// How [`TestCase::assert_creation`] builds the object under test.
pub struct Constructor<A> {
    type_id: TypeId,
    type_name: &'static str,
    class: ClassInfo,
    build: Box<dyn Fn(A) -> Box<dyn Plurified>>,
}

impl<A> Constructor<A> {
    /// A constructor producing `T`.
    pub fn of<T: Plurified>(build: impl Fn(A) -> T + 'static) -> Self {
        Self::declared::<T>(move |arguments| Box::new(build(arguments)) as Box<dyn Plurified>)
    }

    /// A constructor declared as producing `T` whose factory may return anything plurified.
    pub fn declared<T: Plurified>(build: impl Fn(A) -> Box<dyn Plurified> + 'static) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            class: T::class_info(),
            build: Box::new(build),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// The expected shape of an object built by [`TestCase::assert_creation`].
pub struct CreationSpec<A> {
    pub constructor: Constructor<A>,
    pub arguments: A,
    pub parent: Option<TypeId>,
    pub interfaces: Option<Vec<&'static str>>,
    pub namepath: &'static str,
}

impl<A> CreationSpec<A> {
    pub fn new(constructor: Constructor<A>, arguments: A, namepath: &'static str) -> Self {
        Self {
            constructor,
            arguments,
            parent: None,
            interfaces: None,
            namepath,
        }
    }

    pub fn with_parent<P: Any>(mut self) -> Self {
        self.parent = Some(TypeId::of::<P>());
        self
    }

    /// Expect exactly these interfaces (`plur/IPlurified` is implied).
    pub fn with_interfaces(mut self, interfaces: Vec<&'static str>) -> Self {
        self.interfaces = Some(interfaces);
        self
    }

    pub fn with_interface<I: Interface + ?Sized>(mut self) -> Self {
        self.interfaces.get_or_insert_with(Vec::new).push(I::NAMEPATH);
        self
    }
}
