use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use crate::testing::{AssertResult, FailureCause, TestCase, TestSubject};
use crate::{Plurified, test_suite};

/// Emission bookkeeping, pending work and sleeping.
#[derive(Plurified)]
#[plur(namepath = "plur-tests/unit/plur/test/EmitterTest", extends = TestCase)]
pub struct EmitterTest {
    case: TestCase,
}

#[test_suite]
impl EmitterTest {
    fn test_counts_qualified_emissions(&mut self) -> AssertResult {
        self.case.assert_emission("created", 2);

        self.case.emit("created", json!({"id": 1}));
        self.case.emit("updated", json!({"id": 1}));
        self.case.emit("created", json!({"id": 2}));
        // Unqualified names belong to nobody
        self.case.emitter().emit("created", json!(null));

        self.case.assert_expected_emissions()
    }

    fn test_miscount_reports_expected_and_actual(&mut self) -> AssertResult {
        self.case.assert_emission("deleted", 2);
        self.case.emit("deleted", json!(null));

        match self.case.assert_expected_emissions() {
            Ok(()) => self.case.fail("a missing emission went unnoticed", None)?,
            Err(failure) => self.case.assert_equals(failure.expected_actual(), Some(("2", "1")), "")?,
        }

        // Replacing the expectation restarts its count
        self.case.assert_emission("deleted", 0);
        self.case.assert_expected_emissions()
    }

    async fn test_pending_work_settles(&mut self) -> Result<(), FailureCause> {
        let settled = Rc::new(Cell::new(0));
        for delay in [20, 5, 10] {
            let settled = Rc::clone(&settled);
            self.case.add_pending(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                settled.set(settled.get() + 1);
                Ok(())
            });
        }
        self.case.assert(self.case.has_pending_work(), "pending work was not recorded")?;

        self.case.await_pending(Some(Duration::from_secs(1))).await?;
        self.case.assert_equals(settled.get(), 3, "")?;
        self.case.assert(!self.case.has_pending_work(), "pending work was not drained")?;
        Ok(())
    }

    async fn test_sleep(&mut self) -> AssertResult {
        let started = tokio::time::Instant::now();
        self.case.sleep(Some(Duration::from_millis(10))).await;
        self.case
            .assert(started.elapsed() >= Duration::from_millis(10), "woke up too early")
    }
}

impl TestSubject for EmitterTest {
    fn create() -> Self {
        Self {
            case: TestCase::for_subject::<Self>(),
        }
    }

    fn case(&mut self) -> &mut TestCase {
        &mut self.case
    }
}
