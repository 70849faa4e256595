use plur_core::Value;
use serde_json::json;

use crate::testing::{AssertResult, FailurePayload, TestCase, TestSubject};
use crate::{Plurified, test_suite};

/// The assertion primitives themselves.
#[derive(Plurified)]
#[plur(namepath = "plur-tests/unit/plur/UnitTest", extends = TestCase)]
pub struct UnitTest {
    case: TestCase,
}

#[test_suite]
impl UnitTest {
    fn test_constructor(&mut self) {}

    fn test_namepath_prefix(&mut self) -> AssertResult {
        self.case
            .assert_equals(self.case.namepath_prefix(), "plur-tests/unit/plur/UnitTest.", "")
    }

    fn test_strict_equality(&mut self) -> AssertResult {
        self.case.assert_equals(1, 1, "")?;
        self.case.assert_equals(Value::from(1), Value::from(1), "")?;
        self.case.assert_catch(
            || self.case.assert_equals(Value::from(1), Value::from("1"), ""),
            "1 and \"1\" compared equal",
        )?;
        self.case.assert_equals(Value::from(1), Value::from(1.0), "1 and 1.0 are the same number")?;
        self.case.assert_catch(
            || self.case.assert_equals(Value::Null, Value::Undefined, ""),
            "null and undefined compared equal",
        )
    }

    fn test_truthiness(&mut self) -> AssertResult {
        self.case.assert_truthy("0", "")?;
        self.case.assert_truthy(Value::from(-1), "")?;
        for falsy in [Value::Undefined, Value::Null, Value::from(false), Value::from(0), Value::from("")] {
            self.case
                .assert_catch(|| self.case.assert_truthy(falsy.clone(), ""), "falsy value passed")?;
        }
        Ok(())
    }

    fn test_try_and_catch(&mut self) -> AssertResult {
        let parsed = self.case.assert_try(|| "42".parse::<i64>(), "")?;
        self.case.assert_equals(parsed, 42, "")?;

        match self.case.assert_try(|| "forty-two".parse::<i64>(), "parse") {
            Ok(_) => self.case.fail("a parse error went unnoticed", None),
            Err(failure) => self.case.assert(
                matches!(failure.payload, FailurePayload::Cause(_)),
                "assert_try dropped the cause",
            ),
        }?;

        self.case
            .assert_catch(|| self.case.fail::<()>("always", Some(json!({"why": "test"}))), "fail() passed")
    }

    fn test_default_messages(&mut self) -> AssertResult {
        let messages = [
            self.case.assert(false, "").err().map(|failure| failure.message),
            self.case.assert_equals(1, 2, "").err().map(|failure| failure.message),
            self.case.assert_owns(None, "x", 1_i64, "").err().map(|failure| failure.message),
            self.case.assert_has(None, "x", None, "").err().map(|failure| failure.message),
        ];
        self.case.assert_equals(
            messages,
            [
                Some("Assertion failed".to_string()),
                Some("Values are not strictly equal".to_string()),
                Some("Actual object is undefined".to_string()),
                Some("Object is undefined".to_string()),
            ],
            "",
        )
    }
}

impl TestSubject for UnitTest {
    fn create() -> Self {
        Self {
            case: TestCase::for_subject::<Self>(),
        }
    }

    fn case(&mut self) -> &mut TestCase {
        &mut self.case
    }
}
