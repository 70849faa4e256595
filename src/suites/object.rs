use plur_core::{ClassRegistry, Object, PlurError, Value, implementing, is_plurified};

use super::fixtures::{IPortable, Portable, Shape, Square, Tile};
use crate::testing::{AssertResult, Constructor, CreationSpec, FailureCause, TestCase, TestSubject};
use crate::{Plurified, test_suite};

/// Class identity, declared interfaces and property lookup.
#[derive(Plurified)]
#[plur(namepath = "plur-tests/unit/plur/ObjectTest", extends = TestCase)]
pub struct ObjectTest {
    case: TestCase,
}

#[test_suite]
impl ObjectTest {
    fn test_plurified(&mut self) -> AssertResult {
        let square = Square::new(2.0);
        let shape = Shape { sides: 3 };

        self.case.assert(is_plurified(&Square::class_info()), "Square is not plurified")?;
        self.case.assert(implementing::<IPortable>(&square), "Square does not implement IPortable")?;
        self.case.assert(!implementing::<IPortable>(&shape), "Shape should not implement IPortable")?;
        self.case.assert_equals(square.namepath(), "plur-tests/fixtures/Square", "")
    }

    fn test_creation(&mut self) -> AssertResult {
        let spec = CreationSpec::new(Constructor::of::<Square>(Square::new), 2.0, "plur-tests/fixtures/Square")
            .with_parent::<Shape>()
            .with_interface::<IPortable>();
        let created = self.case.assert_creation(spec, "")?;

        let square = created.as_any().downcast_ref::<Square>();
        self.case.assert(square.is_some(), "created object is not a Square")?;
        let portable = square.map(Portable::to_obj).unwrap_or_default();
        self.case.assert_owns(Some(&portable), "side", 2.0, "")
    }

    fn test_creation_rejects_inherited_namepath(&mut self) -> AssertResult {
        self.case.assert_equals(Tile::class_info().namepath(), Some("plur-tests/fixtures/Square"), "")?;
        self.case.assert(!Tile::class_info().owns_namepath(), "Tile should inherit its namepath")?;

        let spec = CreationSpec::new(
            Constructor::of::<Tile>(|side| Tile {
                square: Square::new(side),
            }),
            1.0,
            "plur-tests/fixtures/Square",
        )
        .with_parent::<Square>();
        self.case
            .assert_catch(|| self.case.assert_creation(spec, ""), "inherited namepath was accepted")
    }

    fn test_creation_rejects_wrong_interfaces(&mut self) -> AssertResult {
        let spec = CreationSpec::new(Constructor::of::<Square>(Square::new), 1.0, "plur-tests/fixtures/Square")
            .with_interfaces(Vec::new());
        self.case
            .assert_catch(|| self.case.assert_creation(spec, ""), "undeclared IPortable went unnoticed")
    }

    fn test_owns_and_has(&mut self) -> AssertResult {
        let prototype = Object::new().with("kind", "shape").into_ref();
        let object = Object::with_prototype(prototype).with("sides", 4_i64);

        self.case.assert_owns(Some(&object), "sides", 4_i64, "")?;
        self.case.assert_has(Some(&object), "kind", Some(Value::from("shape")), "")?;
        self.case.assert_has(Some(&object), "sides", None, "")?;
        self.case.assert_catch(
            || self.case.assert_owns(Some(&object), "kind", "shape", ""),
            "inherited property counted as owned",
        )?;
        self.case.assert_catch(
            || self.case.assert_owns(Some(&object), "sides", "4", ""),
            "owned property compared loosely",
        )?;
        self.case.assert_catch(|| self.case.assert_has(None, "kind", None, ""), "absent object passed")
    }

    fn test_class_registry(&mut self) -> Result<(), FailureCause> {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>()?;
        registry.register::<Square>()?;

        let duplicate = registry.register::<Square>().map(|_| ());
        self.case.assert_equals(
            duplicate,
            Err(PlurError::AlreadyRegistered {
                namepath: "plur-tests/fixtures/Square".to_string(),
            }),
            "",
        )?;

        let record = registry.require("plur-tests/fixtures/Square")?;
        self.case.assert_equals(record.class.parent().map(|p| p.type_id()), Some(Shape::class_info().type_id()), "")?;
        self.case.assert_equals(registry.len(), 2, "")?;
        Ok(())
    }
}

impl TestSubject for ObjectTest {
    fn create() -> Self {
        Self {
            case: TestCase::for_subject::<Self>(),
        }
    }

    fn case(&mut self) -> &mut TestCase {
        &mut self.case
    }
}
