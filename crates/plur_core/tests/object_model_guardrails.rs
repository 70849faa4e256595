use std::sync::Arc;

use plur_core::{ClassInfo, ClassRegistry, IPlurified, Interface, Object, PlurError, Value};

struct Terminal;
struct Shell;

enum IConfigurable {}

impl Interface for IConfigurable {
    const NAMEPATH: &'static str = "plur/config/IConfigurable";
}

#[test]
fn strict_equality_never_coerces() {
    let pairs = [
        (Value::from(1), Value::from("1")),
        (Value::from(1), Value::from(1.5)),
        (Value::from(1.0), Value::from("1")),
        (Value::from(0), Value::from(false)),
        (Value::Null, Value::Undefined),
        (Value::from(""), Value::from(false)),
    ];
    for (a, b) in pairs {
        assert_ne!(a, b, "{a:?} must not equal {b:?}");
        assert_ne!(b, a, "{b:?} must not equal {a:?}");
    }
    assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
    // Numbers are one type, whatever their representation
    assert_eq!(Value::from(2), Value::from(2.0));
    assert_eq!(Value::from(2.0), Value::from(2));
}

#[test]
fn falsy_set() {
    let falsy = [
        Value::Undefined,
        Value::Null,
        Value::from(false),
        Value::from(0),
        Value::from(0.0),
        Value::from(f64::NAN),
        Value::from(""),
    ];
    for value in &falsy {
        assert!(!value.truthy(), "{value:?} should be falsy");
    }
    assert!(Value::from(Object::new()).truthy());
    assert!(Value::from("0").truthy());
}

#[test]
fn prototype_chain_lookup() {
    let root = Object::new().with("kind", "root").with("depth", 0).into_ref();
    let middle = Object::with_prototype(Arc::clone(&root)).with("depth", 1).into_ref();
    let leaf = Object::with_prototype(middle).with("name", "leaf");

    assert_eq!(leaf.get("kind"), Some(&Value::from("root")));
    assert_eq!(leaf.get("depth"), Some(&Value::from(1)));
    assert!(leaf.has("kind"));
    assert!(!leaf.has_own("kind"));
    assert!(leaf.has_own("name"));
    assert_eq!(leaf.get("missing"), None);
    assert!(Arc::ptr_eq(
        leaf.prototype().and_then(|p| p.prototype()).unwrap(),
        &root
    ));
}

#[test]
fn own_keys_keep_insertion_order() {
    let mut object = Object::new().with("b", 1).with("a", 2);
    object.set("c", 3);
    object.set("b", 4);
    assert_eq!(object.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    assert_eq!(object.get_own("b"), Some(&Value::from(4)));
    assert_eq!(object.len(), 3);
}

#[test]
fn class_registry_is_explicit_and_ordered() {
    let mut registry = ClassRegistry::new();
    registry
        .register_class(ClassInfo::of::<Terminal>("plur/terminal/Terminal"))
        .unwrap();
    registry
        .register_class(
            ClassInfo::of::<Shell>("plur-nodejs/terminal/Shell")
                .extends(ClassInfo::of::<Terminal>("plur/terminal/Terminal"))
                .with_interface::<IConfigurable>(),
        )
        .unwrap();

    let shell = registry.require("plur-nodejs/terminal/Shell").unwrap();
    assert!(shell.class.implements(IConfigurable::NAMEPATH));
    assert!(shell.class.implements(IPlurified::NAMEPATH));
    assert_eq!(shell.class.parent().and_then(ClassInfo::namepath), Some("plur/terminal/Terminal"));

    assert_eq!(
        registry.require("plur/terminal/Browser").unwrap_err(),
        PlurError::UnknownClass {
            namepath: "plur/terminal/Browser".to_string()
        }
    );
    assert_eq!(
        registry.records().iter().map(|r| r.namepath).collect::<Vec<_>>(),
        vec!["plur/terminal/Terminal", "plur-nodejs/terminal/Shell"]
    );
}
