//! A strict dynamic value model with prototype-style property inheritance.
//!
//! [`Value`] equality is strict: types never coerce into each other (`Int(1) != Str("1")`, `Int(0) !=
//! Bool(false)`) and objects compare by identity, never structurally. `Int` and `Float` are both numbers and
//! compare by numeric value, so `Int(1) == Float(1.0)`.

use std::fmt;
use std::sync::Arc;

/// Shared handle to an [`Object`]. Identity is the allocation.
pub type ObjectRef = Arc<Object>;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(ObjectRef),
}

impl Value {
    /// Falsy values are `Undefined`, `Null`, `false`, `0`, `0.0`, `NaN` and `""`.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => int_equals_float(*i, *f),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Exact numeric comparison; `NaN`, infinities and fractional or out-of-range floats never equal an integer.
fn int_equals_float(int: i64, float: f64) -> bool {
    // 2^63 is exactly representable, i64::MAX is not
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    float.fract() == 0.0 && float >= i64::MIN as f64 && float < UPPER && float as i64 == int
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(object) => write!(f, "[object with {} own properties]", object.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(Arc::new(value))
    }
}

/// A property bag with an optional prototype.
///
/// Own properties keep insertion order. [`Object::get`] walks the prototype chain; [`Object::get_own`] does not.
#[derive(Debug, Default)]
pub struct Object {
    properties: Vec<(String, Value)>,
    prototype: Option<ObjectRef>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prototype(prototype: ObjectRef) -> Self {
        Self {
            properties: Vec::new(),
            prototype: Some(prototype),
        }
    }

    /// Builder form of [`Object::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an own property, replacing any previous own value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((name, value)),
        }
    }

    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.prototype.as_ref()
    }

    pub fn get_own(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.get_own(name).is_some()
    }

    /// Resolve `name` on this object or the first prototype that has it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(object) = current {
            if let Some(value) = object.get_own(name) {
                return Some(value);
            }
            current = object.prototype.as_deref();
        }
        None
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equality_never_coerces() {
        assert_eq!(Value::from(1), Value::from(1));
        assert_ne!(Value::from(1), Value::from("1"));
        assert_ne!(Value::from(0), Value::from(false));
        assert_ne!(Value::Null, Value::Undefined);
        assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(-0.0), Value::from(0));
        assert_eq!(Value::from(i64::MIN), Value::from(i64::MIN as f64));
        assert_ne!(Value::from(1), Value::from(1.5));
        assert_ne!(Value::from(0), Value::from(f64::NAN));
        assert_ne!(Value::from(i64::MAX), Value::from(f64::INFINITY));
        assert_ne!(Value::from(i64::MAX), Value::from(i64::MAX as f64));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = Object::new().with("x", 1).into_ref();
        let b = Object::new().with("x", 1).into_ref();
        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.truthy());
        assert!(!Value::from(0).truthy());
        assert!(!Value::from("").truthy());
        assert!(!Value::from(f64::NAN).truthy());
        assert!(Value::from("0").truthy());
        assert!(Value::from(Object::new()).truthy());
    }

    #[test]
    fn test_get_walks_prototype_chain() {
        let base = Object::new().with("namepath", "plur/Base").into_ref();
        let derived = Object::with_prototype(base).with("x", 2);

        assert_eq!(derived.get("namepath"), Some(&Value::from("plur/Base")));
        assert!(!derived.has_own("namepath"));
        assert!(derived.has_own("x"));
        assert_eq!(derived.get("missing"), None);
    }

    #[test]
    fn test_set_replaces_own_value_in_place() {
        let mut object = Object::new().with("a", 1).with("b", 2);
        object.set("a", 3);
        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(object.get_own("a"), Some(&Value::from(3)));
    }
}
