//! Class identity and declared interfaces.
//!
//! A plurified class is a Rust type paired with a [`ClassInfo`] record: its namepath (for example
//! `plur/test/Tester`), its parent class if it embeds one, and the namepaths of the interfaces it declares.
//!
//! ## Notes
//!
//! - Namepath lookup is inherited: a class without its own namepath reports its parent's. Use
//!   [`ClassInfo::owns_namepath`] to tell the two apart.
//! - The implemented set is *not* inherited. Each class declares its own, and `plur/IPlurified` is always in it.

use std::any::{Any, TypeId};
use std::collections::BTreeSet;
use std::fmt;

/// A marker for a declared interface.
///
/// Interfaces are ordinary traits; the marker type exists so a class can record the interface's namepath.
pub trait Interface {
    const NAMEPATH: &'static str;
}

/// The root interface every plurified class implements.
pub enum IPlurified {}

impl Interface for IPlurified {
    const NAMEPATH: &'static str = "plur/IPlurified";
}

/// Metadata describing one plurified class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    namepath: Option<&'static str>,
    type_id: TypeId,
    type_name: &'static str,
    parent: Option<Box<ClassInfo>>,
    implemented: BTreeSet<&'static str>,
}

impl ClassInfo {
    /// Describe `T` under its own namepath.
    pub fn of<T: Any>(namepath: &'static str) -> Self {
        let mut info = Self::inheriting::<T>();
        info.namepath = Some(namepath);
        info
    }

    /// Describe `T` without declaring a namepath; lookups fall through to the parent.
    pub fn inheriting<T: Any>() -> Self {
        let mut implemented = BTreeSet::new();
        implemented.insert(IPlurified::NAMEPATH);
        Self {
            namepath: None,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            parent: None,
            implemented,
        }
    }

    /// Record `parent` as the immediate supertype.
    pub fn extends(mut self, parent: ClassInfo) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Declare that this class implements `I`.
    pub fn with_interface<I: Interface + ?Sized>(self) -> Self {
        self.with_interface_namepath(I::NAMEPATH)
    }

    /// Declare an implemented interface by namepath.
    pub fn with_interface_namepath(mut self, namepath: &'static str) -> Self {
        self.implemented.insert(namepath);
        self
    }

    /// The namepath, resolved through the parent chain.
    pub fn namepath(&self) -> Option<&'static str> {
        self.namepath
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.namepath()))
    }

    /// The namepath declared on this class itself.
    pub fn own_namepath(&self) -> Option<&'static str> {
        self.namepath
    }

    pub fn owns_namepath(&self) -> bool {
        self.namepath.is_some()
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn parent(&self) -> Option<&ClassInfo> {
        self.parent.as_deref()
    }

    pub fn implements(&self, interface_namepath: &str) -> bool {
        self.implemented.contains(interface_namepath)
    }

    pub fn implemented(&self) -> &BTreeSet<&'static str> {
        &self.implemented
    }
}

/// A type that carries plur class metadata.
///
/// Usually derived with `#[derive(Plurified)]` from `plur_derive`.
pub trait Plurified: Any {
    /// Type-level metadata.
    fn class_info() -> ClassInfo
    where
        Self: Sized;

    /// Instance-level metadata; for derived impls this is the same record as [`Plurified::class_info`].
    fn class(&self) -> ClassInfo;

    fn as_any(&self) -> &dyn Any;

    /// The instance's namepath, or the Rust type name when none is declared anywhere in the chain.
    fn namepath(&self) -> &'static str {
        let class = self.class();
        class.namepath().unwrap_or(class.type_name())
    }
}

impl fmt::Debug for dyn Plurified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Plurified").field(&self.namepath()).finish()
    }
}

/// Whether `object`'s class declares interface `I`.
pub fn implementing<I: Interface + ?Sized>(object: &dyn Plurified) -> bool {
    object.class().implements(I::NAMEPATH)
}

/// Whether `class` went through plurification: it has a resolvable namepath and implements `plur/IPlurified`.
pub fn is_plurified(class: &ClassInfo) -> bool {
    class.namepath().is_some() && class.implements(IPlurified::NAMEPATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    enum IPortable {}

    impl Interface for IPortable {
        const NAMEPATH: &'static str = "plur/model/IPortable";
    }

    struct Base;
    struct Derived;

    impl Plurified for Derived {
        fn class_info() -> ClassInfo {
            ClassInfo::of::<Derived>("plur/Derived")
                .extends(ClassInfo::of::<Base>("plur/Base"))
                .with_interface::<IPortable>()
        }

        fn class(&self) -> ClassInfo {
            Self::class_info()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_namepath_is_own_when_declared() {
        let info = ClassInfo::of::<Base>("plur/Base");
        assert_eq!(info.namepath(), Some("plur/Base"));
        assert!(info.owns_namepath());
    }

    #[test]
    fn test_namepath_falls_through_to_parent() {
        let info = ClassInfo::inheriting::<Derived>().extends(ClassInfo::of::<Base>("plur/Base"));
        assert_eq!(info.namepath(), Some("plur/Base"));
        assert!(!info.owns_namepath());
        assert_eq!(info.own_namepath(), None);
    }

    #[test]
    fn test_implemented_always_contains_root_interface() {
        let info = ClassInfo::of::<Base>("plur/Base");
        assert!(info.implements(IPlurified::NAMEPATH));
        assert_eq!(info.implemented().len(), 1);
    }

    #[test]
    fn test_implementing_checks_declared_interfaces() {
        let object = Derived;
        assert!(implementing::<IPortable>(&object));
        assert!(implementing::<IPlurified>(&object));
        assert_eq!(object.namepath(), "plur/Derived");
        assert_eq!(object.class().parent().map(ClassInfo::type_id), Some(TypeId::of::<Base>()));
    }

    #[test]
    fn test_boxed_object_debug_shows_namepath() {
        let object: Box<dyn Plurified> = Box::new(Derived);
        assert_eq!(format!("{object:?}"), r#"Plurified("plur/Derived")"#);
        let failed: Result<(), Box<dyn Plurified>> = Err(object);
        assert_eq!(failed.unwrap_err().namepath(), "plur/Derived");
    }

    #[test]
    fn test_is_plurified_requires_namepath() {
        assert!(is_plurified(&ClassInfo::of::<Base>("plur/Base")));
        assert!(!is_plurified(&ClassInfo::inheriting::<Base>()));
    }
}
