//! An explicit record of plurified classes.
//!
//! The registry is owned by whoever needs it (a test run, a process context) and passed down; there is no
//! global list of classes.

use std::time::SystemTime;

use crate::class::{ClassInfo, Plurified};
use crate::errors::PlurError;

/// One registered class.
#[derive(Debug, Clone)]
pub struct ClassRecord {
    pub namepath: &'static str,
    pub class: ClassInfo,
    pub registered_at: SystemTime,
}

/// Registered classes in registration order.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    records: Vec<ClassRecord>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its declared namepath.
    ///
    /// ## Errors
    /// - [`PlurError::MissingNamepath`] when `T` resolves no namepath.
    /// - [`PlurError::AlreadyRegistered`] when the namepath is taken.
    pub fn register<T: Plurified>(&mut self) -> Result<&ClassRecord, PlurError> {
        self.register_class(T::class_info())
    }

    pub fn register_class(&mut self, class: ClassInfo) -> Result<&ClassRecord, PlurError> {
        let Some(namepath) = class.namepath() else {
            return Err(PlurError::MissingNamepath {
                type_name: class.type_name(),
            });
        };
        if self.lookup(namepath).is_some() {
            return Err(PlurError::AlreadyRegistered {
                namepath: namepath.to_string(),
            });
        }

        let index = self.records.len();
        self.records.push(ClassRecord {
            namepath,
            class,
            registered_at: SystemTime::now(),
        });
        Ok(&self.records[index])
    }

    pub fn lookup(&self, namepath: &str) -> Option<&ClassRecord> {
        self.records.iter().find(|record| record.namepath == namepath)
    }

    /// Like [`ClassRegistry::lookup`] but reports a miss as an error.
    pub fn require(&self, namepath: &str) -> Result<&ClassRecord, PlurError> {
        self.lookup(namepath).ok_or_else(|| PlurError::UnknownClass {
            namepath: namepath.to_string(),
        })
    }

    pub fn records(&self) -> &[ClassRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;

    struct Shell;

    impl Plurified for Shell {
        fn class_info() -> ClassInfo {
            ClassInfo::of::<Shell>("plur-nodejs/terminal/Shell")
        }

        fn class(&self) -> ClassInfo {
            Self::class_info()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_register_records_in_order() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shell>().unwrap();
        registry
            .register_class(ClassInfo::of::<u8>("plur/terminal/Browser"))
            .unwrap();

        let namepaths: Vec<_> = registry.records().iter().map(|r| r.namepath).collect();
        assert_eq!(namepaths, vec!["plur-nodejs/terminal/Shell", "plur/terminal/Browser"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shell>().unwrap();
        let err = registry.register::<Shell>().unwrap_err();
        assert_eq!(
            err,
            PlurError::AlreadyRegistered {
                namepath: "plur-nodejs/terminal/Shell".to_string()
            }
        );
    }

    #[test]
    fn test_register_requires_namepath() {
        let mut registry = ClassRegistry::new();
        let err = registry.register_class(ClassInfo::inheriting::<u8>()).unwrap_err();
        assert!(matches!(err, PlurError::MissingNamepath { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_require_reports_unknown() {
        let registry = ClassRegistry::new();
        assert_eq!(
            registry.require("plur/Nope").unwrap_err().to_string(),
            "unknown class: plur/Nope"
        );
    }
}
