//! Built-in self-test suites.
//!
//! These run plur's own object model and test primitives through the runner, and are what `plur test` runs
//! when no targets are given.

pub mod emitter;
pub mod fixtures;
pub mod object;
pub mod unit;

use crate::testing::SuiteRegistry;

pub use emitter::EmitterTest;
pub use object::ObjectTest;
pub use unit::UnitTest;

/// Every built-in suite, in the order `plur test` runs them.
pub fn default_registry() -> SuiteRegistry {
    let mut registry = SuiteRegistry::new();
    registry
        .register::<ObjectTest>("plur-tests/unit/plur/ObjectTest")
        .register::<EmitterTest>("plur-tests/unit/plur/test/EmitterTest")
        .register::<UnitTest>("plur-tests/unit/plur/UnitTest");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TargetResolver;

    #[test]
    fn test_default_registry_order() {
        assert_eq!(
            default_registry().identifiers(),
            vec![
                "plur-tests/unit/plur/ObjectTest",
                "plur-tests/unit/plur/test/EmitterTest",
                "plur-tests/unit/plur/UnitTest",
            ]
        );
    }

    #[tokio::test]
    async fn test_identifiers_match_subject_namepaths() {
        let registry = default_registry();
        for identifier in registry.identifiers() {
            let class = registry.resolve(identifier).await.unwrap();
            assert_eq!(class.namepath(), identifier);
        }
    }
}
