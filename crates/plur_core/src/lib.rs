//! Provide the class metadata and object model that plur's test engine queries.
//!
//! This crate is intentionally small and dependency-light. It only keeps the *queryable* side of plur's
//! object emulation:
//! - class identity (a namepath string plus the concrete Rust type),
//! - the set of interfaces a class declares it implements,
//! - a strict dynamic value/object model with own vs inherited property lookup.
//!
//! ## Notes
//!
//! - Interfaces are Rust traits; conformance is checked by the compiler. What remains here is the declared
//!   namepath record so tests can assert on it.
//! - There is no global state. Whoever needs a class registry owns one (see [`registry::ClassRegistry`]).

pub mod class;
pub mod errors;
pub mod registry;
pub mod value;

pub use class::{ClassInfo, IPlurified, Interface, Plurified, implementing, is_plurified};
pub use errors::PlurError;
pub use registry::{ClassRecord, ClassRegistry};
pub use value::{Object, ObjectRef, Value};
