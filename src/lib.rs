#![forbid(unsafe_code)]
//! Plur: plurified objects and an asynchronous test runner.
//!
//! The object model (class namepaths, declared interfaces, own vs inherited properties) lives in
//! [`plur_core`] and is re-exported here. This crate adds the test engine ([`testing`]), the built-in
//! self-test suites ([`suites`]) and the `plur` command line ([`cli`]).
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Test subjects**: a panic inside a test method is not a crash. The runner catches it and reports it as the
//!   failure of that method.

// Lets `#[test_suite]` expansions refer to `::plur` from inside this crate too.
extern crate self as plur;

pub mod cli;
pub mod suites;
pub mod testing;
pub mod version;

pub use plur_core::{
    ClassInfo, ClassRecord, ClassRegistry, IPlurified, Interface, Object, ObjectRef, PlurError, Plurified, Value,
    implementing, is_plurified,
};
pub use plur_derive::{Plurified, test_suite};
