//! Error taxonomy for the object model.

use thiserror::Error;

/// Errors raised by the class registry and object model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlurError {
    #[error("class {namepath} is already registered")]
    AlreadyRegistered { namepath: String },

    #[error("unknown class: {namepath}")]
    UnknownClass { namepath: String },

    #[error("class {type_name} does not declare a namepath")]
    MissingNamepath { type_name: &'static str },
}
