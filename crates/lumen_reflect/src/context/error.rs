use alloc::string::String;

use thiserror::Error;

use super::{AccessContext, AccessLevel};
use crate::Rtti;

/// An error returned by the direct member accessors.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum MemberError {
    #[error("member `{0}` was not found")]
    NotFound(String),

    #[error("access violation: member `{member}` is {level}, caller is {context}")]
    AccessDenied {
        member: String,
        level: AccessLevel,
        context: AccessContext,
    },

    #[error("member `{member}` holds `{expected}`, found `{found}`")]
    TypeMismatch {
        member: String,
        expected: Rtti,
        found: Rtti,
    },
}

/// An error returned when instantiating a [`Blueprint`](super::Blueprint).
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum BlueprintError {
    #[error("initial value of member `{member}` must be `{expected}`, found `{found}`")]
    TypeMismatch {
        member: String,
        expected: Rtti,
        found: Rtti,
    },
}
