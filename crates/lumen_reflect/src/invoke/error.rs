use thiserror::Error;

use crate::Rtti;

/// An error returned when an invocation is refused.
///
/// The callable is never run when one of these is returned.
#[derive(Debug, Error, Clone, Copy)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("receiver mismatch: expected `{expected}`, found `{found}`")]
    ReceiverMismatch { expected: Rtti, found: Rtti },

    #[error("the arguments are neither compatible with nor convertible to the parameters")]
    IncompatibleArguments,

    #[error("argument {index} mismatch: expected `{expected}`, found `{found}`")]
    ArgumentMismatch {
        index: usize,
        expected: Rtti,
        found: Rtti,
    },
}
