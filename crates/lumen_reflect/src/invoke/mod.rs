//! Generic invocation of functions and methods.
//!
//! An [`Invoker`] wraps one callable of one shape and checks the arguments
//! of every call before running it. [`InvokerAccessor`] erases the callable
//! type, and [`Function`] is the owning handle over a boxed accessor.
//!
//! Arguments are matched in three tiers, see [`MatchTier`]:
//!
//! 1. the hash sums of arguments and parameters are equal;
//! 2. every argument is compatible with its parameter;
//! 3. every argument is compatible with or convertible to its parameter.
//!
//! A call that matches none of them is refused with
//! [`InvokeError::IncompatibleArguments`].

mod accessor;
mod error;
mod function;
mod invoker;
mod method_type;

pub use accessor::InvokerAccessor;
pub use error::InvokeError;
pub use function::Function;
pub use invoker::{ByMut, ByRef, ByValue, Callable, Invoker, MatchTier, Static};
pub use method_type::{MethodQualifiers, MethodType};
