//! Dynamic reflection and generic invocation.
//!
//! ## Menu
//!
//! - [`Rtti`]: runtime identity of a type, with hashing and compatibility checks.
//! - [`Value`]: an owned, type-erased value.
//! - [`view`]: non-owning object views and per-call argument views.
//! - [`convert`]: the checked conversion rules used by [`ObjectView::convert_to`].
//! - [`invoke`]: invokers, the type-erased [`InvokerAccessor`] and [`Function`].
//! - [`registry`]: the name based [`TypeRegister`].
//! - [`context`]: runtime class shapes ([`Blueprint`]) and their [`DynamicInstance`]s.
//!
//! ## Example
//!
//! ```
//! use lumen_reflect::invoke::{Function, Invoker};
//! use lumen_reflect::args;
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! let add = Function::new(Invoker::from_fn(add));
//! let store = args![3_i32, 4_i32];
//!
//! let result = add.invoke_static(store.as_view()).unwrap();
//! assert_eq!(result.downcast_ref::<i32>(), Some(&7));
//! ```
//!
//! [`ObjectView::convert_to`]: crate::view::ObjectView::convert_to
//! [`InvokerAccessor`]: crate::invoke::InvokerAccessor
//! [`Function`]: crate::invoke::Function
//! [`TypeRegister`]: crate::registry::TypeRegister
//! [`Blueprint`]: crate::context::Blueprint
//! [`DynamicInstance`]: crate::context::DynamicInstance
#![expect(unsafe_code, reason = "Object views are built on type-erased raw pointers.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod rtti;
mod value;

pub mod context;
pub mod convert;
pub mod invoke;
pub mod registry;
pub mod view;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use rtti::{RefKind, Rtti};
pub use value::Value;
