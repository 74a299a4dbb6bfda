//! Runtime class shapes.
//!
//! A [`Blueprint`] declares named members with a type and an [`AccessLevel`].
//! Instantiating it yields a [`DynamicInstance`] whose members are read and
//! written under an [`AccessContext`]. Blueprints are grouped by name in an
//! [`InstanceContext`].
//!
//! ## Menu
//!
//! - [`AccessLevel`] and [`AccessContext`]: who may see a member.
//! - [`Blueprint`] and [`BlueprintMember`]: member declarations.
//! - [`DynamicInstance`] and [`Member`]: materialised objects.
//! - [`InstanceContext`]: the blueprint collection.
//!
//! ## Global state
//!
//! With the `std` feature, both [`InstanceContext`] and
//! [`TypeRegister`](crate::registry::TypeRegister) have a process-wide
//! instance behind a `RwLock`. [`Blueprint::add_member`] writes the global
//! type register, so it must not be called while a guard of that register
//! is alive.

// -----------------------------------------------------------------------------
// Modules

mod access;
mod blueprint;
mod dynamic_instance;
mod error;
mod instance_context;

// -----------------------------------------------------------------------------
// Exports

pub use access::{AccessContext, AccessLevel};
pub use blueprint::{Blueprint, BlueprintMember};
pub use dynamic_instance::{DynamicInstance, Member};
pub use error::{BlueprintError, MemberError};
pub use instance_context::InstanceContext;
