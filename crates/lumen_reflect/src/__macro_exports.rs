//! Items used by the exported macros, not a public API.

#[cfg(feature = "auto_register")]
pub use auto_register::*;

#[cfg(feature = "auto_register")]
mod auto_register {
    pub use inventory;

    use crate::registry::TypeRegister;

    /// A mapping submitted by `register_type_mapping!`.
    pub struct TypeMappingFunc(pub fn(&mut TypeRegister));

    inventory::collect!(TypeMappingFunc);

    fn available(_: &mut TypeRegister) {}

    // Always present where static registration works.
    inventory::submit! {
        TypeMappingFunc(available)
    }
}
