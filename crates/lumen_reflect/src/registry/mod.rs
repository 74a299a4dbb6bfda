//! Name based registry of runtime types.
//!
//! ## Menu
//!
//! - [`TypeRegister`]: maps names to a [`TypeEntry`].
//! - [`TypeEntry`]: the [`Rtti`] of a type plus a default-construct thunk.
//! - [`register_type_mapping!`]: submits a mapping statically.
//!
//! ## auto_register
//!
//! See [`TypeRegister::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration. Not all
//! platforms support it, in which case `auto_register` returns `false`
//! and the mappings have to be created by hand.
//!
//! ## Global register
//!
//! With the `std` feature, one process-wide register is available through
//! [`TypeRegister::read_global`] and [`TypeRegister::write_global`]. Many
//! readers or one writer may hold it at a time.
//!
//! [`Rtti`]: crate::Rtti
//! [`register_type_mapping!`]: crate::register_type_mapping
//! [`inventory`]: https://docs.rs/inventory

mod type_register;

pub use type_register::{TypeEntry, TypeRegister};

/// Statically submit a type mapping, applied by [`TypeRegister::auto_register`].
///
/// The mapping name defaults to the stringified type.
///
/// # Examples
///
/// ```
/// use lumen_reflect::registry::TypeRegister;
/// use lumen_reflect::register_type_mapping;
///
/// #[derive(Default)]
/// struct Health(u32);
///
/// register_type_mapping!(Health);
/// register_type_mapping!(Health, "game::Health");
///
/// let mut register = TypeRegister::empty();
/// if register.auto_register() {
///     assert!(register.has_type_mapping("Health"));
///     assert!(register.has_type_mapping("game::Health"));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! register_type_mapping {
    ($ty:ty) => {
        $crate::register_type_mapping!($ty, ::core::stringify!($ty));
    };
    ($ty:ty, $name:expr) => {
        const _: () = {
            fn __register(register: &mut $crate::registry::TypeRegister) {
                register.create_type_mapping::<$ty>($name);
            }

            $crate::__macro_exports::inventory::submit! {
                $crate::__macro_exports::TypeMappingFunc(__register)
            }
        };
    };
}

/// Statically submit a type mapping.
///
/// Without the `auto_register` feature this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! register_type_mapping {
    ($ty:ty) => {};
    ($ty:ty, $name:expr) => {};
}
