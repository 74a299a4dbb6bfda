use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use lumen_utils::hash::HashMap;

use crate::{Rtti, Value};

// -----------------------------------------------------------------------------
// TypeEntry

/// The identity of a registered type and its default-construct thunk.
#[derive(Clone, Copy)]
pub struct TypeEntry {
    rtti: Rtti,
    creator: Option<fn() -> Value>,
}

impl TypeEntry {
    /// The entry returned for unknown names.
    #[inline]
    pub fn none() -> Self {
        Self {
            rtti: Rtti::void(),
            creator: None,
        }
    }

    /// Create an entry for `T`, default-constructed through [`Default`].
    #[inline]
    pub fn of<T: Default + Any>() -> Self {
        Self {
            rtti: Rtti::of::<T>(),
            creator: Some(default_value::<T>),
        }
    }

    #[inline]
    pub const fn from_parts(rtti: Rtti, creator: Option<fn() -> Value>) -> Self {
        Self { rtti, creator }
    }

    #[inline(always)]
    pub const fn rtti(&self) -> Rtti {
        self.rtti
    }

    #[inline(always)]
    pub const fn creator(&self) -> Option<fn() -> Value> {
        self.creator
    }

    /// Returns `false` for the entry of an unknown name.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.rtti.is_void()
    }

    /// Run the thunk, if any.
    #[inline]
    pub fn create(&self) -> Option<Value> {
        self.creator.map(|f| f())
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("rtti", &self.rtti)
            .field("default", &self.creator.is_some())
            .finish()
    }
}

fn default_value<T: Default + Any>() -> Value {
    Value::new(T::default())
}

// -----------------------------------------------------------------------------
// TypeRegister

/// Name based registry of runtime types.
///
/// Each name maps to the [`Rtti`] of a type and a thunk producing its
/// default value, which is what runtime class shapes use to build their
/// members from a type name.
///
/// # Examples
///
/// ```
/// use lumen_reflect::registry::TypeRegister;
/// use lumen_reflect::Rtti;
///
/// #[derive(Default)]
/// struct Vec2 {
///     x: f32,
///     y: f32,
/// }
///
/// let mut register = TypeRegister::new();
/// register.create_type_mapping::<Vec2>("Vec2");
///
/// assert_eq!(register.get_type("Vec2").rtti(), Rtti::of::<Vec2>());
/// assert!(register.get_type("Vec3").rtti().is_void());
///
/// let value = register.generate_default("i32").unwrap();
/// assert_eq!(value.downcast_ref::<i32>(), Some(&0));
/// ```
pub struct TypeRegister {
    types: HashMap<Cow<'static, str>, TypeEntry>,
}

macro_rules! register_builtins {
    ($register:ident; $($ty:ty => $name:literal),* $(,)?) => {
        $($register.create_type_mapping::<$ty>($name);)*
    };
}

impl TypeRegister {
    /// Capacity reserved by [`TypeRegister::new`].
    #[cfg(target_pointer_width = "32")]
    pub const PREHEAT_RESERVE: usize = 64;
    /// Capacity reserved by [`TypeRegister::new`].
    #[cfg(not(target_pointer_width = "32"))]
    pub const PREHEAT_RESERVE: usize = 80;

    /// Create a register without any mapping.
    #[inline]
    pub fn empty() -> Self {
        Self {
            types: HashMap::default(),
        }
    }

    /// Create a register with the builtin types mapped.
    ///
    /// Builtins are mapped under their short names: `bool`, `char`,
    /// `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64`, `String`,
    /// `Vec<bool>`, `Vec<i32>`, `Vec<char>`, `Vec<f32>`, `Vec<f64>` and `Value`.
    pub fn new() -> Self {
        let mut register = Self {
            types: HashMap::with_capacity_and_hasher(Self::PREHEAT_RESERVE, Default::default()),
        };
        register_builtins!(register;
            bool => "bool",
            char => "char",
            i8 => "i8",
            i16 => "i16",
            i32 => "i32",
            i64 => "i64",
            isize => "isize",
            u8 => "u8",
            u16 => "u16",
            u32 => "u32",
            u64 => "u64",
            usize => "usize",
            f32 => "f32",
            f64 => "f64",
            String => "String",
            Vec<bool> => "Vec<bool>",
            Vec<i32> => "Vec<i32>",
            Vec<char> => "Vec<char>",
            Vec<f32> => "Vec<f32>",
            Vec<f64> => "Vec<f64>",
            Value => "Value",
        );
        register
    }

    /// Map `name` to `T`.
    ///
    /// An existing mapping is kept, so registering twice is harmless.
    pub fn create_type_mapping<T: Default + Any>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.insert_entry(name.into(), TypeEntry::of::<T>());
        self
    }

    /// Map `name` to an arbitrary entry, keeping an existing mapping.
    pub fn create_type_mapping_with(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        rtti: Rtti,
        creator: Option<fn() -> Value>,
    ) -> &mut Self {
        self.insert_entry(name.into(), TypeEntry::from_parts(rtti, creator));
        self
    }

    fn insert_entry(&mut self, name: Cow<'static, str>, entry: TypeEntry) {
        if let Some(old) = self.types.get(&*name) {
            log::trace!("type mapping `{name}` already exists as `{}`", old.rtti);
            return;
        }
        self.types.insert(name, entry);
    }

    /// Returns the entry of `name`, or [`TypeEntry::none`] if absent.
    #[inline]
    pub fn get_type(&self, name: &str) -> TypeEntry {
        self.types.get(name).copied().unwrap_or_else(TypeEntry::none)
    }

    /// Default-construct the type mapped to `name`.
    ///
    /// Returns `None` for an empty or unknown name and for entries without
    /// a thunk.
    pub fn generate_default(&self, name: &str) -> Option<Value> {
        if name.is_empty() {
            return None;
        }
        self.types.get(name)?.create()
    }

    /// Returns `true` if a mapping was removed.
    #[inline]
    pub fn remove_type_mapping(&mut self, name: &str) -> bool {
        self.types.remove(name).is_some()
    }

    #[inline]
    pub fn has_type_mapping(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all mappings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeEntry)> {
        self.types.iter().map(|(name, entry)| (&**name, entry))
    }

    /// Returns an entry whose type has the same base as `rtti`, or
    /// [`TypeEntry::none`] if the type is not mapped under any name.
    ///
    /// Entries with a default thunk are preferred.
    pub fn find_type(&self, rtti: &Rtti) -> TypeEntry {
        self.types
            .values()
            .filter(|entry| entry.rtti.base_id() == rtti.base_id())
            .max_by_key(|entry| entry.creator.is_some())
            .copied()
            .unwrap_or_else(TypeEntry::none)
    }

    /// All names mapped to a type with the same base as `rtti`.
    pub fn names_of(&self, rtti: &Rtti) -> Vec<&str> {
        self.iter()
            .filter(|(_, entry)| entry.rtti.base_id() == rtti.base_id())
            .map(|(name, _)| name)
            .collect()
    }

    /// Apply every mapping submitted with [`register_type_mapping!`].
    ///
    /// Returns `true` if static registration is supported on the current
    /// platform. Repeated calls do not insert duplicates.
    ///
    /// This method requires the `auto_register` feature, without it this
    /// does nothing and returns `false`.
    ///
    /// [`register_type_mapping!`]: crate::register_type_mapping
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            let mut available = false;
            for func in inventory::iter::<crate::__macro_exports::TypeMappingFunc> {
                (func.0)(self);
                available = true;
            }
            available
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl Default for TypeRegister {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Global register

#[cfg(feature = "std")]
mod global {
    use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

    use super::TypeRegister;

    static GLOBAL_REGISTER: LazyLock<RwLock<TypeRegister>> = LazyLock::new(|| {
        let mut register = TypeRegister::new();
        let static_registration = register.auto_register();
        log::debug!(
            "global type register ready with {} mappings (static registration: {static_registration})",
            register.len(),
        );
        RwLock::new(register)
    });

    impl TypeRegister {
        /// Takes a read lock on the process-wide register.
        ///
        /// The register is built on first access from [`TypeRegister::new`]
        /// plus [`TypeRegister::auto_register`].
        pub fn read_global() -> RwLockReadGuard<'static, TypeRegister> {
            GLOBAL_REGISTER.read().unwrap_or_else(PoisonError::into_inner)
        }

        /// Takes a write lock on the process-wide register.
        pub fn write_global() -> RwLockWriteGuard<'static, TypeRegister> {
            GLOBAL_REGISTER.write().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{TypeEntry, TypeRegister};
    use crate::{Rtti, Value};

    #[derive(Default, Debug, PartialEq)]
    struct Color(u8, u8, u8);

    #[test]
    fn builtins() {
        let register = TypeRegister::new();
        assert_eq!(register.len(), 21);
        assert_eq!(register.get_type("String").rtti(), Rtti::of::<String>());
        assert_eq!(register.get_type("Vec<f32>").rtti(), Rtti::of::<Vec<f32>>());
        assert!(register.generate_default("Value").unwrap().is::<Value>());
        assert!(TypeRegister::empty().is_empty());
    }

    #[test]
    fn mapping_is_idempotent() {
        let mut register = TypeRegister::empty();
        register
            .create_type_mapping::<Color>("Color")
            .create_type_mapping::<u8>("Color");

        assert_eq!(register.len(), 1);
        assert_eq!(register.get_type("Color").rtti(), Rtti::of::<Color>());
        assert_eq!(register.names_of(&Rtti::of_ref::<Color>()), ["Color"]);
    }

    #[test]
    fn find_by_identity() {
        let mut register = TypeRegister::new();
        register.create_type_mapping_with("Opaque", Rtti::of::<Color>(), None);
        assert!(register.find_type(&Rtti::of::<Color>()).create().is_none());

        register.create_type_mapping::<Color>("Color");
        let entry = register.find_type(&Rtti::of_mut::<Color>());
        assert_eq!(entry.rtti(), Rtti::of::<Color>());
        assert!(entry.creator().is_some());

        assert_eq!(register.find_type(&Rtti::of::<String>()).rtti(), Rtti::of::<String>());
        assert!(!register.find_type(&Rtti::of::<Vec<u8>>()).is_valid());
    }

    #[test]
    fn generate_default_rules() {
        let mut register = TypeRegister::empty();
        register.create_type_mapping::<Color>("Color");
        register.create_type_mapping_with("Opaque", Rtti::of::<Color>(), None);

        let value = register.generate_default("Color").unwrap();
        assert_eq!(value.downcast_ref::<Color>(), Some(&Color(0, 0, 0)));
        assert!(register.generate_default("").is_none());
        assert!(register.generate_default("Missing").is_none());
        assert!(register.generate_default("Opaque").is_none());
    }

    #[test]
    fn remove_and_sentinel() {
        let mut register = TypeRegister::new();
        assert!(register.remove_type_mapping("u8"));
        assert!(!register.remove_type_mapping("u8"));
        assert!(!register.has_type_mapping("u8"));

        let entry = register.get_type("u8");
        assert!(!entry.is_valid());
        assert!(entry.creator().is_none());
        assert!(TypeEntry::none().rtti().is_void());
    }

    #[cfg(feature = "auto_register")]
    mod auto {
        use super::Color;
        use crate::registry::TypeRegister;
        use crate::{Rtti, register_type_mapping};

        #[derive(Default)]
        struct Meters;

        register_type_mapping!(Meters);
        register_type_mapping!(Color, "test::Color");

        #[test]
        fn static_registration() {
            let mut register = TypeRegister::empty();
            assert!(register.auto_register());
            assert_eq!(register.get_type("Meters").rtti(), Rtti::of::<Meters>());
            assert_eq!(register.get_type("test::Color").rtti(), Rtti::of::<Color>());

            let len = register.len();
            register.auto_register();
            assert_eq!(register.len(), len);
        }

        #[cfg(feature = "std")]
        #[test]
        fn global_register_sees_submissions() {
            assert!(TypeRegister::read_global().has_type_mapping("Meters"));
            assert!(TypeRegister::read_global().has_type_mapping("f64"));
        }
    }
}
