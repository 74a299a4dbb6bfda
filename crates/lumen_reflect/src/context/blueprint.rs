use alloc::string::String;
use core::any::Any;
use core::fmt;

use lumen_utils::hash::HashMap;

use super::{AccessLevel, BlueprintError, DynamicInstance, Member};
use crate::registry::{TypeEntry, TypeRegister};
use crate::{Rtti, Value};

// -----------------------------------------------------------------------------
// BlueprintMember

/// The declaration of one member of a [`Blueprint`].
#[derive(Clone, Copy)]
pub struct BlueprintMember {
    access_level: AccessLevel,
    creator: Option<fn() -> Value>,
    rtti: Rtti,
}

impl BlueprintMember {
    #[inline(always)]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    #[inline(always)]
    pub fn rtti(&self) -> Rtti {
        self.rtti
    }

    #[inline(always)]
    pub fn creator(&self) -> Option<fn() -> Value> {
        self.creator
    }

    /// The initial value of the member, empty if it has no thunk.
    #[inline]
    pub fn create(&self) -> Value {
        self.creator.map_or_else(Value::empty, |f| f())
    }
}

impl fmt::Debug for BlueprintMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueprintMember")
            .field("access_level", &self.access_level)
            .field("rtti", &self.rtti)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Blueprint

/// A runtime class shape: named, typed members with access levels.
///
/// Member names are unique. Adding an empty name or a name that already
/// exists leaves the blueprint unchanged.
///
/// # Examples
///
/// ```
/// use lumen_reflect::context::{AccessContext, AccessLevel, Blueprint};
///
/// let mut point = Blueprint::new("Point");
/// point
///     .add_member::<i32>("x", AccessLevel::Public)
///     .add_member::<i32>("y", AccessLevel::Public);
///
/// let instance = point.create_dynamic_object();
/// assert_eq!(instance.blueprint_name(), "Point");
/// assert_eq!(instance.member_count(), 2);
///
/// let x = instance.get_member("x", AccessContext::Public).unwrap();
/// assert_eq!(x.getter::<i32>(AccessContext::Public).unwrap(), &0);
/// ```
pub struct Blueprint {
    name: String,
    members: HashMap<String, BlueprintMember>,
}

impl Blueprint {
    /// Capacity reserved for members by [`Blueprint::new`].
    #[cfg(target_pointer_width = "32")]
    pub const PREHEAT_RESERVE: usize = 4;
    /// Capacity reserved for members by [`Blueprint::new`].
    #[cfg(not(target_pointer_width = "32"))]
    pub const PREHEAT_RESERVE: usize = 6;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashMap::with_capacity_and_hasher(Self::PREHEAT_RESERVE, Default::default()),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn insert_member(&mut self, name: &str, member: BlueprintMember) {
        if name.is_empty() || self.members.contains_key(name) {
            return;
        }
        self.members.insert(String::from(name), member);
    }

    /// Declare a member of type `T`.
    ///
    /// With the `std` feature, `T` is also mapped in the global
    /// [`TypeRegister`] under [`Rtti::name`], so it can be found by
    /// [`add_member_by_typename`](Blueprint::add_member_by_typename).
    ///
    /// # Deadlocks
    ///
    /// Takes the write lock of the global register when `T` is not mapped
    /// yet. Do not call it while holding [`TypeRegister::read_global`].
    pub fn add_member<T: Default + Any>(&mut self, name: &str, level: AccessLevel) -> &mut Self {
        if name.is_empty() || self.members.contains_key(name) {
            return self;
        }
        let entry = TypeEntry::of::<T>();

        #[cfg(feature = "std")]
        {
            let type_name = entry.rtti().name();
            if !TypeRegister::read_global().has_type_mapping(type_name) {
                TypeRegister::write_global().create_type_mapping::<T>(type_name);
            }
        }

        self.insert_entry(name, entry, level);
        self
    }

    fn insert_entry(&mut self, name: &str, entry: TypeEntry, level: AccessLevel) {
        self.insert_member(
            name,
            BlueprintMember {
                access_level: level,
                creator: entry.creator(),
                rtti: entry.rtti(),
            },
        );
    }

    /// Declare a member whose type is looked up by name in `register`.
    ///
    /// Unknown type names are skipped with a warning.
    pub fn add_member_by_typename(
        &mut self,
        register: &TypeRegister,
        type_name: &str,
        name: &str,
        level: AccessLevel,
    ) -> &mut Self {
        if type_name.is_empty() || name.is_empty() || self.members.contains_key(name) {
            return self;
        }
        let entry = register.get_type(type_name);
        if !entry.is_valid() {
            log::warn!(
                "blueprint `{}` skips member `{name}`: type `{type_name}` is not registered",
                self.name
            );
            return self;
        }
        self.insert_entry(name, entry, level);
        self
    }

    /// Declare a member by identity.
    ///
    /// The type is resolved in `register` by identity, whatever name it is
    /// mapped under. Unmapped types are skipped with a warning.
    pub fn add_member_by_rtti(
        &mut self,
        register: &TypeRegister,
        rtti: &Rtti,
        name: &str,
        level: AccessLevel,
    ) -> &mut Self {
        if rtti.is_void() || name.is_empty() || self.members.contains_key(name) {
            return self;
        }
        let entry = register.find_type(rtti);
        if !entry.is_valid() {
            log::warn!(
                "blueprint `{}` skips member `{name}`: type `{rtti}` is not registered",
                self.name
            );
            return self;
        }
        self.insert_entry(name, entry, level);
        self
    }

    /// Returns `true` if a member was removed.
    #[inline]
    pub fn remove_member(&mut self, name: &str) -> bool {
        self.members.remove(name).is_some()
    }

    #[inline]
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    #[inline]
    pub fn member(&self, name: &str) -> Option<&BlueprintMember> {
        self.members.get(name)
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Iterate over all member declarations, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlueprintMember)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    /// Instantiate the blueprint with default-constructed members.
    pub fn create_dynamic_object(&self) -> DynamicInstance {
        let members = self
            .iter()
            .map(|(name, decl)| {
                let member = Member::with_type(String::from(name), decl.access_level, decl.rtti, decl.create());
                (String::from(name), member)
            })
            .collect();
        DynamicInstance::from_members(self.name.clone(), members)
    }

    /// Instantiate the blueprint, taking some initial values from `overrides`.
    ///
    /// Every override must be compatible with the declared type of its
    /// member. Overrides naming no member are skipped with a warning. When
    /// a name is given several times, the last value is kept and a warning
    /// is logged.
    ///
    /// ```
    /// use lumen_reflect::context::{AccessContext, AccessLevel, Blueprint};
    /// use lumen_reflect::Value;
    ///
    /// let mut point = Blueprint::new("Point");
    /// point.add_member::<i32>("x", AccessLevel::Public);
    ///
    /// let instance = point.create_dynamic_object_with([("x", Value::new(3_i32))]).unwrap();
    /// let x = instance.get_member("x", AccessContext::Public).unwrap();
    /// assert_eq!(x.getter::<i32>(AccessContext::Public).unwrap(), &3);
    ///
    /// assert!(point.create_dynamic_object_with([("x", Value::new(3.0_f32))]).is_err());
    /// ```
    pub fn create_dynamic_object_with<'k>(
        &self,
        overrides: impl IntoIterator<Item = (&'k str, Value)>,
    ) -> Result<DynamicInstance, BlueprintError> {
        let mut initial: HashMap<&str, Value> = HashMap::default();
        for (name, value) in overrides {
            if initial.insert(name, value).is_some() {
                log::warn!(
                    "blueprint `{}` got several initial values for `{name}`, the last one is kept",
                    self.name
                );
            }
        }
        let mut members = HashMap::with_capacity_and_hasher(self.members.len(), Default::default());

        for (name, decl) in self.iter() {
            let data = match initial.remove(name) {
                Some(value) => {
                    if !decl.rtti.is_compatible(&value.rtti()) {
                        return Err(BlueprintError::TypeMismatch {
                            member: String::from(name),
                            expected: decl.rtti,
                            found: value.rtti(),
                        });
                    }
                    value
                }
                None => decl.create(),
            };
            let member = Member::with_type(String::from(name), decl.access_level, decl.rtti, data);
            members.insert(String::from(name), member);
        }

        for name in initial.keys() {
            log::warn!("blueprint `{}` has no member `{name}`, initial value skipped", self.name);
        }

        Ok(DynamicInstance::from_members(self.name.clone(), members))
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("members", &self.members)
            .finish()
    }
}
