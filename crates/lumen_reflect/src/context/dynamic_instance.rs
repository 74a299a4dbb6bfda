use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use lumen_utils::hash::HashMap;

use super::{AccessContext, AccessLevel, MemberError};
use crate::{Rtti, Value};

// -----------------------------------------------------------------------------
// Member

/// One member of a [`DynamicInstance`].
///
/// The declared type is fixed when the member is created, later writes
/// must be compatible with it.
pub struct Member {
    name: String,
    access_level: AccessLevel,
    rtti: Rtti,
    data: Value,
}

impl Member {
    /// Create a member whose declared type is the type of `data`.
    #[inline]
    pub fn new(name: impl Into<String>, access_level: AccessLevel, data: Value) -> Self {
        let rtti = data.rtti();
        Self::with_type(name.into(), access_level, rtti, data)
    }

    #[inline]
    pub(crate) fn with_type(name: String, access_level: AccessLevel, rtti: Rtti, data: Value) -> Self {
        Self {
            name,
            access_level,
            rtti,
            data,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// The declared type of this member.
    #[inline(always)]
    pub fn rtti(&self) -> Rtti {
        self.rtti
    }

    #[inline]
    pub fn can_access(&self, context: AccessContext) -> bool {
        self.access_level.allows(context)
    }

    /// The stored value, without an access check.
    #[inline(always)]
    pub fn value(&self) -> &Value {
        &self.data
    }

    fn check_access(&self, context: AccessContext) -> Result<(), MemberError> {
        if self.can_access(context) {
            Ok(())
        } else {
            Err(MemberError::AccessDenied {
                member: self.name.clone(),
                level: self.access_level,
                context,
            })
        }
    }

    fn mismatch(&self, found: Rtti) -> MemberError {
        MemberError::TypeMismatch {
            member: self.name.clone(),
            expected: self.rtti,
            found,
        }
    }

    /// Read the member as a `T`.
    pub fn getter<T: Any>(&self, context: AccessContext) -> Result<&T, MemberError> {
        self.check_access(context)?;
        self.data
            .downcast_ref::<T>()
            .ok_or_else(|| self.mismatch(Rtti::of::<T>()))
    }

    /// Borrow the member mutably as a `T`.
    pub fn getter_mut<T: Any>(&mut self, context: AccessContext) -> Result<&mut T, MemberError> {
        self.check_access(context)?;
        self.data
            .downcast_mut::<T>()
            .ok_or_else(|| MemberError::TypeMismatch {
                member: self.name.clone(),
                expected: self.rtti,
                found: Rtti::of::<T>(),
            })
    }

    /// Replace the member with `value`.
    pub fn setter<T: Any>(&mut self, value: T, context: AccessContext) -> Result<(), MemberError> {
        self.set_value(Value::new(value), context)
    }

    /// Replace the member with a type-erased value.
    pub fn set_value(&mut self, value: Value, context: AccessContext) -> Result<(), MemberError> {
        self.check_access(context)?;
        if !self.rtti.is_compatible(&value.rtti()) {
            return Err(self.mismatch(value.rtti()));
        }
        self.data = value;
        Ok(())
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("access_level", &self.access_level)
            .field("data", &self.data)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DynamicInstance

/// An object materialised from a [`Blueprint`](super::Blueprint).
///
/// Lookups through [`get_member`](DynamicInstance::get_member) are lenient
/// and return `None` on a missing member or a denied access. The direct
/// accessors of [`Member`] and
/// [`set_member_data`](DynamicInstance::set_member_data) report the reason.
///
/// # Examples
///
/// ```
/// use lumen_reflect::context::{AccessContext, AccessLevel, DynamicInstance};
/// use lumen_reflect::Value;
///
/// let mut point = DynamicInstance::new("Point");
/// point.add_member("x", AccessLevel::Public, Value::new(1_i32), AccessContext::Private);
/// point.add_member("secret", AccessLevel::Private, Value::new(7_u8), AccessContext::Private);
///
/// assert!(point.get_member("secret", AccessContext::Public).is_none());
/// assert_eq!(point.member_names(AccessContext::Public), ["x"]);
///
/// point.set_member_data("x", 5_i32, AccessContext::Public).unwrap();
/// let x = point.get_member("x", AccessContext::Public).unwrap();
/// assert_eq!(x.getter::<i32>(AccessContext::Public).unwrap(), &5);
/// ```
pub struct DynamicInstance {
    blueprint_name: String,
    members: HashMap<String, Member>,
}

impl DynamicInstance {
    /// Create an instance without members.
    #[inline]
    pub fn new(blueprint_name: impl Into<String>) -> Self {
        Self::from_members(blueprint_name.into(), HashMap::default())
    }

    #[inline]
    pub(crate) fn from_members(blueprint_name: String, members: HashMap<String, Member>) -> Self {
        Self {
            blueprint_name,
            members,
        }
    }

    #[inline(always)]
    pub fn blueprint_name(&self) -> &str {
        &self.blueprint_name
    }

    /// The declared type of a member.
    #[inline]
    pub fn typeinfo(&self, member_name: &str) -> Option<Rtti> {
        self.members.get(member_name).map(Member::rtti)
    }

    #[inline]
    pub fn get_access_level(&self, member_name: &str) -> Option<AccessLevel> {
        self.members.get(member_name).map(Member::access_level)
    }

    /// Returns the member if it exists and `context` may access it.
    pub fn get_member(&self, member_name: &str, context: AccessContext) -> Option<&Member> {
        self.members
            .get(member_name)
            .filter(|member| member.can_access(context))
    }

    /// Returns the member if it exists and `context` may access it.
    pub fn get_member_mut(&mut self, member_name: &str, context: AccessContext) -> Option<&mut Member> {
        self.members
            .get_mut(member_name)
            .filter(|member| member.can_access(context))
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Replace the value of a member.
    pub fn set_member_data<T: Any>(
        &mut self,
        member_name: &str,
        value: T,
        context: AccessContext,
    ) -> Result<(), MemberError> {
        self.members
            .get_mut(member_name)
            .ok_or_else(|| MemberError::NotFound(String::from(member_name)))?
            .setter(value, context)
    }

    #[inline]
    pub fn has_member(&self, member_name: &str) -> bool {
        self.members.contains_key(member_name)
    }

    #[inline]
    pub fn can_access_member(&self, member_name: &str, context: AccessContext) -> bool {
        self.get_member(member_name, context).is_some()
    }

    /// Iterate over all members, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    /// Names of the members `context` may access.
    pub fn member_names(&self, context: AccessContext) -> Vec<&str> {
        self.iter()
            .filter(|(_, member)| member.can_access(context))
            .map(|(name, _)| name)
            .collect()
    }

    /// Add a member, only allowed with [`AccessContext::Private`].
    ///
    /// Returns `false` if the context is not private or the name is taken.
    pub fn add_member(
        &mut self,
        name: &str,
        access_level: AccessLevel,
        data: Value,
        context: AccessContext,
    ) -> bool {
        if context != AccessContext::Private || self.members.contains_key(name) {
            return false;
        }
        let member = Member::new(name, access_level, data);
        self.members.insert(String::from(name), member);
        true
    }

    /// Remove a member, only allowed with [`AccessContext::Private`].
    pub fn remove_member(&mut self, name: &str, context: AccessContext) -> bool {
        context == AccessContext::Private && self.members.remove(name).is_some()
    }
}

impl fmt::Debug for DynamicInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicInstance")
            .field("blueprint_name", &self.blueprint_name)
            .field("members", &self.members.values().collect::<Vec<_>>())
            .finish()
    }
}
