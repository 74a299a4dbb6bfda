use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use lumen_utils::hash::FixedHashState;

// -----------------------------------------------------------------------------
// RefKind

/// How a value is reached through an [`Rtti`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// The value itself, `T`.
    Value,
    /// A shared borrow, `&T`.
    Shared,
    /// An exclusive borrow, `&mut T`.
    Exclusive,
}

// -----------------------------------------------------------------------------
// Rtti

/// The "no type" marker behind [`Rtti::void`].
enum Void {}

/// Runtime identity of a type.
///
/// An `Rtti` is the base [`TypeId`] of a type plus the [`RefKind`] it was
/// reached through. The hash code only depends on the base type, so `T`,
/// `&T` and `&mut T` collapse onto one hash, while [`is_same`] still tells
/// them apart.
///
/// # Examples
///
/// ```
/// use lumen_reflect::Rtti;
///
/// let value = Rtti::of::<String>();
/// let shared = Rtti::of_ref::<String>();
///
/// assert!(!value.is_same(&shared));
/// assert!(value.is_compatible(&shared));
/// assert_eq!(value.hash_code(), shared.hash_code());
/// ```
///
/// [`is_same`]: Rtti::is_same
#[derive(Clone, Copy)]
pub struct Rtti {
    base: TypeId,
    kind: RefKind,
    hash: u64,
    name: fn() -> &'static str,
}

impl Rtti {
    #[inline]
    fn with_kind_of<T: Any + ?Sized>(kind: RefKind) -> Self {
        let base = TypeId::of::<T>();
        Self {
            base,
            kind,
            hash: FixedHashState::hash_of(&base),
            name: type_name::<T>,
        }
    }

    /// Identity of `T` itself.
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self::with_kind_of::<T>(RefKind::Value)
    }

    /// Identity of `&T`.
    #[inline]
    pub fn of_ref<T: Any + ?Sized>() -> Self {
        Self::with_kind_of::<T>(RefKind::Shared)
    }

    /// Identity of `&mut T`.
    #[inline]
    pub fn of_mut<T: Any + ?Sized>() -> Self {
        Self::with_kind_of::<T>(RefKind::Exclusive)
    }

    /// The "no type" identity carried by empty views and values.
    #[inline]
    pub fn void() -> Self {
        Self::of::<Void>()
    }

    /// Returns `true` if this is the [`void`](Rtti::void) identity.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.base == TypeId::of::<Void>()
    }

    /// The same base type reached through another [`RefKind`].
    #[inline]
    pub const fn with_kind(self, kind: RefKind) -> Self {
        Self { kind, ..self }
    }

    /// The base type with the reference category removed.
    #[inline]
    pub const fn decay(self) -> Self {
        self.with_kind(RefKind::Value)
    }

    /// Returns the [`TypeId`] of the base type.
    #[inline(always)]
    pub const fn base_id(&self) -> TypeId {
        self.base
    }

    /// Returns the reference category.
    #[inline(always)]
    pub const fn kind(&self) -> RefKind {
        self.kind
    }

    /// Fixed-seed hash of the base type.
    #[inline(always)]
    pub const fn hash_code(&self) -> u64 {
        self.hash
    }

    /// The name of the base type, see [`core::any::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    /// Check if the base type is `T`.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.base == TypeId::of::<T>()
    }

    /// Exact identity: same base type and same reference category.
    #[inline]
    pub fn is_same(&self, other: &Rtti) -> bool {
        self.base == other.base && self.kind == other.kind
    }

    /// Whether a value described by `other` may be used where `self` is expected.
    ///
    /// Reference categories collapse, except that a shared borrow never
    /// satisfies an expected exclusive borrow.
    ///
    /// ```
    /// use lumen_reflect::Rtti;
    ///
    /// assert!(Rtti::of::<i32>().is_compatible(&Rtti::of_mut::<i32>()));
    /// assert!(Rtti::of_ref::<i32>().is_compatible(&Rtti::of_mut::<i32>()));
    /// assert!(!Rtti::of_mut::<i32>().is_compatible(&Rtti::of_ref::<i32>()));
    /// assert!(!Rtti::of::<i32>().is_compatible(&Rtti::of::<i64>()));
    /// ```
    #[inline]
    pub fn is_compatible(&self, other: &Rtti) -> bool {
        self.base == other.base
            && !(self.kind == RefKind::Exclusive && other.kind == RefKind::Shared)
    }
}

impl PartialEq for Rtti {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Rtti {}

impl Hash for Rtti {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Display for Rtti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RefKind::Value => f.write_str(self.name()),
            RefKind::Shared => write!(f, "&{}", self.name()),
            RefKind::Exclusive => write!(f, "&mut {}", self.name()),
        }
    }
}

impl fmt::Debug for Rtti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rtti({self})")
    }
}
