use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;
use core::ptr::NonNull;

use crate::{RefKind, Rtti};
use crate::view::ObjectView;

/// An owned, type-erased value.
///
/// A `Value` either holds one `'static` value together with its [`Rtti`],
/// or is empty and carries [`Rtti::void`].
///
/// # Examples
///
/// ```
/// use lumen_reflect::{Rtti, Value};
///
/// let mut value = Value::new(40_i32);
/// assert_eq!(value.rtti(), Rtti::of::<i32>());
///
/// *value.downcast_mut::<i32>().unwrap() += 2;
/// assert_eq!(value.take::<i32>().ok(), Some(42));
/// ```
pub struct Value {
    rtti: Rtti,
    data: Option<Box<dyn Any>>,
}

impl Value {
    /// Create an empty value.
    #[inline]
    pub fn empty() -> Self {
        Self {
            rtti: Rtti::void(),
            data: None,
        }
    }

    /// Create a value that owns `value`.
    #[inline]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            rtti: Rtti::of::<T>(),
            data: Some(Box::new(value)),
        }
    }

    /// Wrap the result of a call, `()` becomes an empty value.
    #[inline]
    pub(crate) fn from_return<R: Any>(value: R) -> Self {
        if TypeId::of::<R>() == TypeId::of::<()>() {
            Self::empty()
        } else {
            Self::new(value)
        }
    }

    /// Returns `true` if no value is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Returns the identity of the stored value, [`Rtti::void`] when empty.
    #[inline(always)]
    pub fn rtti(&self) -> Rtti {
        self.rtti
    }

    /// Check if the stored value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.data.as_ref().is_some_and(|b| b.is::<T>())
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.as_ref()?.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.as_mut()?.downcast_mut()
    }

    /// Move the stored value out.
    ///
    /// Returns `self` unchanged if it does not hold a `T`.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        let Self { rtti, data } = self;
        match data {
            Some(b) => match b.downcast::<T>() {
                Ok(v) => Ok(*v),
                Err(b) => Err(Self { rtti, data: Some(b) }),
            },
            None => Err(Self { rtti, data: None }),
        }
    }

    /// A shared view of the stored value, or an empty view.
    pub fn view(&self) -> ObjectView<'_> {
        match &self.data {
            Some(b) => {
                let ptr = NonNull::from(&**b).cast::<u8>();
                // SAFETY: `ptr` points to the stored value, described by `rtti`,
                // and is borrowed for the lifetime of `&self`.
                unsafe { ObjectView::from_erased(ptr, self.rtti.with_kind(RefKind::Shared)) }
            }
            None => ObjectView::empty(),
        }
    }

    /// An exclusive view of the stored value, or an empty view.
    pub fn view_mut(&mut self) -> ObjectView<'_> {
        let rtti = self.rtti.with_kind(RefKind::Exclusive);
        match &mut self.data {
            Some(b) => {
                let ptr = NonNull::from(&mut **b).cast::<u8>();
                // SAFETY: `ptr` points to the stored value and is exclusively
                // borrowed for the lifetime of `&mut self`.
                unsafe { ObjectView::from_erased(ptr, rtti) }
            }
            None => ObjectView::empty(),
        }
    }
}

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Value(<empty>)")
        } else {
            write!(f, "Value({})", self.rtti)
        }
    }
}
