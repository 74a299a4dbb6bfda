use core::any::Any;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::convert::{ConvertError, ConvertTarget};
use crate::{RefKind, Rtti};

// -----------------------------------------------------------------------------
// ObjectView

/// A non-owning, type-tagged view of an object, similar to `&'a dyn Any`.
///
/// # validity
///
/// An empty view carries [`Rtti::void`] and no pointer. A view is
/// [`valid`](ObjectView::valid) iff its identity is not void.
///
/// # borrow-like
///
/// A view built from `&'a mut T` is exclusive: it is not `Clone`, and
/// a second handle can only be made through [`reborrow`](ObjectView::reborrow).
///
/// # Examples
///
/// ```
/// use lumen_reflect::view::ObjectView;
///
/// let mut x = 8_i32;
/// let mut view = ObjectView::from_mut(&mut x);
///
/// assert!(view.is::<i32>());
/// *view.downcast_mut::<i32>().unwrap() += 1;
/// assert_eq!(view.convert_to::<f64>().unwrap(), 9.0);
/// ```
pub struct ObjectView<'a> {
    ptr: Option<NonNull<u8>>,
    rtti: Rtti,
    _marker: PhantomData<&'a ()>,
}

impl<'a> ObjectView<'a> {
    /// The "non-existent instance" marker.
    #[inline]
    pub fn empty() -> Self {
        Self {
            ptr: None,
            rtti: Rtti::void(),
            _marker: PhantomData,
        }
    }

    /// A shared view of `value`.
    #[inline]
    pub fn from_ref<T: Any>(value: &'a T) -> Self {
        Self {
            ptr: Some(NonNull::from(value).cast()),
            rtti: Rtti::of_ref::<T>(),
            _marker: PhantomData,
        }
    }

    /// An exclusive view of `value`.
    #[inline]
    pub fn from_mut<T: Any>(value: &'a mut T) -> Self {
        Self {
            ptr: Some(NonNull::from(value).cast()),
            rtti: Rtti::of_mut::<T>(),
            _marker: PhantomData,
        }
    }

    /// An exclusive view of the object behind a raw pointer.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a valid, aligned `T` for the whole lifetime `'a`.
    /// - No other reference may access the object while the view is alive.
    ///
    /// # Panics
    ///
    /// Panics if `ptr` is null.
    #[track_caller]
    #[inline]
    pub unsafe fn from_raw<T: Any>(ptr: *mut T) -> Self {
        let Some(ptr) = NonNull::new(ptr) else {
            panic!("cannot build an object view of `{}` from a null pointer", core::any::type_name::<T>());
        };
        Self {
            ptr: Some(ptr.cast()),
            rtti: Rtti::of_mut::<T>(),
            _marker: PhantomData,
        }
    }

    /// Create a view from a type-erased pointer and its identity.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a valid object of the base type of `rtti`
    ///   for the whole lifetime `'a`.
    /// - If `rtti` is not [`RefKind::Shared`], no other reference may
    ///   access the object while the view is alive.
    #[inline]
    pub const unsafe fn from_erased(ptr: NonNull<u8>, rtti: Rtti) -> Self {
        Self {
            ptr: Some(ptr),
            rtti,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if the view refers to an object.
    #[inline]
    pub fn valid(&self) -> bool {
        !self.rtti.is_void()
    }

    /// Returns the identity of the viewed object.
    #[inline(always)]
    pub fn rtti(&self) -> &Rtti {
        &self.rtti
    }

    /// Returns the type-erased address, `None` for an empty view.
    #[inline(always)]
    pub fn get_pointer(&self) -> Option<NonNull<u8>> {
        self.ptr
    }

    /// Move the view out, leaving an empty view behind.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// A second handle with a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> ObjectView<'_> {
        ObjectView {
            ptr: self.ptr,
            rtti: self.rtti,
            _marker: PhantomData,
        }
    }

    /// A shared handle with a shorter lifetime.
    #[inline]
    pub fn shared(&self) -> ObjectView<'_> {
        let rtti = if self.valid() {
            self.rtti.with_kind(RefKind::Shared)
        } else {
            self.rtti
        };
        ObjectView {
            ptr: self.ptr,
            rtti,
            _marker: PhantomData,
        }
    }

    /// Check if the viewed object is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.rtti.is::<T>()
    }

    // -------------------------------------------------------------------------
    // Unchecked layer

    /// Reinterpret the viewed object as `T` without a type check.
    ///
    /// Returns `None` only if the view is empty.
    ///
    /// # Safety
    ///
    /// The viewed object must be a valid `T`.
    #[inline]
    pub unsafe fn unchecked_cast<T>(&self) -> Option<&T> {
        let ptr = self.ptr?;
        // SAFETY: The caller ensures the pointee is a `T`, the lifetime is bound to `&self`.
        Some(unsafe { ptr.cast::<T>().as_ref() })
    }

    /// Reinterpret the viewed object as `&mut T` without a type check.
    ///
    /// Returns `None` only if the view is empty.
    ///
    /// # Safety
    ///
    /// - The viewed object must be a valid `T`.
    /// - The view must grant exclusive access.
    #[inline]
    pub unsafe fn unchecked_cast_mut<T>(&mut self) -> Option<&mut T> {
        let ptr = self.ptr?;
        // SAFETY: The caller ensures the pointee is a `T` and that access is exclusive.
        Some(unsafe { ptr.cast::<T>().as_mut() })
    }

    /// Reinterpret the viewed object as `T` without a type check.
    ///
    /// # Safety
    ///
    /// The viewed object must be a valid `T`.
    ///
    /// # Panics
    ///
    /// Panics if the view is empty.
    #[track_caller]
    #[inline]
    pub unsafe fn as_unchecked<T>(&self) -> &T {
        match self.ptr {
            // SAFETY: The caller ensures the pointee is a `T`.
            Some(ptr) => unsafe { ptr.cast::<T>().as_ref() },
            None => panic!("dereferenced an empty object view as `{}`", core::any::type_name::<T>()),
        }
    }

    // -------------------------------------------------------------------------
    // Checked layer

    /// Returns a reference to the object if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if self.is::<T>() {
            // SAFETY: The identity was checked above.
            unsafe { self.unchecked_cast() }
        } else {
            None
        }
    }

    /// Returns a mutable reference to the object if it is a `T`.
    ///
    /// Always `None` for shared views.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        if self.is::<T>() && self.rtti.kind() != RefKind::Shared {
            // SAFETY: The identity was checked above, the view is not shared.
            unsafe { self.unchecked_cast_mut() }
        } else {
            None
        }
    }

    /// Produce a `T` from the viewed object.
    ///
    /// A compatible object is cloned out. Otherwise the conversion rules of
    /// `T`'s [`ConvertTarget`] implementation are applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_reflect::view::ObjectView;
    ///
    /// let x = 300_i32;
    /// let view = ObjectView::from_ref(&x);
    ///
    /// assert_eq!(view.convert_to::<i32>().unwrap(), 300);
    /// assert_eq!(view.convert_to::<u8>().unwrap(), 44);
    /// assert!(view.convert_to::<String>().is_err());
    /// ```
    pub fn convert_to<T: ConvertTarget>(&self) -> Result<T, ConvertError> {
        if !self.valid() {
            return Err(ConvertError::InvalidView);
        }

        let target = Rtti::of::<T>();
        if target.is_compatible(&self.rtti) || target.hash_code() == self.rtti.hash_code() {
            if let Some(value) = self.downcast_ref::<T>() {
                return Ok(value.clone());
            }
        }

        T::convert_from(self).ok_or(ConvertError::NoConversion {
            from: self.rtti.decay(),
            to: target,
        })
    }
}

impl Default for ObjectView<'_> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ObjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(ptr) => write!(f, "ObjectView({} @ {ptr:p})", self.rtti),
            None => f.write_str("ObjectView(<empty>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::ObjectView;
    use crate::convert::ConvertError;
    use crate::{RefKind, Rtti};

    #[test]
    fn empty_view() {
        let view = ObjectView::default();
        assert!(!view.valid());
        assert!(view.rtti().is_void());
        assert!(view.get_pointer().is_none());
        assert!(view.downcast_ref::<i32>().is_none());
        assert!(matches!(view.convert_to::<i32>(), Err(ConvertError::InvalidView)));
    }

    #[test]
    fn take_leaves_empty() {
        let x = 1_u8;
        let mut view = ObjectView::from_ref(&x);
        let moved = view.take();
        assert!(!view.valid());
        assert_eq!(moved.downcast_ref::<u8>(), Some(&1));
    }

    #[test]
    fn shared_views_refuse_mutation() {
        let mut x = 5_i64;
        let mut view = ObjectView::from_mut(&mut x);
        assert!(view.reborrow().downcast_mut::<i64>().is_some());

        let mut shared = view.shared();
        assert_eq!(shared.rtti().kind(), RefKind::Shared);
        assert!(shared.downcast_mut::<i64>().is_none());
        assert_eq!(shared.downcast_ref::<i64>(), Some(&5));
    }

    #[test]
    fn unchecked_layer() {
        let s = String::from("text");
        let view = ObjectView::from_ref(&s);
        let empty = ObjectView::empty();
        unsafe {
            assert_eq!(view.as_unchecked::<String>(), "text");
            assert!(empty.unchecked_cast::<String>().is_none());
        }
    }

    #[test]
    #[should_panic]
    fn as_unchecked_on_empty_panics() {
        let view = ObjectView::empty();
        let _ = unsafe { view.as_unchecked::<i32>() };
    }

    #[test]
    #[should_panic]
    fn from_null_panics() {
        let _ = unsafe { ObjectView::from_raw::<i32>(core::ptr::null_mut()) };
    }

    #[test]
    fn from_raw_is_exclusive() {
        let mut x = 2_u32;
        let mut view = unsafe { ObjectView::from_raw(&raw mut x) };
        assert_eq!(*view.rtti(), Rtti::of_mut::<u32>());
        *view.downcast_mut::<u32>().unwrap() = 3;
        assert_eq!(x, 3);
    }

    #[test]
    fn no_conversion_reports_types() {
        let x = 1_i32;
        let err = ObjectView::from_ref(&x).convert_to::<Option<i32>>().unwrap_err();
        match err {
            ConvertError::NoConversion { from, to } => {
                assert_eq!(from, Rtti::of::<i32>());
                assert_eq!(to, Rtti::of::<Option<i32>>());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
