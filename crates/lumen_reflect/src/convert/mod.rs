//! Conversion rules used by [`ObjectView::convert_to`].
//!
//! Every type an invoker takes as a parameter implements [`ConvertTarget`].
//! A compatible object is always cloned out directly, the trait only
//! decides what happens when the stored type differs:
//!
//! - arithmetic targets (`i8` through `f64`, `bool`, `char`) accept any
//!   arithmetic source and cast it with `as` semantics;
//! - `String`, `Box<str>` and `Cow<'static, str>` accept the other string
//!   representations;
//! - everything else accepts nothing unless it overrides the hooks.
//!
//! User types opt in with [`impl_convert_target!`](crate::impl_convert_target),
//! or implement the trait by hand to add their own rules.
//!
//! # Examples
//!
//! ```
//! use lumen_reflect::convert::ConvertTarget;
//! use lumen_reflect::view::ObjectView;
//! use lumen_reflect::Rtti;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Meters(f64);
//!
//! impl ConvertTarget for Meters {
//!     fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
//!         f64::convert_from(view).map(Meters)
//!     }
//!
//!     fn is_convertible_from(rtti: &Rtti) -> bool {
//!         f64::is_convertible_from(rtti)
//!     }
//! }
//!
//! let raw = 12_i32;
//! let meters = ObjectView::from_ref(&raw).convert_to::<Meters>();
//! assert_eq!(meters.unwrap(), Meters(12.0));
//! ```
//!
//! [`ObjectView::convert_to`]: crate::view::ObjectView::convert_to

mod arithmetic;
mod error;
mod string;

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use core::any::Any;

pub use error::ConvertError;

use crate::Rtti;
use crate::view::ObjectView;

// -----------------------------------------------------------------------------
// ConvertTarget

/// A type that can be produced out of an [`ObjectView`].
///
/// Both hooks are only consulted when the viewed object is not already
/// compatible with `Self`.
pub trait ConvertTarget: Any + Clone {
    /// Build `Self` from an object of another type.
    #[inline]
    fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
        let _ = view;
        None
    }

    /// Whether [`convert_from`](ConvertTarget::convert_from) may succeed for
    /// objects of type `rtti`.
    #[inline]
    fn is_convertible_from(rtti: &Rtti) -> bool {
        let _ = rtti;
        false
    }
}

/// Implement [`ConvertTarget`] with no extra conversion rules.
///
/// ```
/// #[derive(Clone)]
/// struct Token(u32);
///
/// lumen_reflect::impl_convert_target!(Token);
/// ```
#[macro_export]
macro_rules! impl_convert_target {
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::convert::ConvertTarget for $ty {})+
    };
}

impl_convert_target!(&'static str, Rtti);

impl<T: Any + Clone> ConvertTarget for Vec<T> {}
impl<T: Any + Clone> ConvertTarget for VecDeque<T> {}
impl<T: Any + Clone> ConvertTarget for Option<T> {}
impl<T: Any + Clone> ConvertTarget for Box<[T]> {}
impl<K: Any + Clone, V: Any + Clone> ConvertTarget for BTreeMap<K, V> {}

impl<T: Any + Clone, const N: usize> ConvertTarget for [T; N] {}

macro_rules! impl_tuple_target {
    ($n:literal: [$($idx:tt: $P:ident),*]) => {
        impl<$($P: Any + Clone),*> ConvertTarget for ($($P,)*) {}
    };
}

lumen_utils::for_each_arity!(impl_tuple_target);

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{ConvertError, ConvertTarget};
    use crate::Rtti;
    use crate::view::ObjectView;

    #[derive(Clone, Debug, PartialEq)]
    struct Celsius(f32);

    impl_convert_target!(Celsius);

    #[test]
    fn compatible_objects_clone_out() {
        let list = vec![1_u8, 2, 3];
        let view = ObjectView::from_ref(&list);
        assert_eq!(view.convert_to::<Vec<u8>>().unwrap(), list);

        let c = Celsius(21.5);
        assert_eq!(ObjectView::from_ref(&c).convert_to::<Celsius>().unwrap(), c);
    }

    #[test]
    fn default_hooks_refuse() {
        assert!(!Celsius::is_convertible_from(&Rtti::of::<f32>()));

        let raw = 21.5_f32;
        let err = ObjectView::from_ref(&raw).convert_to::<Celsius>();
        assert!(matches!(err, Err(ConvertError::NoConversion { .. })));
    }

    #[test]
    fn tuples_are_targets() {
        let pair = (1_i32, String::from("one"));
        let view = ObjectView::from_ref(&pair);
        assert_eq!(view.convert_to::<(i32, String)>().unwrap(), pair);
        assert!(view.convert_to::<(i32,)>().is_err());
    }
}
