use alloc::vec::Vec;
use core::slice;

use crate::Rtti;
use crate::view::ObjectView;

// -----------------------------------------------------------------------------
// ArgView

/// The borrowed argument list of one call.
///
/// An `ArgView` is never resized, it only reads the views of an
/// [`ArgStore`] or any other slice of [`ObjectView`]s.
#[derive(Clone, Copy)]
pub struct ArgView<'s, 'a> {
    views: &'s [ObjectView<'a>],
}

impl<'s, 'a> ArgView<'s, 'a> {
    /// An argument list with no arguments.
    #[inline]
    pub const fn empty() -> Self {
        Self { views: &[] }
    }

    #[inline]
    pub const fn new(views: &'s [ObjectView<'a>]) -> Self {
        Self { views }
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.views.len()
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&'s ObjectView<'a>> {
        self.views.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'s, ObjectView<'a>> {
        self.views.iter()
    }

    #[inline(always)]
    pub const fn as_slice(&self) -> &'s [ObjectView<'a>] {
        self.views
    }

    /// The identities of all arguments, in order.
    pub fn paramlist(&self) -> Vec<Rtti> {
        self.views.iter().map(|view| *view.rtti()).collect()
    }

    /// Wrapping sum of the arguments' hash codes.
    #[inline]
    pub fn hash_sum(&self) -> u64 {
        hash_sum(self.views.iter().map(ObjectView::rtti))
    }
}

impl<'s, 'a> From<&'s [ObjectView<'a>]> for ArgView<'s, 'a> {
    #[inline]
    fn from(views: &'s [ObjectView<'a>]) -> Self {
        Self::new(views)
    }
}

impl<'s, 'a> IntoIterator for ArgView<'s, 'a> {
    type Item = &'s ObjectView<'a>;
    type IntoIter = slice::Iter<'s, ObjectView<'a>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

impl core::fmt::Debug for ArgView<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.views).finish()
    }
}

/// Wrapping sum of hash codes, the fast-path key of parameter matching.
#[inline]
pub(crate) fn hash_sum<'r>(rttis: impl IntoIterator<Item = &'r Rtti>) -> u64 {
    rttis
        .into_iter()
        .fold(0_u64, |acc, rtti| acc.wrapping_add(rtti.hash_code()))
}

// -----------------------------------------------------------------------------
// ArgStore

/// Fixed-size storage of the argument views of one call.
///
/// Usually built with the [`args!`](crate::args) macro.
///
/// # Examples
///
/// ```
/// use lumen_reflect::args;
///
/// let (a, b) = (1_i32, String::from("two"));
/// let store = args![a, b];
/// let view = store.as_view();
///
/// assert_eq!(view.len(), 2);
/// assert!(view.get(1).unwrap().is::<String>());
/// ```
pub struct ArgStore<'a, const N: usize> {
    views: [ObjectView<'a>; N],
}

impl<'a, const N: usize> ArgStore<'a, N> {
    #[inline]
    pub const fn new(views: [ObjectView<'a>; N]) -> Self {
        Self { views }
    }

    #[inline]
    pub fn as_view(&self) -> ArgView<'_, 'a> {
        ArgView::new(&self.views)
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

/// Build an [`ArgStore`] of shared views over the given places.
///
/// Arguments must outlive the store, so pass variables or constants
/// rather than temporaries.
#[macro_export]
macro_rules! args {
    () => {
        $crate::view::ArgStore::new([])
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::view::ArgStore::new([$($crate::view::ObjectView::from_ref(&$arg)),+])
    };
}

/// Build an array of [`Rtti`]s, the parameter list of a signature.
///
/// ```
/// use lumen_reflect::{paramlist, Rtti};
///
/// let list = paramlist![i32, String];
/// assert_eq!(list, [Rtti::of::<i32>(), Rtti::of::<String>()]);
/// ```
#[macro_export]
macro_rules! paramlist {
    () => {{
        let list: [$crate::Rtti; 0] = [];
        list
    }};
    ($($ty:ty),+ $(,)?) => {
        [$($crate::Rtti::of::<$ty>()),+]
    };
}
