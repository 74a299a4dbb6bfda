use core::hash::{BuildHasher, Hash};

use foldhash::fast::{FixedState, FoldHasher};

/// The seed every [`FixedHashState`] starts from.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6C75_6D65_6E5F_7274);

/// A hasher whose results only depend on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`] .
pub type FixedHasher = FoldHasher<'static>;

/// Hash state based upon a fixed seed.
///
/// Two hashes of equal inputs are equal for the whole process lifetime,
/// which makes it suitable for precomputed hash sums.
///
/// # Examples
///
/// ```
/// use lumen_utils::hash::FixedHashState;
///
/// let a = FixedHashState::hash_of(&"point");
/// let b = FixedHashState::hash_of(&"point");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl FixedHashState {
    /// Hash a single value with the fixed seed.
    #[inline]
    pub fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        FixedHashState.hash_one(value)
    }
}

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

#[cfg(test)]
mod tests {
    use super::FixedHashState;
    use crate::hash::HashMap;

    #[test]
    fn stable_results() {
        assert_eq!(FixedHashState::hash_of(&42_u32), FixedHashState::hash_of(&42_u32));
        assert_ne!(FixedHashState::hash_of(&1_u64), FixedHashState::hash_of(&2_u64));
    }

    #[test]
    fn map_with_fixed_state() {
        let mut map: HashMap<&str, i32> = HashMap::default();
        map.insert("x", 1);
        map.insert("y", 2);
        assert_eq!(map.get("x"), Some(&1));
        assert_eq!(map.len(), 2);
    }
}
