use alloc::string::String;
use core::fmt;

use lumen_utils::hash::HashMap;

use super::Blueprint;

/// A named collection of [`Blueprint`]s.
///
/// # Examples
///
/// ```
/// use lumen_reflect::context::{AccessLevel, InstanceContext};
///
/// let mut context = InstanceContext::new();
/// context
///     .create_blueprint("Player")
///     .add_member::<u32>("level", AccessLevel::Public);
///
/// // Creating an existing name returns the existing blueprint.
/// context.create_blueprint("Player").add_member::<u64>("gold", AccessLevel::Private);
///
/// let player = context.get_blueprint("Player").unwrap();
/// assert_eq!(player.member_count(), 2);
/// ```
pub struct InstanceContext {
    blueprints: HashMap<String, Blueprint>,
}

impl InstanceContext {
    /// Capacity reserved by [`InstanceContext::new`].
    pub const PREHEAT_RESERVE: usize = 5;

    #[inline]
    pub fn new() -> Self {
        Self {
            blueprints: HashMap::with_capacity_and_hasher(Self::PREHEAT_RESERVE, Default::default()),
        }
    }

    /// Returns the blueprint named `name`, creating an empty one if absent.
    pub fn create_blueprint(&mut self, name: &str) -> &mut Blueprint {
        self.blueprints
            .entry_ref(name)
            .or_insert_with(|| Blueprint::new(name))
    }

    #[inline]
    pub fn remove_blueprint(&mut self, name: &str) -> Option<Blueprint> {
        self.blueprints.remove(name)
    }

    #[inline]
    pub fn get_blueprint(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.get(name)
    }

    #[inline]
    pub fn get_blueprint_mut(&mut self, name: &str) -> Option<&mut Blueprint> {
        self.blueprints.get_mut(name)
    }

    #[inline]
    pub fn has_blueprint(&self, name: &str) -> bool {
        self.blueprints.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Blueprint)> {
        self.blueprints.iter().map(|(name, bp)| (name.as_str(), bp))
    }
}

impl Default for InstanceContext {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Global context

#[cfg(feature = "std")]
mod global {
    use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

    use super::InstanceContext;

    static GLOBAL_CONTEXT: LazyLock<RwLock<InstanceContext>> =
        LazyLock::new(|| RwLock::new(InstanceContext::new()));

    impl InstanceContext {
        /// Takes a read lock on the process-wide context.
        pub fn read_global() -> RwLockReadGuard<'static, InstanceContext> {
            GLOBAL_CONTEXT.read().unwrap_or_else(PoisonError::into_inner)
        }

        /// Takes a write lock on the process-wide context.
        pub fn write_global() -> RwLockWriteGuard<'static, InstanceContext> {
            GLOBAL_CONTEXT.write().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InstanceContext;
    use crate::context::{AccessContext, AccessLevel};

    #[test]
    fn create_is_idempotent() {
        let mut context = InstanceContext::new();
        assert!(context.is_empty());

        context.create_blueprint("Node").add_member::<u8>("id", AccessLevel::Public);
        let again = context.create_blueprint("Node");
        assert_eq!(again.name(), "Node");
        assert_eq!(again.member_count(), 1);
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn remove_and_lookup() {
        let mut context = InstanceContext::new();
        context.create_blueprint("A");
        context.create_blueprint("B");

        assert!(context.has_blueprint("A"));
        let removed = context.remove_blueprint("A").unwrap();
        assert_eq!(removed.name(), "A");
        assert!(context.remove_blueprint("A").is_none());
        assert!(context.get_blueprint("A").is_none());

        context
            .get_blueprint_mut("B")
            .unwrap()
            .add_member::<i16>("v", AccessLevel::Private);
        let instance = context.get_blueprint("B").unwrap().create_dynamic_object();
        assert!(instance.get_member("v", AccessContext::Private).is_some());
        assert_eq!(context.iter().count(), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn global_context() {
        InstanceContext::write_global()
            .create_blueprint("instance_context::tests::Global")
            .add_member::<bool>("flag", AccessLevel::Public);

        let context = InstanceContext::read_global();
        let blueprint = context.get_blueprint("instance_context::tests::Global").unwrap();
        assert!(blueprint.has_member("flag"));
    }
}
