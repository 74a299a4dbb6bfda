use core::fmt;

/// The access level of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessLevel {
    Public,
    Protected,
    /// The level used when none is given.
    #[default]
    Private,
    /// No context may access the member.
    Inaccessible,
}

/// The privilege level claimed by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessContext {
    #[default]
    Public,
    Protected,
    Private,
}

impl AccessLevel {
    /// Whether a caller in `context` may access a member of this level.
    ///
    /// ```
    /// use lumen_reflect::context::{AccessContext, AccessLevel};
    ///
    /// assert!(AccessLevel::Public.allows(AccessContext::Public));
    /// assert!(AccessLevel::Protected.allows(AccessContext::Private));
    /// assert!(!AccessLevel::Private.allows(AccessContext::Protected));
    /// assert!(!AccessLevel::Inaccessible.allows(AccessContext::Private));
    /// ```
    #[inline]
    pub const fn allows(self, context: AccessContext) -> bool {
        match self {
            AccessLevel::Public => true,
            AccessLevel::Protected => {
                matches!(context, AccessContext::Protected | AccessContext::Private)
            }
            AccessLevel::Private => matches!(context, AccessContext::Private),
            AccessLevel::Inaccessible => false,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessLevel::Public => "public",
            AccessLevel::Protected => "protected",
            AccessLevel::Private => "private",
            AccessLevel::Inaccessible => "inaccessible",
        })
    }
}

impl fmt::Display for AccessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessContext::Public => "public",
            AccessContext::Protected => "protected",
            AccessContext::Private => "private",
        })
    }
}
