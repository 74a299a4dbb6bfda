use core::fmt;

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// MethodQualifiers

bitflags! {
    /// The structural shape of a callable, input of [`MethodType::deduce`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodQualifiers: u8 {
        /// Called on a receiver.
        const MEMBER = 1 << 0;
        /// The receiver is only read.
        const CONST = 1 << 1;
        const VOLATILE = 1 << 2;
        /// Only callable on a borrowed receiver.
        const LVALUE = 1 << 3;
        /// Only callable on a consumed receiver.
        const RVALUE = 1 << 4;
        /// Never unwinds.
        const NOEXCEPT = 1 << 5;
    }
}

// -----------------------------------------------------------------------------
// MethodType

/// Classification of a callable's invocation shape.
///
/// Free functions are static methods. Member functions combine a
/// cv-qualification (none, `Volatile`, `Const`, `ConstVolatile`), a
/// receiver category (any, `Left`, `Right`) and an optional `Noexcept`,
/// which gives 26 shapes in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MethodType {
    StaticMethod,
    StaticMethodNoexcept,
    NormalMethod,
    NormalMethodNoexcept,
    NormalMethodLeft,
    NormalMethodLeftNoexcept,
    NormalMethodRight,
    NormalMethodRightNoexcept,
    VolatileMethod,
    VolatileMethodNoexcept,
    VolatileMethodLeft,
    VolatileMethodLeftNoexcept,
    VolatileMethodRight,
    VolatileMethodRightNoexcept,
    ConstMethod,
    ConstMethodNoexcept,
    ConstMethodLeft,
    ConstMethodLeftNoexcept,
    ConstMethodRight,
    ConstMethodRightNoexcept,
    ConstVolatileMethod,
    ConstVolatileMethodNoexcept,
    ConstVolatileMethodLeft,
    ConstVolatileMethodLeftNoexcept,
    ConstVolatileMethodRight,
    ConstVolatileMethodRightNoexcept,
}

impl MethodType {
    /// Every method type, in declaration order.
    pub const ALL: [MethodType; 26] = {
        use MethodType::*;
        [
            StaticMethod,
            StaticMethodNoexcept,
            NormalMethod,
            NormalMethodNoexcept,
            NormalMethodLeft,
            NormalMethodLeftNoexcept,
            NormalMethodRight,
            NormalMethodRightNoexcept,
            VolatileMethod,
            VolatileMethodNoexcept,
            VolatileMethodLeft,
            VolatileMethodLeftNoexcept,
            VolatileMethodRight,
            VolatileMethodRightNoexcept,
            ConstMethod,
            ConstMethodNoexcept,
            ConstMethodLeft,
            ConstMethodLeftNoexcept,
            ConstMethodRight,
            ConstMethodRightNoexcept,
            ConstVolatileMethod,
            ConstVolatileMethodNoexcept,
            ConstVolatileMethodLeft,
            ConstVolatileMethodLeftNoexcept,
            ConstVolatileMethodRight,
            ConstVolatileMethodRightNoexcept,
        ]
    };

    /// Classify a callable shape.
    ///
    /// Every combination of qualifiers maps to exactly one method type.
    /// Receiver qualifiers are ignored for non-members, and `LVALUE` wins
    /// when both reference bits are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_reflect::invoke::{MethodQualifiers, MethodType};
    ///
    /// let q = MethodQualifiers::MEMBER | MethodQualifiers::CONST | MethodQualifiers::RVALUE;
    /// assert_eq!(MethodType::deduce(q), MethodType::ConstMethodRight);
    /// assert_eq!(MethodType::deduce(MethodQualifiers::NOEXCEPT), MethodType::StaticMethodNoexcept);
    /// ```
    pub const fn deduce(q: MethodQualifiers) -> MethodType {
        let noexcept = q.contains(MethodQualifiers::NOEXCEPT);
        if !q.contains(MethodQualifiers::MEMBER) {
            return if noexcept {
                MethodType::StaticMethodNoexcept
            } else {
                MethodType::StaticMethod
            };
        }

        // Member shapes are laid out as 2 + cv * 6 + reference * 2 + noexcept.
        let cv = match (
            q.contains(MethodQualifiers::CONST),
            q.contains(MethodQualifiers::VOLATILE),
        ) {
            (false, false) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (true, true) => 3,
        };
        let reference = if q.contains(MethodQualifiers::LVALUE) {
            1
        } else if q.contains(MethodQualifiers::RVALUE) {
            2
        } else {
            0
        };

        Self::ALL[2 + cv * 6 + reference * 2 + noexcept as usize]
    }

    /// The canonical qualifiers of this method type.
    ///
    /// `MethodType::deduce(t.qualifiers()) == t` for every `t`.
    pub const fn qualifiers(self) -> MethodQualifiers {
        let index = self as usize;
        if index < 2 {
            return if index == 1 {
                MethodQualifiers::NOEXCEPT
            } else {
                MethodQualifiers::empty()
            };
        }

        let member = index - 2;
        let mut bits = MethodQualifiers::MEMBER.bits();
        if member % 2 == 1 {
            bits |= MethodQualifiers::NOEXCEPT.bits();
        }
        match (member / 2) % 3 {
            1 => bits |= MethodQualifiers::LVALUE.bits(),
            2 => bits |= MethodQualifiers::RVALUE.bits(),
            _ => {}
        }
        match member / 6 {
            1 => bits |= MethodQualifiers::VOLATILE.bits(),
            2 => bits |= MethodQualifiers::CONST.bits(),
            3 => bits |= MethodQualifiers::CONST.bits() | MethodQualifiers::VOLATILE.bits(),
            _ => {}
        }
        MethodQualifiers::from_bits_retain(bits)
    }

    /// Returns `true` for free functions.
    #[inline]
    pub const fn is_static(self) -> bool {
        matches!(self, Self::StaticMethod | Self::StaticMethodNoexcept)
    }

    /// Returns `true` if the receiver is only read.
    #[inline]
    pub const fn is_const(self) -> bool {
        self.qualifiers().contains(MethodQualifiers::CONST)
    }

    #[inline]
    pub const fn is_noexcept(self) -> bool {
        self.qualifiers().contains(MethodQualifiers::NOEXCEPT)
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;

    use super::{MethodQualifiers, MethodType};

    #[test]
    fn deduce_is_total_and_covers_every_type() {
        let mut seen = BTreeSet::new();
        for bits in 0..=MethodQualifiers::all().bits() {
            let q = MethodQualifiers::from_bits_truncate(bits);
            seen.insert(MethodType::deduce(q));
        }
        assert_eq!(seen.len(), 26);
        assert!(MethodType::ALL.iter().all(|t| seen.contains(t)));
    }

    #[test]
    fn canonical_qualifiers_round_trip() {
        for t in MethodType::ALL {
            assert_eq!(MethodType::deduce(t.qualifiers()), t, "{t}");
        }
        for (index, t) in MethodType::ALL.into_iter().enumerate() {
            assert_eq!(t as usize, index);
        }
    }

    #[test]
    fn shapes_are_disjoint() {
        use MethodQualifiers as Q;

        let m = Q::MEMBER;
        assert_eq!(MethodType::deduce(Q::empty()), MethodType::StaticMethod);
        assert_eq!(MethodType::deduce(Q::CONST | Q::LVALUE), MethodType::StaticMethod);
        assert_eq!(MethodType::deduce(m), MethodType::NormalMethod);
        assert_eq!(MethodType::deduce(m | Q::VOLATILE | Q::NOEXCEPT), MethodType::VolatileMethodNoexcept);
        assert_eq!(MethodType::deduce(m | Q::CONST | Q::LVALUE), MethodType::ConstMethodLeft);
        assert_eq!(
            MethodType::deduce(m | Q::CONST | Q::VOLATILE | Q::RVALUE | Q::NOEXCEPT),
            MethodType::ConstVolatileMethodRightNoexcept
        );
        assert_eq!(MethodType::deduce(m | Q::LVALUE | Q::RVALUE), MethodType::NormalMethodLeft);
    }

    #[test]
    fn predicates() {
        assert!(MethodType::StaticMethodNoexcept.is_static());
        assert!(MethodType::StaticMethodNoexcept.is_noexcept());
        assert!(!MethodType::NormalMethodRight.is_static());
        assert!(MethodType::ConstVolatileMethodLeft.is_const());
        assert!(!MethodType::VolatileMethod.is_const());
    }
}
