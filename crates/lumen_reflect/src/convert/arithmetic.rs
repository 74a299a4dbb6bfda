use core::any::TypeId;

use super::ConvertTarget;
use crate::Rtti;
use crate::view::ObjectView;

/// An arithmetic source value, widened to the largest type of its family.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

macro_rules! read_number {
    ($view:ident; $($variant:ident => [$($ty:ty),*]),*) => {
        $($(
            if let Some(v) = $view.downcast_ref::<$ty>() {
                return Some(Number::$variant(*v as _));
            }
        )*)*
    };
}

impl Number {
    /// Every source type, one entry per stored type.
    const SOURCES: [fn() -> TypeId; 14] = [
        TypeId::of::<i8>,
        TypeId::of::<i16>,
        TypeId::of::<i32>,
        TypeId::of::<i64>,
        TypeId::of::<isize>,
        TypeId::of::<u8>,
        TypeId::of::<u16>,
        TypeId::of::<u32>,
        TypeId::of::<u64>,
        TypeId::of::<usize>,
        TypeId::of::<f32>,
        TypeId::of::<f64>,
        TypeId::of::<bool>,
        TypeId::of::<char>,
    ];

    #[inline]
    fn accepts(rtti: &Rtti) -> bool {
        let id = rtti.base_id();
        Self::SOURCES.iter().any(|f| f() == id)
    }

    fn read(view: &ObjectView<'_>) -> Option<Self> {
        read_number!(view;
            Int => [i8, i16, i32, i64, isize],
            UInt => [u8, u16, u32, u64, usize],
            Float => [f32, f64]
        );
        if let Some(v) = view.downcast_ref::<bool>() {
            return Some(Number::Bool(*v));
        }
        if let Some(v) = view.downcast_ref::<char>() {
            return Some(Number::Char(*v));
        }
        None
    }
}

macro_rules! impl_numeric_target {
    ($($ty:ty),*) => {$(
        impl ConvertTarget for $ty {
            fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
                Some(match Number::read(view)? {
                    Number::Int(v) => v as $ty,
                    Number::UInt(v) => v as $ty,
                    Number::Float(v) => v as $ty,
                    Number::Bool(v) => u8::from(v) as $ty,
                    Number::Char(v) => u32::from(v) as $ty,
                })
            }

            #[inline]
            fn is_convertible_from(rtti: &Rtti) -> bool {
                Number::accepts(rtti)
            }
        }
    )*};
}

impl_numeric_target!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ConvertTarget for bool {
    fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
        Some(match Number::read(view)? {
            Number::Int(v) => v != 0,
            Number::UInt(v) => v != 0,
            Number::Float(v) => v != 0.0,
            Number::Bool(v) => v,
            Number::Char(v) => v != '\0',
        })
    }

    #[inline]
    fn is_convertible_from(rtti: &Rtti) -> bool {
        Number::accepts(rtti)
    }
}

impl ConvertTarget for char {
    /// Integers are read as code points, other sources are rejected.
    fn convert_from(view: &ObjectView<'_>) -> Option<Self> {
        match Number::read(view)? {
            Number::Int(v) => char::from_u32(u32::try_from(v).ok()?),
            Number::UInt(v) => char::from_u32(u32::try_from(v).ok()?),
            Number::Char(v) => Some(v),
            Number::Float(_) | Number::Bool(_) => None,
        }
    }

    #[inline]
    fn is_convertible_from(rtti: &Rtti) -> bool {
        Number::accepts(rtti) && !rtti.is::<f32>() && !rtti.is::<f64>() && !rtti.is::<bool>()
    }
}

#[cfg(test)]
mod tests {
    use crate::Rtti;
    use crate::convert::ConvertTarget;
    use crate::view::ObjectView;

    #[test]
    fn identity_for_every_primitive() {
        macro_rules! check {
            ($($value:expr),*) => {$(
                let x = $value;
                assert_eq!(ObjectView::from_ref(&x).convert_to().ok(), Some(x));
            )*};
        }
        check!(
            -8_i8, -16_i16, -32_i32, -64_i64, -1_isize,
            8_u8, 16_u16, 32_u32, 64_u64, 1_usize,
            1.5_f32, 2.5_f64, true, 'z'
        );
    }

    #[test]
    fn cast_semantics() {
        let x = -1_i32;
        let view = ObjectView::from_ref(&x);
        assert_eq!(view.convert_to::<u8>().unwrap(), u8::MAX);
        assert_eq!(view.convert_to::<i64>().unwrap(), -1);
        assert_eq!(view.convert_to::<f32>().unwrap(), -1.0);
        assert!(view.convert_to::<bool>().unwrap());

        let f = 3.9_f64;
        assert_eq!(ObjectView::from_ref(&f).convert_to::<i16>().unwrap(), 3);

        let b = true;
        assert_eq!(ObjectView::from_ref(&b).convert_to::<u64>().unwrap(), 1);
    }

    #[test]
    fn char_targets() {
        let code = 0x41_u32;
        assert_eq!(ObjectView::from_ref(&code).convert_to::<char>().unwrap(), 'A');

        let c = 'a';
        assert_eq!(ObjectView::from_ref(&c).convert_to::<u8>().unwrap(), b'a');

        let f = 65.0_f64;
        assert!(ObjectView::from_ref(&f).convert_to::<char>().is_err());
        assert!(!char::is_convertible_from(&Rtti::of::<f64>()));
    }

    #[test]
    fn convertible_sources() {
        assert!(i32::is_convertible_from(&Rtti::of::<u8>()));
        assert!(f64::is_convertible_from(&Rtti::of_mut::<bool>()));
        assert!(!u16::is_convertible_from(&Rtti::of::<alloc::string::String>()));
    }
}
