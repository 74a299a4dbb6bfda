/// Calls the target macro once for every arity from `0` to `8`.
///
/// Each call receives the arity followed by an indexed list of
/// generic parameter names, which is what tuple-like and
/// function-like trait implementations usually need.
///
/// # Example
///
/// ```
/// macro_rules! count_params {
///     ($n:literal: [$($idx:tt: $P:ident),*]) => {
///         let names: [&str; $n] = [$(stringify!($P)),*];
///         assert_eq!(names.len(), $n);
///     };
/// }
///
/// # fn main() {
/// lumen_utils::for_each_arity!(count_params);
/// # }
/// ```
#[macro_export]
macro_rules! for_each_arity {
    ($(#[$meta:meta])* $macro:ident) => {
        $(#[$meta])* $macro!(0: []);
        $(#[$meta])* $macro!(1: [0: P0]);
        $(#[$meta])* $macro!(2: [0: P0, 1: P1]);
        $(#[$meta])* $macro!(3: [0: P0, 1: P1, 2: P2]);
        $(#[$meta])* $macro!(4: [0: P0, 1: P1, 2: P2, 3: P3]);
        $(#[$meta])* $macro!(5: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4]);
        $(#[$meta])* $macro!(6: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5]);
        $(#[$meta])* $macro!(7: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6]);
        $(#[$meta])* $macro!(8: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7]);
    };
}

#[cfg(test)]
mod tests {
    trait Arity {
        const ARITY: usize;
    }

    macro_rules! impl_arity {
        ($n:literal: [$($idx:tt: $P:ident),*]) => {
            impl<$($P,)*> Arity for ($($P,)*) {
                const ARITY: usize = $n;
            }
        };
    }

    crate::for_each_arity!(impl_arity);

    #[test]
    fn tuple_arity() {
        assert_eq!(<() as Arity>::ARITY, 0);
        assert_eq!(<(u8,) as Arity>::ARITY, 1);
        assert_eq!(<(u8, u16, u32) as Arity>::ARITY, 3);
        assert_eq!(<(u8, u8, u8, u8, u8, u8, u8, u8) as Arity>::ARITY, 8);
    }
}
