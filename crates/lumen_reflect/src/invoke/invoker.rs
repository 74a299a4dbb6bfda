use alloc::boxed::Box;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use super::{InvokeError, MethodType};
use crate::convert::ConvertTarget;
use crate::view::{ArgView, ObjectView, hash_sum};
use crate::{Rtti, Value};

// -----------------------------------------------------------------------------
// Shape markers

/// Shape of a free function `Fn(Args..) -> R`.
pub struct Static<Args, R>(PhantomData<fn(Args) -> R>);

/// Shape of a method reading its receiver, `Fn(&C, Args..) -> R`.
pub struct ByRef<C, Args, R>(PhantomData<fn(&C, Args) -> R>);

/// Shape of a method mutating its receiver, `Fn(&mut C, Args..) -> R`.
pub struct ByMut<C, Args, R>(PhantomData<fn(&mut C, Args) -> R>);

/// Shape of a method consuming its receiver, `Fn(C, Args..) -> R`.
///
/// The receiver is cloned out of the object view.
pub struct ByValue<C, Args, R>(PhantomData<fn(C, Args) -> R>);

// -----------------------------------------------------------------------------
// MatchTier

/// How the arguments of a call were matched against the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// The hash sums of arguments and parameters are equal.
    Exact,
    /// Every argument is compatible with its parameter.
    Compatible,
    /// At least one argument needs a conversion.
    Converted,
}

// -----------------------------------------------------------------------------
// Callable

/// A callable of shape `M`, implemented for closures and functions of
/// arity 0 to 8.
///
/// Parameters are owned [`ConvertTarget`] types. They are cloned or
/// converted out of the argument views, never borrowed.
pub trait Callable<M>: 'static {
    /// Number of declared parameters, the receiver excluded.
    const ARITY: usize;

    const METHOD_TYPE: MethodType;

    /// The identities of the declared parameters.
    fn param_types() -> Box<[Rtti]>;

    /// Whether an object of type `rtti` may be converted into parameter `index`.
    fn is_convertible_from(index: usize, rtti: &Rtti) -> bool;

    /// The receiver type, [`Rtti::void`] for free functions.
    fn which_belongs() -> Rtti;

    fn return_type() -> Rtti;

    /// The identity of the function pointer type of this shape.
    fn signature() -> Rtti;

    /// The address of `self` if it is a plain function pointer.
    fn fn_address(&self) -> Option<usize>;

    /// Extract the receiver and the arguments, then run the callable.
    ///
    /// The argument count must already match [`ARITY`](Callable::ARITY).
    fn call(
        &self,
        object: &mut ObjectView<'_>,
        args: ArgView<'_, '_>,
        tier: MatchTier,
    ) -> Result<Value, InvokeError>;
}

#[inline]
fn extract<P: ConvertTarget>(
    args: ArgView<'_, '_>,
    index: usize,
    tier: MatchTier,
) -> Result<P, InvokeError> {
    let Some(view) = args.get(index) else {
        return Err(InvokeError::ArityMismatch {
            expected: index + 1,
            found: args.len(),
        });
    };
    let value = match tier {
        MatchTier::Exact | MatchTier::Compatible => view.downcast_ref::<P>().cloned(),
        MatchTier::Converted => view.convert_to::<P>().ok(),
    };
    value.ok_or(InvokeError::ArgumentMismatch {
        index,
        expected: Rtti::of::<P>(),
        found: *view.rtti(),
    })
}

#[inline]
fn receiver_mismatch(expected: Rtti, object: &ObjectView<'_>) -> InvokeError {
    InvokeError::ReceiverMismatch {
        expected,
        found: *object.rtti(),
    }
}

macro_rules! impl_callable {
    ($n:literal: [$($idx:tt: $P:ident),*]) => {
        impl<F, R, $($P),*> Callable<Static<($($P,)*), R>> for F
        where
            F: Fn($($P),*) -> R + 'static,
            R: Any,
            $($P: ConvertTarget,)*
        {
            const ARITY: usize = $n;
            const METHOD_TYPE: MethodType = MethodType::StaticMethod;

            #[inline]
            fn param_types() -> Box<[Rtti]> {
                Box::new([$(Rtti::of::<$P>()),*])
            }

            fn is_convertible_from(index: usize, rtti: &Rtti) -> bool {
                let table: [fn(&Rtti) -> bool; $n] = [$(<$P as ConvertTarget>::is_convertible_from),*];
                table.get(index).is_some_and(|f| f(rtti))
            }

            #[inline]
            fn which_belongs() -> Rtti {
                Rtti::void()
            }

            #[inline]
            fn return_type() -> Rtti {
                Rtti::of::<R>()
            }

            #[inline]
            fn signature() -> Rtti {
                Rtti::of::<fn($($P),*) -> R>()
            }

            #[inline]
            fn fn_address(&self) -> Option<usize> {
                (self as &dyn Any)
                    .downcast_ref::<fn($($P),*) -> R>()
                    .map(|f| *f as usize)
            }

            #[allow(unused_variables, reason = "nullary callables read no arguments")]
            fn call(
                &self,
                _object: &mut ObjectView<'_>,
                args: ArgView<'_, '_>,
                tier: MatchTier,
            ) -> Result<Value, InvokeError> {
                Ok(Value::from_return((self)($(extract::<$P>(args, $idx, tier)?),*)))
            }
        }

        impl<F, C, R, $($P),*> Callable<ByRef<C, ($($P,)*), R>> for F
        where
            F: Fn(&C $(, $P)*) -> R + 'static,
            C: Any,
            R: Any,
            $($P: ConvertTarget,)*
        {
            const ARITY: usize = $n;
            const METHOD_TYPE: MethodType = MethodType::ConstMethod;

            #[inline]
            fn param_types() -> Box<[Rtti]> {
                Box::new([$(Rtti::of::<$P>()),*])
            }

            fn is_convertible_from(index: usize, rtti: &Rtti) -> bool {
                let table: [fn(&Rtti) -> bool; $n] = [$(<$P as ConvertTarget>::is_convertible_from),*];
                table.get(index).is_some_and(|f| f(rtti))
            }

            #[inline]
            fn which_belongs() -> Rtti {
                Rtti::of::<C>()
            }

            #[inline]
            fn return_type() -> Rtti {
                Rtti::of::<R>()
            }

            #[inline]
            fn signature() -> Rtti {
                Rtti::of::<fn(&C $(, $P)*) -> R>()
            }

            #[inline]
            fn fn_address(&self) -> Option<usize> {
                (self as &dyn Any)
                    .downcast_ref::<fn(&C $(, $P)*) -> R>()
                    .map(|f| *f as usize)
            }

            #[allow(unused_variables, reason = "nullary callables read no arguments")]
            fn call(
                &self,
                object: &mut ObjectView<'_>,
                args: ArgView<'_, '_>,
                tier: MatchTier,
            ) -> Result<Value, InvokeError> {
                let receiver = object
                    .downcast_ref::<C>()
                    .ok_or_else(|| receiver_mismatch(Rtti::of_ref::<C>(), object))?;
                Ok(Value::from_return((self)(receiver $(, extract::<$P>(args, $idx, tier)?)*)))
            }
        }

        impl<F, C, R, $($P),*> Callable<ByMut<C, ($($P,)*), R>> for F
        where
            F: Fn(&mut C $(, $P)*) -> R + 'static,
            C: Any,
            R: Any,
            $($P: ConvertTarget,)*
        {
            const ARITY: usize = $n;
            const METHOD_TYPE: MethodType = MethodType::NormalMethod;

            #[inline]
            fn param_types() -> Box<[Rtti]> {
                Box::new([$(Rtti::of::<$P>()),*])
            }

            fn is_convertible_from(index: usize, rtti: &Rtti) -> bool {
                let table: [fn(&Rtti) -> bool; $n] = [$(<$P as ConvertTarget>::is_convertible_from),*];
                table.get(index).is_some_and(|f| f(rtti))
            }

            #[inline]
            fn which_belongs() -> Rtti {
                Rtti::of::<C>()
            }

            #[inline]
            fn return_type() -> Rtti {
                Rtti::of::<R>()
            }

            #[inline]
            fn signature() -> Rtti {
                Rtti::of::<fn(&mut C $(, $P)*) -> R>()
            }

            #[inline]
            fn fn_address(&self) -> Option<usize> {
                (self as &dyn Any)
                    .downcast_ref::<fn(&mut C $(, $P)*) -> R>()
                    .map(|f| *f as usize)
            }

            #[allow(unused_variables, reason = "nullary callables read no arguments")]
            fn call(
                &self,
                object: &mut ObjectView<'_>,
                args: ArgView<'_, '_>,
                tier: MatchTier,
            ) -> Result<Value, InvokeError> {
                let found = *object.rtti();
                let receiver = object
                    .downcast_mut::<C>()
                    .ok_or(InvokeError::ReceiverMismatch {
                        expected: Rtti::of_mut::<C>(),
                        found,
                    })?;
                Ok(Value::from_return((self)(receiver $(, extract::<$P>(args, $idx, tier)?)*)))
            }
        }

        impl<F, C, R, $($P),*> Callable<ByValue<C, ($($P,)*), R>> for F
        where
            F: Fn(C $(, $P)*) -> R + 'static,
            C: Any + Clone,
            R: Any,
            $($P: ConvertTarget,)*
        {
            const ARITY: usize = $n;
            const METHOD_TYPE: MethodType = MethodType::NormalMethodRight;

            #[inline]
            fn param_types() -> Box<[Rtti]> {
                Box::new([$(Rtti::of::<$P>()),*])
            }

            fn is_convertible_from(index: usize, rtti: &Rtti) -> bool {
                let table: [fn(&Rtti) -> bool; $n] = [$(<$P as ConvertTarget>::is_convertible_from),*];
                table.get(index).is_some_and(|f| f(rtti))
            }

            #[inline]
            fn which_belongs() -> Rtti {
                Rtti::of::<C>()
            }

            #[inline]
            fn return_type() -> Rtti {
                Rtti::of::<R>()
            }

            #[inline]
            fn signature() -> Rtti {
                Rtti::of::<fn(C $(, $P)*) -> R>()
            }

            #[inline]
            fn fn_address(&self) -> Option<usize> {
                (self as &dyn Any)
                    .downcast_ref::<fn(C $(, $P)*) -> R>()
                    .map(|f| *f as usize)
            }

            #[allow(unused_variables, reason = "nullary callables read no arguments")]
            fn call(
                &self,
                object: &mut ObjectView<'_>,
                args: ArgView<'_, '_>,
                tier: MatchTier,
            ) -> Result<Value, InvokeError> {
                let receiver = object
                    .downcast_ref::<C>()
                    .cloned()
                    .ok_or_else(|| receiver_mismatch(Rtti::of::<C>(), object))?;
                Ok(Value::from_return((self)(receiver $(, extract::<$P>(args, $idx, tier)?)*)))
            }
        }
    };
}

lumen_utils::for_each_arity!(impl_callable);

// -----------------------------------------------------------------------------
// Invoker

/// One callable of one shape, with its parameter list precomputed.
///
/// The constructor fixes the shape and therefore the [`MethodType`]:
///
/// | constructor          | callable                 | method type         |
/// |----------------------|--------------------------|---------------------|
/// | [`from_fn`]          | `Fn(P..) -> R`           | `StaticMethod`      |
/// | [`from_method`]      | `Fn(&C, P..) -> R`       | `ConstMethod`       |
/// | [`from_method_mut`]  | `Fn(&mut C, P..) -> R`   | `NormalMethod`      |
/// | [`from_method_once`] | `Fn(C, P..) -> R`        | `NormalMethodRight` |
///
/// # Examples
///
/// ```
/// use lumen_reflect::invoke::{Invoker, MatchTier, MethodType};
/// use lumen_reflect::view::ObjectView;
/// use lumen_reflect::args;
///
/// #[derive(Default)]
/// struct Counter(i32);
///
/// impl Counter {
///     fn bump(&mut self, by: i32) -> i32 {
///         self.0 += by;
///         self.0
///     }
/// }
///
/// let bump = Invoker::from_method_mut(Counter::bump);
/// assert_eq!(bump.method_type(), MethodType::NormalMethod);
///
/// let mut counter = Counter::default();
/// let by = 5_u8;
/// let store = args![by];
///
/// assert_eq!(bump.match_tier(store.as_view()).unwrap(), MatchTier::Converted);
///
/// let mut object = ObjectView::from_mut(&mut counter);
/// let result = bump.invoke(&mut object, store.as_view()).unwrap();
/// assert_eq!(result.downcast_ref::<i32>(), Some(&5));
/// ```
///
/// [`from_fn`]: Invoker::from_fn
/// [`from_method`]: Invoker::from_method
/// [`from_method_mut`]: Invoker::from_method_mut
/// [`from_method_once`]: Invoker::from_method_once
pub struct Invoker<F, M> {
    func: F,
    param_types: Box<[Rtti]>,
    param_hash: u64,
    _marker: PhantomData<fn() -> M>,
}

impl<F, Args, R> Invoker<F, Static<Args, R>>
where
    F: Callable<Static<Args, R>>,
{
    /// Wrap a free function or a closure.
    #[inline]
    pub fn from_fn(func: F) -> Self {
        Self::new(func)
    }
}

impl<F, C, Args, R> Invoker<F, ByRef<C, Args, R>>
where
    F: Callable<ByRef<C, Args, R>>,
{
    /// Wrap a method taking `&C`.
    #[inline]
    pub fn from_method(func: F) -> Self {
        Self::new(func)
    }
}

impl<F, C, Args, R> Invoker<F, ByMut<C, Args, R>>
where
    F: Callable<ByMut<C, Args, R>>,
{
    /// Wrap a method taking `&mut C`.
    #[inline]
    pub fn from_method_mut(func: F) -> Self {
        Self::new(func)
    }
}

impl<F, C, Args, R> Invoker<F, ByValue<C, Args, R>>
where
    F: Callable<ByValue<C, Args, R>>,
{
    /// Wrap a method taking `C` by value.
    #[inline]
    pub fn from_method_once(func: F) -> Self {
        Self::new(func)
    }
}

impl<F: Callable<M>, M> Invoker<F, M> {
    fn new(func: F) -> Self {
        let param_types = F::param_types();
        let param_hash = hash_sum(param_types.iter());
        Self {
            func,
            param_types,
            param_hash,
            _marker: PhantomData,
        }
    }

    /// Returns the wrapped callable.
    #[inline(always)]
    pub fn func(&self) -> &F {
        &self.func
    }

    #[inline(always)]
    pub const fn arity(&self) -> usize {
        F::ARITY
    }

    #[inline(always)]
    pub const fn method_type(&self) -> MethodType {
        F::METHOD_TYPE
    }

    #[inline(always)]
    pub fn param_types(&self) -> &[Rtti] {
        &self.param_types
    }

    /// Wrapping sum of the parameters' hash codes.
    #[inline(always)]
    pub const fn param_hash(&self) -> u64 {
        self.param_hash
    }

    /// Decide how `args` would be matched, without calling anything.
    pub fn match_tier(&self, args: ArgView<'_, '_>) -> Result<MatchTier, InvokeError> {
        if args.len() != F::ARITY {
            return Err(InvokeError::ArityMismatch {
                expected: F::ARITY,
                found: args.len(),
            });
        }
        if args.hash_sum() == self.param_hash {
            return Ok(MatchTier::Exact);
        }
        self.slow_tier(args.iter().map(ObjectView::rtti))
    }

    /// The compatibility and conversion tiers.
    fn slow_tier<'r>(&self, rttis: impl Iterator<Item = &'r Rtti>) -> Result<MatchTier, InvokeError> {
        let mut compatible = true;
        for (index, (param, arg)) in self.param_types.iter().zip(rttis).enumerate() {
            if param.is_compatible(arg) {
                continue;
            }
            if !F::is_convertible_from(index, arg) {
                return Err(InvokeError::IncompatibleArguments);
            }
            compatible = false;
        }
        Ok(if compatible {
            MatchTier::Compatible
        } else {
            MatchTier::Converted
        })
    }

    /// Whether arguments of the given types would be accepted.
    pub fn is_invocable(&self, paramlist: &[Rtti]) -> bool {
        paramlist.len() == F::ARITY && self.slow_tier(paramlist.iter()).is_ok()
    }

    /// Call the wrapped function.
    ///
    /// `object` is the receiver and is ignored by free functions. The
    /// callable runs at most once, and never when an error is returned.
    pub fn invoke(
        &self,
        object: &mut ObjectView<'_>,
        args: ArgView<'_, '_>,
    ) -> Result<Value, InvokeError> {
        let tier = self.match_tier(args)?;

        #[cfg(all(feature = "debug", debug_assertions))]
        log::trace!("invoke `{}` with {tier:?} arguments", F::signature());

        match self.func.call(object, args, tier) {
            // Equal hash sums do not imply equal types (e.g. permuted
            // parameters). Extraction failed before the call, retry slowly.
            Err(InvokeError::ArgumentMismatch { .. }) if tier == MatchTier::Exact => {
                let tier = self.slow_tier(args.iter().map(ObjectView::rtti))?;
                self.func.call(object, args, tier)
            }
            result => result,
        }
    }
}

impl<F: Clone, M> Clone for Invoker<F, M> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            param_types: self.param_types.clone(),
            param_hash: self.param_hash,
            _marker: PhantomData,
        }
    }
}

impl<F: Callable<M>, M> fmt::Debug for Invoker<F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("signature", &F::signature())
            .field("method_type", &F::METHOD_TYPE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::{Invoker, MatchTier};
    use crate::invoke::{InvokeError, MethodType};
    use crate::view::{ArgView, ObjectView};
    use crate::{Rtti, args};

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Account {
        owner: String,
        balance: i64,
    }

    impl Account {
        fn balance(&self) -> i64 {
            self.balance
        }

        fn deposit(&mut self, amount: i64) {
            self.balance += amount;
        }

        fn into_owner(self) -> String {
            self.owner
        }
    }

    #[test]
    fn add_three_and_four() {
        let add = Invoker::from_fn(add);
        let (a, b) = (3_i32, 4_i32);
        let store = args![a, b];

        assert_eq!(add.match_tier(store.as_view()).unwrap(), MatchTier::Exact);
        let result = add.invoke(&mut ObjectView::empty(), store.as_view()).unwrap();
        assert_eq!(result.downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn arity_mismatch_never_calls() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let add = Invoker::from_fn(|a: i32, b: i32| {
            CALLS.fetch_add(1, Ordering::Relaxed);
            a + b
        });

        let a = 3_i32;
        let store = args![a];
        let err = add.invoke(&mut ObjectView::empty(), store.as_view()).unwrap_err();
        assert!(matches!(err, InvokeError::ArityMismatch { expected: 2, found: 1 }));

        let err = add.invoke(&mut ObjectView::empty(), ArgView::empty()).unwrap_err();
        assert!(matches!(err, InvokeError::ArityMismatch { expected: 2, found: 0 }));
        assert_eq!(CALLS.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn same_types_same_tier_one_call() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let scale = Invoker::from_fn(|x: f64, by: f64| {
            CALLS.fetch_add(1, Ordering::Relaxed);
            x * by
        });

        let (x, by) = (2_i32, 1.5_f32);
        let store = args![x, by];
        let first = scale.match_tier(store.as_view()).unwrap();
        assert_eq!(first, MatchTier::Converted);

        for round in 1..=3 {
            assert_eq!(scale.match_tier(store.as_view()).unwrap(), first);
            let result = scale.invoke(&mut ObjectView::empty(), store.as_view()).unwrap();
            assert_eq!(result.downcast_ref::<f64>(), Some(&3.0));
            assert_eq!(CALLS.load(Ordering::Relaxed), round);
        }
    }

    #[test]
    fn incompatible_arguments_never_call() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let negate = Invoker::from_fn(|x: i32| {
            CALLS.fetch_add(1, Ordering::Relaxed);
            -x
        });

        let text = String::from("nope");
        let store = args![text];
        let err = negate.invoke(&mut ObjectView::empty(), store.as_view()).unwrap_err();
        assert!(matches!(err, InvokeError::IncompatibleArguments));
        assert!(!negate.is_invocable(&[Rtti::of::<String>()]));
        assert!(negate.is_invocable(&[Rtti::of_ref::<u64>()]));
        assert_eq!(CALLS.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn permuted_parameters_fall_back() {
        let mix = Invoker::from_fn(|a: i32, b: f32| a as f32 + b);
        let (a, b) = (2.0_f32, 3_i32);
        let store = args![a, b];

        // The hash sum cannot tell the order apart.
        assert_eq!(mix.match_tier(store.as_view()).unwrap(), MatchTier::Exact);
        let result = mix.invoke(&mut ObjectView::empty(), store.as_view()).unwrap();
        assert_eq!(result.downcast_ref::<f32>(), Some(&5.0));
    }

    #[test]
    fn method_receivers() {
        let mut account = Account {
            owner: String::from("ada"),
            balance: 10,
        };

        let balance = Invoker::from_method(Account::balance);
        let deposit = Invoker::from_method_mut(Account::deposit);
        let into_owner = Invoker::from_method_once(Account::into_owner);
        assert_eq!(balance.method_type(), MethodType::ConstMethod);
        assert_eq!(deposit.method_type(), MethodType::NormalMethod);
        assert_eq!(into_owner.method_type(), MethodType::NormalMethodRight);

        let amount = 5_i64;
        let store = args![amount];
        let mut object = ObjectView::from_mut(&mut account);

        let result = deposit.invoke(&mut object, store.as_view()).unwrap();
        assert!(result.is_empty());

        let result = balance.invoke(&mut object, ArgView::empty()).unwrap();
        assert_eq!(result.downcast_ref::<i64>(), Some(&15));

        let result = into_owner.invoke(&mut object, ArgView::empty()).unwrap();
        assert_eq!(result.take::<String>().unwrap(), "ada");
        assert_eq!(account.balance, 15);
    }

    #[test]
    fn receiver_mismatch() {
        let deposit = Invoker::from_method_mut(Account::deposit);
        let amount = 1_i64;
        let store = args![amount];

        let account = Account::default();
        let mut shared = ObjectView::from_ref(&account);
        let err = deposit.invoke(&mut shared, store.as_view()).unwrap_err();
        assert!(matches!(err, InvokeError::ReceiverMismatch { .. }));

        let mut wrong = 0_u8;
        let mut object = ObjectView::from_mut(&mut wrong);
        let err = deposit.invoke(&mut object, store.as_view()).unwrap_err();
        assert!(matches!(err, InvokeError::ReceiverMismatch { .. }));

        let err = deposit.invoke(&mut ObjectView::empty(), store.as_view()).unwrap_err();
        assert!(matches!(err, InvokeError::ReceiverMismatch { .. }));
    }

    #[test]
    fn metadata() {
        let add = Invoker::from_fn(add);
        assert_eq!(add.arity(), 2);
        assert_eq!(add.param_types(), [Rtti::of::<i32>(), Rtti::of::<i32>()]);
        assert_eq!(add.param_hash(), Rtti::of::<i32>().hash_code().wrapping_mul(2));

        let deposit = Invoker::from_method_mut(Account::deposit);
        assert_eq!(deposit.param_types(), [Rtti::of::<i64>()]);
    }

    #[test]
    fn eight_parameters() {
        let sum = Invoker::from_fn(
            |a: u8, b: u16, c: u32, d: u64, e: i8, f: i16, g: i32, h: i64| {
                a as i64 + b as i64 + c as i64 + d as i64 + e as i64 + f as i64 + g as i64 + h
            },
        );
        let (a, b, c, d, e, f, g, h) = (1_u8, 2_u16, 3_u32, 4_u64, 5_i8, 6_i16, 7_i32, 8_i64);
        let store = args![a, b, c, d, e, f, g, h];
        let result = sum.invoke(&mut ObjectView::empty(), store.as_view()).unwrap();
        assert_eq!(result.downcast_ref::<i64>(), Some(&36));
    }
}
