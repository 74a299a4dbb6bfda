use alloc::boxed::Box;
use core::any::Any;
use core::ptr;

use super::{Callable, Function, InvokeError, Invoker, MethodType};
use crate::view::{ArgView, ObjectView};
use crate::{Rtti, Value};

// -----------------------------------------------------------------------------
// InvokerAccessor

/// The type-erased interface over every [`Invoker`].
///
/// Mismatches are reported through `Result` and `bool`, an accessor
/// never panics on bad input.
pub trait InvokerAccessor: Any {
    /// Call the function with `object` as receiver.
    fn invoke(
        &self,
        object: &mut ObjectView<'_>,
        args: ArgView<'_, '_>,
    ) -> Result<Value, InvokeError>;

    /// Call the function without arguments.
    #[inline]
    fn invoke_noargs(&self, object: &mut ObjectView<'_>) -> Result<Value, InvokeError> {
        self.invoke(object, ArgView::empty())
    }

    fn method_type(&self) -> MethodType;

    fn return_type(&self) -> Rtti;

    /// The receiver type, [`Rtti::void`] for free functions.
    fn which_belongs(&self) -> Rtti;

    /// The identity of the function pointer type of the wrapped callable.
    fn function_signature(&self) -> Rtti;

    /// The identities of the declared parameters.
    fn paramlists(&self) -> &[Rtti];

    #[inline]
    fn arity(&self) -> usize {
        self.paramlists().len()
    }

    /// Structural equality: same signature, same method type and same callable.
    ///
    /// Zero-sized callables are equal by type, function pointers by address.
    /// Any other callable is only equal to the very same accessor.
    fn equal_with(&self, other: &dyn InvokerAccessor) -> bool;

    /// Whether arguments of the given types would be accepted.
    fn is_invocable(&self, paramlist: &[Rtti]) -> bool;

    /// The wrapped callable, if `signature` is the type of the callable or
    /// the identity of [`Function`].
    ///
    /// For any identity but [`Function`], the returned value downcasts to
    /// the requested type. A function pointer is reachable through its
    /// signature, while a named function or a closure is only reachable
    /// through its own type.
    fn target(&self, signature: &Rtti) -> Option<&dyn Any>;

    /// A boxed copy of this accessor.
    fn construct_from_this(&self) -> Box<dyn InvokerAccessor>;

    fn as_any(&self) -> &dyn Any;
}

impl<F, M> InvokerAccessor for Invoker<F, M>
where
    F: Callable<M> + Clone,
    M: 'static,
{
    #[inline]
    fn invoke(
        &self,
        object: &mut ObjectView<'_>,
        args: ArgView<'_, '_>,
    ) -> Result<Value, InvokeError> {
        Invoker::invoke(self, object, args)
    }

    #[inline]
    fn method_type(&self) -> MethodType {
        F::METHOD_TYPE
    }

    #[inline]
    fn return_type(&self) -> Rtti {
        F::return_type()
    }

    #[inline]
    fn which_belongs(&self) -> Rtti {
        F::which_belongs()
    }

    #[inline]
    fn function_signature(&self) -> Rtti {
        F::signature()
    }

    #[inline]
    fn paramlists(&self) -> &[Rtti] {
        self.param_types()
    }

    fn equal_with(&self, other: &dyn InvokerAccessor) -> bool {
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return false;
        };
        if F::signature() != other.function_signature() || F::METHOD_TYPE != other.method_type() {
            return false;
        }
        if size_of::<F>() == 0 {
            return true;
        }
        match (self.func().fn_address(), other.func().fn_address()) {
            (Some(a), Some(b)) => a == b,
            _ => ptr::addr_eq(self, other),
        }
    }

    #[inline]
    fn is_invocable(&self, paramlist: &[Rtti]) -> bool {
        Invoker::is_invocable(self, paramlist)
    }

    fn target(&self, signature: &Rtti) -> Option<&dyn Any> {
        let func: &dyn Any = self.func();
        if signature.is::<Function>() || signature.base_id() == func.type_id() {
            Some(func)
        } else {
            None
        }
    }

    #[inline]
    fn construct_from_this(&self) -> Box<dyn InvokerAccessor> {
        Box::new(self.clone())
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::InvokerAccessor;
    use crate::invoke::{Function, Invoker, MethodType};
    use crate::view::ObjectView;
    use crate::{Rtti, args};

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    fn sub(a: i32, b: i32) -> i32 {
        a - b
    }

    struct Gauge(u32);

    impl Gauge {
        fn read(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn same_fn_pointer_is_equal() {
        let a = Invoker::from_fn(add as fn(i32, i32) -> i32);
        let b = Invoker::from_fn(add as fn(i32, i32) -> i32);
        let c = Invoker::from_fn(sub as fn(i32, i32) -> i32);

        assert!(a.equal_with(&b));
        assert!(!a.equal_with(&c));
    }

    #[test]
    fn distinct_fn_items_differ() {
        let a = Invoker::from_fn(add);
        let b = Invoker::from_fn(add);
        let c = Invoker::from_fn(sub);

        assert!(a.equal_with(&b));
        assert!(!a.equal_with(&c));
        assert!(!a.equal_with(&Invoker::from_fn(add as fn(i32, i32) -> i32)));
    }

    #[test]
    fn capturing_closures_equal_only_to_themselves() {
        let offset = 10_i32;
        let a = Invoker::from_fn(move |x: i32| x + offset);
        let b = a.clone();

        assert!(a.equal_with(&a));
        assert!(!a.equal_with(&b));
    }

    #[test]
    fn metadata_through_accessor() {
        let read: Box<dyn InvokerAccessor> = Box::new(Invoker::from_method(Gauge::read));

        assert_eq!(read.method_type(), MethodType::ConstMethod);
        assert_eq!(read.return_type(), Rtti::of::<u32>());
        assert_eq!(read.which_belongs(), Rtti::of::<Gauge>());
        assert_eq!(read.function_signature(), Rtti::of::<fn(&Gauge) -> u32>());
        assert!(read.paramlists().is_empty());

        let mut gauge = Gauge(4);
        let result = read.invoke_noargs(&mut ObjectView::from_mut(&mut gauge)).unwrap();
        assert_eq!(result.downcast_ref::<u32>(), Some(&4));

        let copy = read.construct_from_this();
        assert!(copy.equal_with(&*read));
    }

    #[test]
    fn invoke_noargs_on_binary_fn_fails() {
        let add = Invoker::from_fn(add);
        assert!(InvokerAccessor::invoke_noargs(&add, &mut ObjectView::empty()).is_err());

        let x = 1_i32;
        let store = args![x, x];
        assert!(InvokerAccessor::invoke(&add, &mut ObjectView::empty(), store.as_view()).is_ok());
    }

    #[test]
    fn target_by_signature() {
        let ptr = add as fn(i32, i32) -> i32;
        let add = Invoker::from_fn(ptr);

        let found = add.target(&Rtti::of::<fn(i32, i32) -> i32>()).unwrap();
        let found = found.downcast_ref::<fn(i32, i32) -> i32>().copied().unwrap();
        assert_eq!(found as usize, ptr as usize);
        assert!(add.target(&Rtti::of::<Function>()).is_some());
        assert!(add.target(&Rtti::of::<fn(i32) -> i32>()).is_none());
    }

    fn rtti_of_val<T: 'static>(_: &T) -> Rtti {
        Rtti::of::<T>()
    }

    #[test]
    fn target_always_downcasts() {
        let item = Invoker::from_fn(add);
        let signature = item.function_signature();
        assert!(item.target(&signature).is_none());

        let own = rtti_of_val(&add);
        let found = item.target(&own).unwrap();
        assert_eq!(found.type_id(), own.base_id());

        let offset = 3_i32;
        let closure = Invoker::from_fn(move |x: i32| x + offset);
        assert!(closure.target(&closure.function_signature()).is_none());
        assert!(closure.target(&rtti_of_val(closure.func())).is_some());

        let ptr = Invoker::from_fn(add as fn(i32, i32) -> i32);
        let found = ptr.target(&ptr.function_signature()).unwrap();
        assert!(found.downcast_ref::<fn(i32, i32) -> i32>().is_some());
    }
}
