use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use super::{Callable, InvokeError, Invoker, InvokerAccessor, MethodType};
use crate::view::{ArgView, ObjectView};
use crate::{Rtti, Value};

/// An owning handle over a boxed [`InvokerAccessor`].
///
/// `Function` is cloned through [`construct_from_this`] and compared
/// through [`equal_with`]. Named functions, non-capturing closures and
/// function pointers compare equal to their clones. A capturing closure
/// is only equal to the very same `Function`, so its clone compares
/// unequal.
///
/// # Examples
///
/// ```
/// use lumen_reflect::invoke::{Function, Invoker};
/// use lumen_reflect::{args, Rtti};
///
/// fn shout(text: String) -> String {
///     text.to_uppercase()
/// }
///
/// let shout = Function::from(Invoker::from_fn(shout));
/// let copy = shout.clone();
/// assert_eq!(shout, copy);
///
/// let text: &'static str = "hi";
/// let store = args![text];
/// assert!(shout.is_invocable(&[Rtti::of::<&'static str>()]));
///
/// let result = copy.invoke_static(store.as_view()).unwrap();
/// assert_eq!(result.take::<String>().unwrap(), "HI");
/// ```
///
/// [`construct_from_this`]: InvokerAccessor::construct_from_this
/// [`equal_with`]: InvokerAccessor::equal_with
pub struct Function {
    accessor: Box<dyn InvokerAccessor>,
}

impl Function {
    #[inline]
    pub fn new<A: InvokerAccessor>(accessor: A) -> Self {
        Self {
            accessor: Box::new(accessor),
        }
    }

    #[inline]
    pub fn from_boxed(accessor: Box<dyn InvokerAccessor>) -> Self {
        Self { accessor }
    }

    #[inline(always)]
    pub fn accessor(&self) -> &dyn InvokerAccessor {
        &*self.accessor
    }

    #[inline]
    pub fn invoke(
        &self,
        object: &mut ObjectView<'_>,
        args: ArgView<'_, '_>,
    ) -> Result<Value, InvokeError> {
        self.accessor.invoke(object, args)
    }

    /// Call the function without a receiver.
    #[inline]
    pub fn invoke_static(&self, args: ArgView<'_, '_>) -> Result<Value, InvokeError> {
        self.accessor.invoke(&mut ObjectView::empty(), args)
    }

    #[inline]
    pub fn invoke_noargs(&self, object: &mut ObjectView<'_>) -> Result<Value, InvokeError> {
        self.accessor.invoke_noargs(object)
    }

    #[inline]
    pub fn is_invocable(&self, paramlist: &[Rtti]) -> bool {
        self.accessor.is_invocable(paramlist)
    }

    /// Returns the wrapped callable if it is a `T`.
    ///
    /// `T` is usually a function pointer type such as `fn(i32) -> i32`.
    /// A named function is only reachable this way when it was wrapped as
    /// a function pointer, e.g. `Invoker::from_fn(square as fn(i32) -> i32)`.
    pub fn target<T: Any>(&self) -> Option<&T> {
        self.accessor.target(&Rtti::of::<T>())?.downcast_ref()
    }

    #[inline]
    pub fn method_type(&self) -> MethodType {
        self.accessor.method_type()
    }

    #[inline]
    pub fn return_type(&self) -> Rtti {
        self.accessor.return_type()
    }

    #[inline]
    pub fn which_belongs(&self) -> Rtti {
        self.accessor.which_belongs()
    }

    #[inline]
    pub fn function_signature(&self) -> Rtti {
        self.accessor.function_signature()
    }

    #[inline]
    pub fn paramlists(&self) -> &[Rtti] {
        self.accessor.paramlists()
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.accessor.arity()
    }
}

impl<F, M> From<Invoker<F, M>> for Function
where
    F: Callable<M> + Clone,
    M: 'static,
{
    #[inline]
    fn from(invoker: Invoker<F, M>) -> Self {
        Self::new(invoker)
    }
}

impl Clone for Function {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.construct_from_this(),
        }
    }
}

impl PartialEq for Function {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.accessor.equal_with(other.accessor())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.function_signature())
            .field("method_type", &self.method_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Function;
    use crate::invoke::{InvokeError, Invoker, MethodType};
    use crate::view::ObjectView;
    use crate::{Rtti, args};

    #[derive(Clone, Default)]
    struct Stack(Vec<i32>);

    impl Stack {
        fn push(&mut self, value: i32) -> usize {
            self.0.push(value);
            self.0.len()
        }

        fn peek(&self) -> Option<i32> {
            self.0.last().copied()
        }
    }

    fn square(x: i32) -> i32 {
        x * x
    }

    #[test]
    fn methods_through_functions() {
        let push = Function::from(Invoker::from_method_mut(Stack::push));
        let peek = Function::from(Invoker::from_method(Stack::peek));
        assert_ne!(push, peek);

        let mut stack = Stack::default();
        let mut object = ObjectView::from_mut(&mut stack);
        let (a, b) = (1_i32, 2_u16);

        let first = args![a];
        let second = args![b];
        assert_eq!(push.invoke(&mut object, first.as_view()).unwrap().take::<usize>().ok(), Some(1));
        assert_eq!(push.invoke(&mut object, second.as_view()).unwrap().take::<usize>().ok(), Some(2));

        let top = peek.invoke_noargs(&mut object).unwrap();
        assert_eq!(top.downcast_ref::<Option<i32>>(), Some(&Some(2)));
        assert_eq!(stack.0, [1, 2]);
    }

    #[test]
    fn static_call_errors() {
        let square = Function::new(Invoker::from_fn(square));
        assert_eq!(square.method_type(), MethodType::StaticMethod);
        assert_eq!(square.which_belongs(), Rtti::void());
        assert_eq!(square.arity(), 1);

        let text = String::from("4");
        let store = args![text];
        let err = square.invoke_static(store.as_view()).unwrap_err();
        assert!(matches!(err, InvokeError::IncompatibleArguments));
    }

    #[test]
    fn clone_and_target() {
        let ptr = square as fn(i32) -> i32;
        let f = Function::from(Invoker::from_fn(ptr));
        let g = f.clone();

        assert_eq!(f, g);
        assert!(g.target::<fn(i32) -> i32>().is_some());
        assert!(g.target::<fn(i64) -> i64>().is_none());

        let item = Function::from(Invoker::from_fn(square));
        assert!(item.target::<fn(i32) -> i32>().is_none());
        assert!(item.accessor().target(&item.function_signature()).is_none());
    }

    #[test]
    fn capturing_closure_clone_is_unequal() {
        let offset = 2_i32;
        let shift = Function::from(Invoker::from_fn(move |x: i32| x + offset));
        let copy = shift.clone();
        let alias = &shift;
        assert_eq!(&shift, alias);
        assert_ne!(shift, copy);

        let x = 1_i32;
        let store = args![x];
        let result = copy.invoke_static(store.as_view()).unwrap();
        assert_eq!(result.downcast_ref::<i32>(), Some(&3));
    }
}
