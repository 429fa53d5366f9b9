//! Callable erasure
//!
//! Any native callable - `fn` item, function pointer, closure, boxed `dyn Fn`,
//! or an already erased callable - is normalized into a `FunctionImpl`
//! parameterized by its deduced signature and stored behind
//! `Box<dyn AbstractFunction>`. The parameter and return descriptors are
//! computed once, at construction.

use crate::core::registry::{TypeDescriptor, TypeNames};
use crate::core::value::Value;
use crate::errors::{BindError, Result};
use crate::interop::checker::{self, CallContext};
use crate::interop::convert::NativeType;
use std::fmt;
use std::marker::PhantomData;

/// Uniform interface over callables of any signature
pub trait AbstractFunction {
    /// Check the arguments strictly, convert them, run the callable and
    /// convert its result back.
    fn invoke(&self, cx: &CallContext<'_>, args: &[Value]) -> Result<Value>;

    fn params(&self) -> &[TypeDescriptor];

    fn ret(&self) -> TypeDescriptor;

    fn arity(&self) -> usize {
        self.params().len()
    }

    fn matches(&self, cx: &CallContext<'_>, args: &[Value], strict: bool) -> Result<bool> {
        checker::check_args(cx, self.params(), args, strict)
    }

    /// `(T1, T2, ...) -> R`
    fn describe(&self, types: &TypeNames) -> String {
        render_signature(types, self.params(), &self.ret())
    }
}

pub fn render_signature(types: &TypeNames, params: &[TypeDescriptor], ret: &TypeDescriptor) -> String {
    let params = params
        .iter()
        .map(|p| types.lookup(p))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({}) -> {}", params, types.lookup(ret))
}

/// What a native callable may return: any native value, or a `Result`
/// whose error is reported as a failure of the callable itself
pub trait NativeReturn: 'static {
    fn descriptor() -> TypeDescriptor;

    fn into_dynamic(self) -> std::result::Result<Value, String>;
}

impl<T: NativeType> NativeReturn for T {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    #[inline]
    fn into_dynamic(self) -> std::result::Result<Value, String> {
        Ok(self.to_dynamic())
    }
}

impl<T: NativeType, E: fmt::Display + 'static> NativeReturn for std::result::Result<T, E> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn into_dynamic(self) -> std::result::Result<Value, String> {
        self.map(NativeType::to_dynamic).map_err(|e| e.to_string())
    }
}

/// A callable plus the metadata derived from its signature `Sig`
pub struct FunctionImpl<Sig, F> {
    function: F,
    params: Box<[TypeDescriptor]>,
    ret: TypeDescriptor,
    _signature: PhantomData<Sig>,
}

/// Conversion of a callable into its erased form. `Marker` is the deduced
/// `fn(P...) -> R` signature and is never named at call sites.
pub trait IntoFunction<Marker> {
    fn into_function(self) -> Box<dyn AbstractFunction>;
}

/// Marker for callables that are already erased
pub struct Erased;

impl IntoFunction<Erased> for Box<dyn AbstractFunction> {
    fn into_function(self) -> Box<dyn AbstractFunction> {
        self
    }
}

macro_rules! impl_function {
    ($($p:ident $idx:tt),*) => {
        impl<F, R, $($p,)*> FunctionImpl<fn($($p,)*) -> R, F>
        where
            F: Fn($($p),*) -> R + 'static,
            R: NativeReturn,
            $($p: NativeType,)*
        {
            pub fn new(function: F) -> Self {
                let params: Vec<TypeDescriptor> = vec![$(<$p as NativeType>::descriptor()),*];
                Self {
                    function,
                    params: params.into_boxed_slice(),
                    ret: R::descriptor(),
                    _signature: PhantomData,
                }
            }
        }

        impl<F, R, $($p,)*> AbstractFunction for FunctionImpl<fn($($p,)*) -> R, F>
        where
            F: Fn($($p),*) -> R + 'static,
            R: NativeReturn,
            $($p: NativeType,)*
        {
            #[allow(unused_variables)]
            fn invoke(&self, cx: &CallContext<'_>, args: &[Value]) -> Result<Value> {
                self.matches(cx, args, true)?;
                let result = (self.function)($(<$p as NativeType>::from_dynamic(&args[$idx])?),*);
                result
                    .into_dynamic()
                    .map_err(|message| BindError::native(cx.name, message))
            }

            fn params(&self) -> &[TypeDescriptor] {
                &self.params
            }

            fn ret(&self) -> TypeDescriptor {
                self.ret
            }
        }

        impl<F, R, $($p,)*> IntoFunction<fn($($p,)*) -> R> for F
        where
            F: Fn($($p),*) -> R + 'static,
            R: NativeReturn,
            $($p: NativeType,)*
        {
            fn into_function(self) -> Box<dyn AbstractFunction> {
                Box::new(FunctionImpl::<fn($($p,)*) -> R, F>::new(self))
            }
        }
    };
}

impl_function!();
impl_function!(P1 0);
impl_function!(P1 0, P2 1);
impl_function!(P1 0, P2 1, P3 2);
impl_function!(P1 0, P2 1, P3 2, P4 3);
impl_function!(P1 0, P2 1, P3 2, P4 3, P5 4);
impl_function!(P1 0, P2 1, P3 2, P4 3, P5 4, P6 5);
impl_function!(P1 0, P2 1, P3 2, P4 3, P5 4, P6 5, P7 6);
impl_function!(P1 0, P2 1, P3 2, P4 3, P5 4, P6 5, P7 6, P8 7);

pub fn make_function<M>(function: impl IntoFunction<M>) -> Box<dyn AbstractFunction> {
    function.into_function()
}

/// An erased callable under the name the runtime knows it by
pub struct Function {
    name: String,
    inner: Box<dyn AbstractFunction>,
}

impl Function {
    pub fn new<M>(name: impl Into<String>, function: impl IntoFunction<M>) -> Self {
        Self {
            name: name.into(),
            inner: function.into_function(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.inner.arity()
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        self.inner.params()
    }

    pub fn invoke(&self, types: &TypeNames, args: &[Value]) -> Result<Value> {
        self.inner.invoke(&CallContext::new(&self.name, types), args)
    }

    pub fn matches(&self, types: &TypeNames, args: &[Value], strict: bool) -> Result<bool> {
        self.inner.matches(&CallContext::new(&self.name, types), args, strict)
    }

    pub fn describe(&self, types: &TypeNames) -> String {
        self.inner.describe(types)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.inner.params())
            .field("ret", &self.inner.ret())
            .finish()
    }
}
