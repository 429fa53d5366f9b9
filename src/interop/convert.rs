//! Value conversion - native ↔ dynamic
//!
//! Each native type binds itself by implementing `NativeType`; there is no
//! central table to edit when a new type is exposed.

use crate::core::registry::{short_type_name, TypeDescriptor};
use crate::core::value::{DataRef, Value};
use crate::errors::{BindError, Result};
use num_traits::AsPrimitive;
use std::any::{type_name, TypeId};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Bidirectional mapping between a native type and `Value`
pub trait NativeType: Sized + 'static {
    /// Total conversion into the dynamic representation
    fn to_dynamic(self) -> Value;

    /// Conversion back into native space. Fails only for values that
    /// `is_compatible` rejects.
    fn from_dynamic(value: &Value) -> Result<Self>;

    fn is_compatible(value: &Value) -> bool;

    /// Identity used by the type name registry
    fn type_key() -> TypeId {
        TypeId::of::<Self>()
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_key(), type_name::<Self>(), Self::is_compatible)
    }
}

pub fn to_dynamic<T: NativeType>(native: T) -> Value {
    native.to_dynamic()
}

pub fn from_dynamic<T: NativeType>(value: &Value) -> Result<T> {
    T::from_dynamic(value)
}

pub fn is_compatible<T: NativeType>(value: &Value) -> bool {
    T::is_compatible(value)
}

fn mismatch<T>(value: &Value) -> BindError {
    BindError::Conversion {
        found: value.class_name().to_string(),
        expected: short_type_name(type_name::<T>()),
    }
}

/// Integer values widen, float values truncate (`as` semantics)
#[inline]
fn numeric<N>(value: &Value) -> Option<N>
where
    N: Copy + 'static,
    i64: AsPrimitive<N>,
    f64: AsPrimitive<N>,
{
    match *value {
        Value::Integer(i) => Some(i.as_()),
        Value::Float(x) => Some(x.as_()),
        _ => None,
    }
}

macro_rules! impl_integral {
    ($($t:ty),*) => {$(
        impl NativeType for $t {
            #[inline]
            fn to_dynamic(self) -> Value {
                Value::Integer(self.as_())
            }

            fn from_dynamic(value: &Value) -> Result<Self> {
                numeric::<$t>(value).ok_or_else(|| mismatch::<$t>(value))
            }

            #[inline]
            fn is_compatible(value: &Value) -> bool {
                value.is_numeric()
            }
        }
    )*};
}

macro_rules! impl_floating {
    ($($t:ty),*) => {$(
        impl NativeType for $t {
            #[inline]
            fn to_dynamic(self) -> Value {
                Value::Float(self.as_())
            }

            fn from_dynamic(value: &Value) -> Result<Self> {
                numeric::<$t>(value).ok_or_else(|| mismatch::<$t>(value))
            }

            #[inline]
            fn is_compatible(value: &Value) -> bool {
                value.is_numeric()
            }
        }
    )*};
}

impl_integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_floating!(f32, f64);

impl NativeType for bool {
    #[inline]
    fn to_dynamic(self) -> Value {
        Value::Bool(self)
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        Ok(value.is_truthy())
    }

    #[inline]
    fn is_compatible(_: &Value) -> bool {
        true
    }
}

impl NativeType for String {
    fn to_dynamic(self) -> Value {
        Value::from(self)
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        value
            .as_text()
            .map(str::to_owned)
            .ok_or_else(|| mismatch::<String>(value))
    }

    #[inline]
    fn is_compatible(value: &Value) -> bool {
        value.is_text()
    }
}

impl NativeType for Rc<str> {
    fn to_dynamic(self) -> Value {
        Value::Str(self)
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        match value {
            Value::Str(s) | Value::Symbol(s) => Ok(Rc::clone(s)),
            other => Err(mismatch::<Rc<str>>(other)),
        }
    }

    #[inline]
    fn is_compatible(value: &Value) -> bool {
        value.is_text()
    }
}

/// Pass-through: the runtime value itself
impl NativeType for Value {
    #[inline]
    fn to_dynamic(self) -> Value {
        self
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }

    #[inline]
    fn is_compatible(_: &Value) -> bool {
        true
    }
}

impl NativeType for () {
    #[inline]
    fn to_dynamic(self) -> Value {
        Value::Nil
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        if value.is_nil() {
            Ok(())
        } else {
            Err(mismatch::<()>(value))
        }
    }

    #[inline]
    fn is_compatible(value: &Value) -> bool {
        value.is_nil()
    }
}

/// nil maps to `None`, anything else goes through `T`
impl<T: NativeType> NativeType for Option<T> {
    fn to_dynamic(self) -> Value {
        match self {
            Some(inner) => inner.to_dynamic(),
            None => Value::Nil,
        }
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        if value.is_nil() {
            Ok(None)
        } else {
            T::from_dynamic(value).map(Some)
        }
    }

    fn is_compatible(value: &Value) -> bool {
        value.is_nil() || T::is_compatible(value)
    }
}

/// Opaque native object shared with the runtime through a data handle
pub struct Data<T>(Rc<T>);

impl<T> Data<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn from_rc(value: Rc<T>) -> Self {
        Self(value)
    }

    pub fn into_rc(self) -> Rc<T> {
        self.0
    }
}

impl<T> Clone for Data<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Deref for Data<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Data<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Data").field(&*self.0).finish()
    }
}

impl<T: 'static> NativeType for Data<T> {
    fn to_dynamic(self) -> Value {
        Value::Data(DataRef::new(short_type_name(type_name::<T>()), self.0))
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        match value {
            Value::Data(data) => data.downcast::<T>().map(Data).ok_or_else(|| mismatch::<T>(value)),
            other => Err(mismatch::<T>(other)),
        }
    }

    fn is_compatible(value: &Value) -> bool {
        matches!(value, Value::Data(data) if data.is::<T>())
    }

    /// Keyed by the payload type so names registered for `T` apply
    fn type_key() -> TypeId {
        TypeId::of::<T>()
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(TypeId::of::<T>(), type_name::<T>(), Self::is_compatible)
    }
}
