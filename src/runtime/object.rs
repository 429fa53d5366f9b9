//! Object handles - a runtime value seen from native code

use crate::core::value::Value;
use crate::errors::{BindError, Result};
use crate::interop::convert::NativeType;
use std::any::TypeId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    value: Value,
}

impl Object {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn nil() -> Self {
        Self::default()
    }

    pub fn from_native<T: NativeType>(native: T) -> Self {
        Self::new(native.to_dynamic())
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn is_nil(&self) -> bool {
        self.value.is_nil()
    }

    pub fn class_name(&self) -> &str {
        self.value.class_name()
    }

    /// Extract the value as native type `T`
    pub fn get<T: NativeType>(&self) -> Result<T> {
        if !T::is_compatible(&self.value) {
            return Err(BindError::Conversion {
                found: self.value.class_name().to_string(),
                expected: crate::core::registry::short_type_name(std::any::type_name::<T>()),
            });
        }
        T::from_dynamic(&self.value)
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

/// Pass-through, named like the runtime value it wraps
impl NativeType for Object {
    fn to_dynamic(self) -> Value {
        self.value
    }

    fn from_dynamic(value: &Value) -> Result<Self> {
        Ok(Self::new(value.clone()))
    }

    fn is_compatible(_: &Value) -> bool {
        true
    }

    fn type_key() -> TypeId {
        TypeId::of::<Value>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get() {
        let object = Object::from_native(42i32);
        assert_eq!(object.get::<i32>(), Ok(42));
        assert_eq!(object.get::<f64>(), Ok(42.0));
        assert_eq!(
            object.get::<String>(),
            Err(BindError::Conversion {
                found: "Integer".to_string(),
                expected: "String".to_string()
            })
        );
    }

    #[test]
    fn test_nil() {
        let object = Object::nil();
        assert!(object.is_nil());
        assert_eq!(object.class_name(), "NilClass");
        assert_eq!(object.get::<Option<i32>>(), Ok(None));
        assert!(!object.get::<bool>().unwrap());
    }

    #[test]
    fn test_named_as_object() {
        let names = crate::core::registry::TypeNames::new();
        assert_eq!(names.lookup(&Object::descriptor()), "object");
    }
}
