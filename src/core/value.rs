//! Dynamic values exchanged at the call boundary
//!
//! A `Value` is the runtime's tagged representation. It is immutable once
//! built and cheap to clone: text is shared through `Rc<str>` and opaque
//! native objects through `Rc<dyn Any>`.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// Runtime tag of a dynamic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Nil,
    Bool,
    Integer,
    Float,
    Str,
    Symbol,
    Data,
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    Symbol(Rc<str>),
    Data(DataRef),
}

impl Value {
    pub fn str(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    pub fn symbol(name: impl AsRef<str>) -> Self {
        Value::Symbol(Rc::from(name.as_ref()))
    }

    #[inline]
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Nil => ValueTag::Nil,
            Value::Bool(_) => ValueTag::Bool,
            Value::Integer(_) => ValueTag::Integer,
            Value::Float(_) => ValueTag::Float,
            Value::Str(_) => ValueTag::Str,
            Value::Symbol(_) => ValueTag::Symbol,
            Value::Data(_) => ValueTag::Data,
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Symbol(_))
    }

    /// Only nil and false are falsy
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Text of a string or symbol value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Class name the runtime reports for this value
    pub fn class_name(&self) -> &str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Data(data) => data.class_name(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Data(a), Value::Data(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::Data(data) => write!(f, "#<{}>", data.class_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Str(s) | Value::Symbol(s) => write!(f, "{}", s),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

/// Handle to an opaque native object living inside the runtime
#[derive(Clone)]
pub struct DataRef {
    class_name: Rc<str>,
    payload: Rc<dyn Any>,
}

impl DataRef {
    pub fn new<T: Any>(class_name: impl AsRef<str>, payload: Rc<T>) -> Self {
        Self {
            class_name: Rc::from(class_name.as_ref()),
            payload,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Identity of the payload's native type, for registry lookups
    pub fn payload_type_id(&self) -> TypeId {
        Any::type_id(&*self.payload)
    }

    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.payload).downcast::<T>().ok()
    }

    /// Identity comparison: two handles are equal only if they share a payload
    pub fn ptr_eq(&self, other: &DataRef) -> bool {
        Rc::ptr_eq(&self.payload, &other.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::str("").is_truthy());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(Value::Nil.class_name(), "NilClass");
        assert_eq!(Value::Bool(true).class_name(), "TrueClass");
        assert_eq!(Value::Bool(false).class_name(), "FalseClass");
        assert_eq!(Value::from(1).class_name(), "Integer");
        assert_eq!(Value::from(1.5).class_name(), "Float");
        assert_eq!(Value::from("x").class_name(), "String");
        assert_eq!(Value::symbol("x").class_name(), "Symbol");

        let data = DataRef::new("Point", Rc::new((1, 2)));
        assert_eq!(Value::Data(data).class_name(), "Point");
    }

    #[test]
    fn test_data_identity() {
        let payload = Rc::new(vec![1u8, 2, 3]);
        let a = DataRef::new("Bytes", Rc::clone(&payload));
        let b = DataRef::new("Bytes", payload);
        let c = DataRef::new("Bytes", Rc::new(vec![1u8, 2, 3]));

        assert_eq!(Value::Data(a.clone()), Value::Data(b));
        assert_ne!(Value::Data(a.clone()), Value::Data(c));
        assert!(a.is::<Vec<u8>>());
        assert_eq!(a.downcast::<Vec<u8>>().map(|v| v.len()), Some(3));
        assert!(a.downcast::<String>().is_none());
        assert_eq!(a.payload_type_id(), TypeId::of::<Vec<u8>>());
    }

    #[test]
    fn test_symbol_and_string_differ() {
        assert_ne!(Value::str("name"), Value::symbol("name"));
        assert_eq!(Value::symbol("name").as_text(), Some("name"));
    }
}
