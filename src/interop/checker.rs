//! Argument checking against a callable's declared parameter types
//!
//! The same predicate serves two callers: strict mode explains the first
//! failure as an error, non-strict mode only answers yes or no.

use crate::core::registry::{TypeDescriptor, TypeNames};
use crate::core::value::Value;
use crate::errors::{BindError, Result};
use tracing::trace;

/// What a call path knows about the call in flight
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    pub name: &'a str,
    pub types: &'a TypeNames,
}

impl<'a> CallContext<'a> {
    pub fn new(name: &'a str, types: &'a TypeNames) -> Self {
        Self { name, types }
    }
}

/// Validate `args` against `declared`.
///
/// Returns `Ok(true)` when every argument is compatible. On failure, strict
/// mode returns the error for the first offending position; non-strict mode
/// returns `Ok(false)`.
pub fn check_args(
    cx: &CallContext<'_>,
    declared: &[TypeDescriptor],
    args: &[Value],
    strict: bool,
) -> Result<bool> {
    if args.len() != declared.len() {
        trace!(target: "interop", function = cx.name, given = args.len(), expected = declared.len(), "arity mismatch");
        return if strict {
            Err(BindError::ArityMismatch {
                function: cx.name.to_string(),
                given: args.len(),
                expected: declared.len(),
            })
        } else {
            Ok(false)
        };
    }

    match first_incompatible(declared, args) {
        None => Ok(true),
        Some(index) if strict => Err(BindError::TypeMismatch {
            function: cx.name.to_string(),
            position: index + 1,
            found: class_name_of(cx.types, &args[index]),
            expected: cx.types.lookup(&declared[index]),
        }),
        Some(_) => Ok(false),
    }
}

/// Index of the first argument its declared type rejects
pub fn first_incompatible(declared: &[TypeDescriptor], args: &[Value]) -> Option<usize> {
    declared
        .iter()
        .zip(args)
        .position(|(descriptor, arg)| !descriptor.accepts(arg))
}

/// Runtime class name of `value`. Data handles report the display name
/// registered for their payload type, like the declared side of a mismatch.
pub fn class_name_of(types: &TypeNames, value: &Value) -> String {
    match value {
        Value::Data(data) => types.lookup_id(data.payload_type_id(), data.class_name()),
        other => other.class_name().to_string(),
    }
}

/// Render runtime class names of an argument list, e.g. `Integer, String`
pub fn describe_args(types: &TypeNames, args: &[Value]) -> String {
    args.iter()
        .map(|arg| class_name_of(types, arg))
        .collect::<Vec<_>>()
        .join(", ")
}
