//! Core data model
//!
//! Dynamic values and the registry of native type names.

pub mod registry;
pub mod value;

pub use registry::{TypeDescriptor, TypeNames};
pub use value::{DataRef, Value, ValueTag};
