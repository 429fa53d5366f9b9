//! Interoperability - exposing native callables to the dynamic runtime
//!
//! Architecture:
//! - `convert.rs` - native ↔ dynamic value conversion (`NativeType`)
//! - `checker.rs` - arity and per-argument compatibility checks
//! - `function.rs` - callable erasure and signature deduction
//! - `dispatch.rs` - name → callable resolution and invocation

pub mod checker;
pub mod convert;
pub mod dispatch;
pub mod function;

pub use checker::{check_args, CallContext};
pub use convert::{from_dynamic, is_compatible, to_dynamic, Data, NativeType};
pub use dispatch::{Binding, Dispatcher, FaultSource, FunctionTable};
pub use function::{make_function, AbstractFunction, Function, FunctionImpl, IntoFunction, NativeReturn};
