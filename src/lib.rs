//! Binding native Rust functions into a dynamically typed runtime.
//!
//! Native callables of any signature are registered under a name, their
//! parameter types are deduced at registration, and calls arriving with
//! dynamic `Value` arguments are checked, converted and dispatched.
//!
//! ```
//! use dynbind::{Interpreter, Value};
//!
//! let interp = Interpreter::new();
//! interp.def_function("add", |a: i64, b: i64| a + b);
//! let sum = interp.call("add", &[Value::Integer(40), Value::Integer(2)]).unwrap();
//! assert_eq!(sum.get::<i64>(), Ok(42));
//! ```

pub mod core;
pub mod errors;
pub mod frontend;
pub mod infrastructure;
pub mod interop;
pub mod runtime;

pub use crate::core::{DataRef, TypeDescriptor, TypeNames, Value, ValueTag};
pub use errors::{BindError, Result};
pub use frontend::{cli_main, Config};
pub use interop::{
    make_function, AbstractFunction, Data, Dispatcher, FaultSource, Function, IntoFunction,
    NativeReturn, NativeType,
};
pub use runtime::{FaultSignal, Interpreter, Module, Object, Program, Statement};
