//! Runtime collaborator - interpreter, modules and the values they hand out
//!
//! This is the glue the binding core is driven by: registration scopes,
//! constant and global storage, object handles, runtime faults, and
//! programs that issue calls the way a script would.

mod fault;
mod interpreter;
mod module;
mod object;
mod program;

pub use fault::FaultSignal;
pub use interpreter::Interpreter;
pub use module::Module;
pub use object::Object;
pub use program::{split_path, Program, Statement};
