//! The interpreter - one runtime instance and its root `Kernel` module

use crate::errors::{BindError, Result};
use crate::frontend::config::Config;
use crate::interop::convert::NativeType;
use crate::interop::dispatch::{Dispatcher, FaultSource};
use crate::runtime::fault::FaultSignal;
use crate::runtime::module::{Module, RuntimeState};
use crate::runtime::object::Object;
use crate::runtime::program::{split_path, Program, Statement};
use crate::core::value::Value;
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, debug_span, info};

/// Owns the bindings, globals and type names of one runtime instance.
///
/// Dereferences to its `Kernel` module, so functions and constants can be
/// defined on the interpreter directly.
pub struct Interpreter {
    kernel: Module,
    runtime: Rc<RuntimeState>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let runtime = Rc::new(RuntimeState::new(
            Dispatcher::new(config.dispatch.trace_calls),
            config.dispatch.allow_overloads,
        ));
        info!(target: "runtime", allow_overloads = config.dispatch.allow_overloads, "interpreter created");
        Self {
            kernel: Module::root("Kernel", Rc::clone(&runtime)),
            runtime,
        }
    }

    pub fn kernel(&self) -> &Module {
        &self.kernel
    }

    /// Handle native code can use to raise a runtime fault
    pub fn fault_signal(&self) -> FaultSignal {
        self.runtime.faults.clone()
    }

    pub fn set_global<T: NativeType>(&self, name: &str, value: T) {
        self.runtime
            .globals
            .borrow_mut()
            .insert(name.to_string(), value.to_dynamic());
    }

    /// Read a global as `T`; an unset global reads as nil
    pub fn get_global<T: NativeType>(&self, name: &str) -> Result<T> {
        self.global(name).get::<T>()
    }

    pub fn global(&self, name: &str) -> Object {
        self.runtime
            .globals
            .borrow()
            .get(name)
            .cloned()
            .map(Object::new)
            .unwrap_or_default()
    }

    /// Register the display name used for `T` in signatures and errors
    pub fn register_type_name<T: 'static>(&self, display_name: impl Into<String>) {
        self.runtime.types.register::<T>(display_name);
    }

    pub fn type_name<T: NativeType>(&self) -> String {
        self.runtime.types.lookup(&T::descriptor())
    }

    /// Find the module at `A::B` relative to `Kernel`
    pub fn resolve_module(&self, path: &str) -> Result<Module> {
        let mut module = self.kernel.clone();
        for segment in path.split("::").filter(|s| !s.is_empty()) {
            module = module.module(segment).ok_or_else(|| BindError::UnknownModule {
                path: path.to_string(),
            })?;
        }
        Ok(module)
    }

    /// Call `name` or `Module::name`
    pub fn call_path(&self, path: &str, args: &[Value]) -> Result<Object> {
        let (modules, name) = split_path(path);
        let module = self.resolve_module(&modules.join("::"))?;
        module.call(name, args)
    }

    pub fn signature_of_path(&self, path: &str) -> Result<String> {
        let (modules, name) = split_path(path);
        self.resolve_module(&modules.join("::"))?.signature_of(name)
    }

    /// Run `program`, returning the value of its last statement.
    ///
    /// Stops at the first failing statement. A fault raised by the runtime
    /// itself is reported as `RuntimeFault` and no value is returned.
    pub fn execute(&self, program: &Program) -> Result<Object> {
        let _span = debug_span!(target: "runtime", "execute", statements = program.len()).entered();
        self.runtime.faults.clear();

        let mut last = Object::nil();
        for statement in program.statements() {
            let result = self.run_statement(statement);
            if let Some(message) = self.runtime.faults.take_fault() {
                return Err(BindError::fault(message));
            }
            last = result?;
        }

        debug!(target: "runtime", result = ?last.value(), "program finished");
        Ok(last)
    }

    fn run_statement(&self, statement: &Statement) -> Result<Object> {
        match statement {
            Statement::Call { path, args } => self.call_path(path, args),
            Statement::Const(path) => Ok(self.lookup_const(path)),
            Statement::Global(name) => Ok(self.global(name)),
            Statement::Literal(value) => Ok(Object::new(value.clone())),
        }
    }

    fn lookup_const(&self, path: &str) -> Object {
        let (modules, name) = split_path(path);
        let found = self
            .resolve_module(&modules.join("::"))
            .ok()
            .and_then(|module| module.const_get(name));

        match found {
            Some(object) => object,
            None => {
                self.runtime
                    .faults
                    .raise(format!("uninitialized constant {}", path));
                Object::nil()
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Interpreter {
    type Target = Module;

    fn deref(&self) -> &Module {
        &self.kernel
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        debug!(target: "runtime", "interpreter dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals() {
        let interp = Interpreter::new();
        interp.set_global("$int_val", 42i32);
        interp.set_global("$str_val", "Lucas".to_string());

        assert_eq!(interp.get_global::<i32>("$int_val"), Ok(42));
        assert_eq!(interp.get_global::<String>("$str_val"), Ok("Lucas".to_string()));
        assert!(interp.global("$missing").is_nil());
    }

    #[test]
    fn test_resolve_module() {
        let interp = Interpreter::new();
        interp.def_module("Outer").def_module("Inner");

        assert_eq!(interp.resolve_module("").unwrap().path(), "Kernel");
        assert_eq!(interp.resolve_module("Outer::Inner").unwrap().path(), "Kernel::Outer::Inner");
        assert_eq!(
            interp.resolve_module("Nope").unwrap_err(),
            BindError::UnknownModule { path: "Nope".to_string() }
        );
    }

    #[test]
    fn test_stale_fault_cleared_by_execute() {
        let interp = Interpreter::new();
        interp.fault_signal().raise("left over");
        let result = interp.execute(&Program::new().literal(1i64));
        assert_eq!(result.unwrap().get::<i64>(), Ok(1));
    }

    #[test]
    fn test_empty_program_is_nil() {
        let interp = Interpreter::new();
        assert!(interp.execute(&Program::new()).unwrap().is_nil());
    }
}
