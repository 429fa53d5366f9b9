//! Modules - named registration scopes for functions, constants and class
//! variables
//!
//! A `Module` is a cheap handle; clones refer to the same scope. Every module
//! of an interpreter shares that interpreter's runtime state (type names,
//! globals, fault signal, dispatcher).

use crate::core::registry::TypeNames;
use crate::core::value::Value;
use crate::errors::{BindError, Result};
use crate::interop::convert::NativeType;
use crate::interop::dispatch::{Binding, Dispatcher, FunctionTable};
use crate::interop::function::{Function, IntoFunction};
use crate::runtime::fault::FaultSignal;
use crate::runtime::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// State owned by one interpreter and shared by all of its modules
pub(crate) struct RuntimeState {
    pub(crate) types: TypeNames,
    pub(crate) globals: RefCell<HashMap<String, Value>>,
    pub(crate) faults: FaultSignal,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) allow_overloads: bool,
}

impl RuntimeState {
    pub(crate) fn new(dispatcher: Dispatcher, allow_overloads: bool) -> Self {
        Self {
            types: TypeNames::new(),
            globals: RefCell::new(HashMap::new()),
            faults: FaultSignal::new(),
            dispatcher,
            allow_overloads,
        }
    }
}

type ModuleRef = Rc<RefCell<ModuleData>>;

struct ModuleData {
    name: String,
    path: String,
    functions: FunctionTable,
    constants: HashMap<String, Value>,
    class_vars: HashMap<String, Value>,
    submodules: HashMap<String, ModuleRef>,
    included: Vec<ModuleRef>,
}

impl ModuleData {
    fn new(name: &str, path: String) -> ModuleRef {
        Rc::new(RefCell::new(Self {
            name: name.to_string(),
            path,
            functions: FunctionTable::new(),
            constants: HashMap::new(),
            class_vars: HashMap::new(),
            submodules: HashMap::new(),
            included: Vec::new(),
        }))
    }
}

#[derive(Clone)]
pub struct Module {
    data: ModuleRef,
    runtime: Rc<RuntimeState>,
}

impl Module {
    pub(crate) fn root(name: &str, runtime: Rc<RuntimeState>) -> Self {
        Self {
            data: ModuleData::new(name, name.to_string()),
            runtime,
        }
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    /// Fully qualified name, e.g. `Outer::Inner`
    pub fn path(&self) -> String {
        self.data.borrow().path.clone()
    }

    /// Bind `function` under `name`. A previous binding of the same name is
    /// replaced and dropped.
    pub fn def_function<M>(&self, name: &str, function: impl IntoFunction<M>) -> &Self {
        let function = Function::new(name, function);
        debug!(
            target: "runtime",
            module = %self.path(),
            name,
            signature = %function.describe(&self.runtime.types),
            "binding function"
        );
        self.data.borrow_mut().functions.bind(function);
        self
    }

    /// Add `function` as another candidate under `name`. Candidates are tried
    /// in registration order and the first one accepting the arguments runs.
    pub fn def_overload<M>(&self, name: &str, function: impl IntoFunction<M>) -> &Self {
        if !self.runtime.allow_overloads {
            return self.def_function(name, function);
        }
        let function = Function::new(name, function);
        debug!(
            target: "runtime",
            module = %self.path(),
            name,
            signature = %function.describe(&self.runtime.types),
            "binding overload"
        );
        self.data.borrow_mut().functions.bind_overload(function);
        self
    }

    /// Remove the binding of `name` from this module
    pub fn undef_function(&self, name: &str) -> bool {
        self.data.borrow_mut().functions.remove(name).is_some()
    }

    /// Define a module nested in this one, or return the existing one
    pub fn def_module(&self, name: &str) -> Module {
        if let Some(existing) = self.module(name) {
            return existing;
        }
        let path = format!("{}::{}", self.path(), name);
        trace!(target: "runtime", path = %path, "defining module");
        let data = ModuleData::new(name, path);
        self.data
            .borrow_mut()
            .submodules
            .insert(name.to_string(), Rc::clone(&data));
        Module {
            data,
            runtime: Rc::clone(&self.runtime),
        }
    }

    pub fn module(&self, name: &str) -> Option<Module> {
        self.data.borrow().submodules.get(name).map(|data| Module {
            data: Rc::clone(data),
            runtime: Rc::clone(&self.runtime),
        })
    }

    /// Make the functions and constants of `other` visible through this module
    pub fn include_module(&self, other: &Module) -> &Self {
        if Rc::ptr_eq(&self.data, &other.data) {
            return self;
        }
        let mut data = self.data.borrow_mut();
        if !data.included.iter().any(|m| Rc::ptr_eq(m, &other.data)) {
            data.included.push(Rc::clone(&other.data));
        }
        self
    }

    pub fn def_const<T: NativeType>(&self, name: &str, value: T) -> &Self {
        self.data
            .borrow_mut()
            .constants
            .insert(name.to_string(), value.to_dynamic());
        self
    }

    pub fn const_defined(&self, name: &str) -> bool {
        self.const_get(name).is_some()
    }

    pub fn const_get(&self, name: &str) -> Option<Object> {
        find(&self.data, &mut Vec::new(), &|data| data.constants.get(name).cloned()).map(Object::new)
    }

    /// Whether a function named `name` is reachable from this module
    pub fn respond_to(&self, name: &str) -> bool {
        self.binding(name).is_some()
    }

    pub fn cv_defined(&self, name: &str) -> bool {
        self.data.borrow().class_vars.contains_key(name)
    }

    /// Value of a class variable, nil when it was never set
    pub fn cv_get(&self, name: &str) -> Object {
        self.data
            .borrow()
            .class_vars
            .get(name)
            .cloned()
            .map(Object::new)
            .unwrap_or_default()
    }

    pub fn cv_set<T: NativeType>(&self, name: &str, value: T) {
        self.data
            .borrow_mut()
            .class_vars
            .insert(name.to_string(), value.to_dynamic());
    }

    /// Invoke the function bound to `name` with `args`
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Object> {
        // Cloned out so no borrow of the module is held while native code runs
        let binding = self.binding(name);
        self.runtime
            .dispatcher
            .dispatch(&self.runtime.types, &self.runtime.faults, name, binding.as_ref(), args)
            .map(Object::new)
    }

    /// Signature of the function bound to `name`; overloads are separated by ` | `
    pub fn signature_of(&self, name: &str) -> Result<String> {
        let binding = self.binding(name).ok_or_else(|| BindError::unbound(name))?;
        Ok(binding
            .candidates()
            .iter()
            .map(|function| function.describe(&self.runtime.types))
            .collect::<Vec<_>>()
            .join(" | "))
    }

    /// Names bound directly in this module, sorted
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .data
            .borrow()
            .functions
            .names()
            .map(str::to_owned)
            .collect();
        names.sort();
        names
    }

    /// Nested modules of this module, sorted by name
    pub fn modules(&self) -> Vec<Module> {
        let mut names: Vec<String> = self.data.borrow().submodules.keys().cloned().collect();
        names.sort();
        names.iter().filter_map(|name| self.module(name)).collect()
    }

    fn binding(&self, name: &str) -> Option<Binding> {
        find(&self.data, &mut Vec::new(), &|data| data.functions.get(name).cloned())
    }
}

/// Depth-first search through a module and the modules it includes, in
/// inclusion order. `seen` guards against inclusion cycles.
fn find<T>(
    module: &ModuleRef,
    seen: &mut Vec<*const RefCell<ModuleData>>,
    probe: &dyn Fn(&ModuleData) -> Option<T>,
) -> Option<T> {
    let ptr = Rc::as_ptr(module);
    if seen.contains(&ptr) {
        return None;
    }
    seen.push(ptr);

    let data = module.borrow();
    if let Some(found) = probe(&*data) {
        return Some(found);
    }
    let found = data.included.iter().find_map(|included| find(included, seen, probe));
    found
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Module")
            .field("path", &data.path)
            .field("functions", &data.functions.len())
            .field("constants", &data.constants.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Module {
        Module::root("Kernel", Rc::new(RuntimeState::new(Dispatcher::default(), true)))
    }

    #[test]
    fn test_nested_paths() {
        let kernel = root();
        let outer = kernel.def_module("Outer");
        let inner = outer.def_module("Inner");
        assert_eq!(inner.path(), "Kernel::Outer::Inner");
        assert_eq!(inner.name(), "Inner");
        assert_eq!(outer.def_module("Inner").path(), inner.path());
        assert_eq!(kernel.modules().len(), 1);
    }

    #[test]
    fn test_include_cycle_terminates() {
        let kernel = root();
        let a = kernel.def_module("A");
        let b = kernel.def_module("B");
        a.include_module(&b);
        b.include_module(&a);
        b.def_const("X", 1i32);

        assert!(a.const_defined("X"));
        assert!(!a.respond_to("missing"));
    }

    #[test]
    fn test_undef_function() {
        let kernel = root();
        kernel.def_function("f", || 1i32);
        assert!(kernel.respond_to("f"));
        assert!(kernel.undef_function("f"));
        assert!(!kernel.respond_to("f"));
        assert!(!kernel.undef_function("f"));
    }

    #[test]
    fn test_overloads_disabled() {
        let kernel = Module::root("Kernel", Rc::new(RuntimeState::new(Dispatcher::default(), false)));
        kernel.def_overload("f", |_: i32| 1i32);
        kernel.def_overload("f", |_: i32, _: i32| 2i32);

        assert_eq!(kernel.signature_of("f").unwrap(), "(int, int) -> int");
        assert!(kernel.call("f", &[Value::Integer(1)]).is_err());
    }

    #[test]
    fn test_call_can_reenter_module() {
        let kernel = root();
        let handle = kernel.clone();
        kernel.def_function("remember", move |x: i64| handle.cv_set("@@last", x));

        kernel.call("remember", &[Value::Integer(9)]).unwrap();
        assert_eq!(kernel.cv_get("@@last").get::<i64>(), Ok(9));
    }
}
