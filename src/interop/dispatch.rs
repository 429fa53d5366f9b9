//! Dispatch resolution - the entry point for every exposed call
//!
//! A call is Pending once its callable is located and ends Completed (a value)
//! or Failed (an error). Dispatch is synchronous; there is no suspended state.
//! Failures are surfaced exactly as raised, never retried.

use crate::core::registry::TypeNames;
use crate::core::value::Value;
use crate::errors::{BindError, Result};
use crate::interop::checker::describe_args;
use crate::interop::function::Function;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Runtime-side error signaling the dispatcher consults after a call
pub trait FaultSource {
    /// Take the pending runtime fault, if any, clearing it
    fn take_fault(&self) -> Option<String>;
}

/// Callables bound under one name, in registration order
#[derive(Debug, Clone)]
pub struct Binding {
    candidates: Vec<Rc<Function>>,
}

impl Binding {
    pub fn new(function: Function) -> Self {
        Self {
            candidates: vec![Rc::new(function)],
        }
    }

    pub fn candidates(&self) -> &[Rc<Function>] {
        &self.candidates
    }

    pub fn is_overloaded(&self) -> bool {
        self.candidates.len() > 1
    }

    fn push(&mut self, function: Function) {
        self.candidates.push(Rc::new(function));
    }
}

/// Name → binding table of one registration scope
#[derive(Debug, Default)]
pub struct FunctionTable {
    bindings: HashMap<String, Binding>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `function` under its name, dropping whatever was bound before
    pub fn bind(&mut self, function: Function) -> Option<Binding> {
        let name = function.name().to_string();
        let previous = self.bindings.insert(name.clone(), Binding::new(function));
        if previous.is_some() {
            debug!(target: "dispatch", name = %name, "replaced existing binding");
        }
        previous
    }

    /// Append `function` as another candidate for its name
    pub fn bind_overload(&mut self, function: Function) {
        let name = function.name().to_string();
        match self.bindings.get_mut(&name) {
            Some(binding) => binding.push(function),
            None => {
                self.bindings.insert(name, Binding::new(function));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    trace_calls: bool,
}

impl Dispatcher {
    pub fn new(trace_calls: bool) -> Self {
        Self { trace_calls }
    }

    /// Resolve `name` to a callable of `binding` and invoke it with `args`.
    ///
    /// `binding` is `None` when nothing is bound under `name`; that fails with
    /// `UnboundName` before any argument is looked at.
    pub fn dispatch(
        &self,
        types: &TypeNames,
        faults: &dyn FaultSource,
        name: &str,
        binding: Option<&Binding>,
        args: &[Value],
    ) -> Result<Value> {
        let binding = binding.ok_or_else(|| {
            debug!(target: "dispatch", name, "undefined operation");
            BindError::unbound(name)
        })?;

        if self.trace_calls {
            debug!(target: "dispatch", name, args = args.len(), "call pending");
        }

        let outcome = self
            .select(types, name, binding, args)
            .and_then(|function| function.invoke(types, args));

        if let Some(message) = faults.take_fault() {
            debug!(target: "dispatch", name, fault = %message, "runtime fault raised during call");
            return Err(BindError::fault(message));
        }

        match &outcome {
            Ok(value) if self.trace_calls => {
                debug!(target: "dispatch", name, result = ?value, "call completed");
            }
            Ok(_) => {}
            Err(err) => {
                debug!(target: "dispatch", name, error.kind = err.kind(), error = %err, "call failed");
            }
        }

        outcome
    }

    /// First candidate whose non-strict check passes. A lone candidate is
    /// returned unchecked so that its strict check explains any mismatch.
    fn select<'a>(
        &self,
        types: &TypeNames,
        name: &str,
        binding: &'a Binding,
        args: &[Value],
    ) -> Result<&'a Rc<Function>> {
        if let [single] = binding.candidates() {
            return Ok(single);
        }

        for (index, candidate) in binding.candidates().iter().enumerate() {
            if candidate.matches(types, args, false)? {
                trace!(target: "dispatch", name, overload = index, "overload selected");
                return Ok(candidate);
            }
        }

        Err(BindError::NoMatchingOverload {
            function: name.to_string(),
            given: describe_args(types, args),
            candidates: binding
                .candidates()
                .iter()
                .map(|candidate| candidate.describe(types))
                .collect(),
        })
    }
}
