//! Call programs - an ordered list of statements run against an interpreter
//!
//! A program stands in for a script: it reaches bound functions, constants
//! and globals the way a script would, and yields the value of its last
//! statement. It is built in native code; there is no parser.

use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Call the function at `path` (`name` or `Module::name`)
    Call { path: String, args: Vec<Value> },
    /// Read a constant (`NAME` or `Module::NAME`); undefined is a runtime fault
    Const(String),
    /// Read a global variable; undefined reads as nil
    Global(String),
    Literal(Value),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(mut self, path: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        self.statements.push(Statement::Call {
            path: path.into(),
            args: args.into_iter().collect(),
        });
        self
    }

    pub fn constant(mut self, path: impl Into<String>) -> Self {
        self.statements.push(Statement::Const(path.into()));
        self
    }

    pub fn global(mut self, name: impl Into<String>) -> Self {
        self.statements.push(Statement::Global(name.into()));
        self
    }

    pub fn literal(mut self, value: impl Into<Value>) -> Self {
        self.statements.push(Statement::Literal(value.into()));
        self
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Split `A::B::name` into (`["A", "B"]`, `name`)
pub fn split_path(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path.split("::").collect();
    let last = segments.pop().unwrap_or_default();
    (segments, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let program = Program::new()
            .call("f2", [Value::from(1), Value::from(2.0)])
            .constant("MyModule::INT_VAL")
            .global("$x")
            .literal(42i64);

        assert_eq!(program.len(), 4);
        assert_eq!(program.statements()[3], Statement::Literal(Value::Integer(42)));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("f1"), (vec![], "f1"));
        assert_eq!(split_path("A::B::f"), (vec!["A", "B"], "f"));
    }
}
