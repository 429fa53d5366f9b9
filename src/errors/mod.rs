//! Error taxonomy for the binding layer
//!
//! Every failure on a call path is a control-flow escalation to the caller:
//! the dispatcher never recovers locally and never touches the binding table
//! while reporting an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// Argument count differs from the declared parameter count
    #[error("'{function}': wrong number of arguments ({given} for {expected})")]
    ArityMismatch {
        function: String,
        given: usize,
        expected: usize,
    },

    /// An argument is not compatible with its declared native type
    #[error("cannot convert {found} into {expected} (argument {position})")]
    TypeMismatch {
        function: String,
        /// 1-based position of the offending argument
        position: usize,
        /// Runtime class name of the actual value
        found: String,
        /// Display name of the declared native type
        expected: String,
    },

    #[error("undefined operation '{name}'")]
    UnboundName { name: String },

    /// The wrapped native callable reported its own failure
    #[error("'{function}' failed: {message}")]
    Native { function: String, message: String },

    /// The runtime reported a fault unrelated to argument marshalling
    #[error("runtime fault: {message}")]
    RuntimeFault { message: String },

    #[error("no overload of '{function}' accepts ({given}); candidates: {}", candidates.join(", "))]
    NoMatchingOverload {
        function: String,
        given: String,
        candidates: Vec<String>,
    },

    /// A direct value extraction was attempted on an incompatible value
    #[error("cannot convert {found} into {expected}")]
    Conversion { found: String, expected: String },

    #[error("uninitialized module '{path}'")]
    UnknownModule { path: String },
}

impl BindError {
    pub fn unbound(name: impl Into<String>) -> Self {
        Self::UnboundName { name: name.into() }
    }

    pub fn native(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::RuntimeFault {
            message: message.into(),
        }
    }

    /// Short stable label, used as a structured logging field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::UnboundName { .. } => "unbound_name",
            Self::Native { .. } => "native_failure",
            Self::RuntimeFault { .. } => "runtime_fault",
            Self::NoMatchingOverload { .. } => "no_matching_overload",
            Self::Conversion { .. } => "conversion",
            Self::UnknownModule { .. } => "unknown_module",
        }
    }

    /// Whether the error was raised before the native callable ran
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::ArityMismatch { .. } | Self::TypeMismatch { .. } | Self::NoMatchingOverload { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message() {
        let err = BindError::ArityMismatch {
            function: "f2".to_string(),
            given: 3,
            expected: 4,
        };
        assert_eq!(err.to_string(), "'f2': wrong number of arguments (3 for 4)");
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = BindError::TypeMismatch {
            function: "f2".to_string(),
            position: 1,
            found: "String".to_string(),
            expected: "int".to_string(),
        };
        assert_eq!(err.to_string(), "cannot convert String into int (argument 1)");
        assert_eq!(err.kind(), "type_mismatch");
    }

    #[test]
    fn test_overload_message() {
        let err = BindError::NoMatchingOverload {
            function: "f5".to_string(),
            given: "String".to_string(),
            candidates: vec!["(int) -> bool".to_string(), "(int, float) -> bool".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no overload of 'f5' accepts (String); candidates: (int) -> bool, (int, float) -> bool"
        );
    }

    #[test]
    fn test_native_is_not_argument_error() {
        let err = BindError::native("div", "division by zero");
        assert_eq!(err.to_string(), "'div' failed: division by zero");
        assert!(!err.is_argument_error());
    }
}
