//! Demo bindings exposed by the `dynbind` command

use crate::runtime::Interpreter;

/// Longest string `Text::repeat` will build, in bytes
const MAX_REPEAT_LEN: usize = 1 << 24;

/// Bind the `Math` and `Text` modules into `interp`
pub fn install(interp: &Interpreter) {
    let math = interp.def_module("Math");
    math.def_const("PI", std::f64::consts::PI)
        .def_const("E", std::f64::consts::E)
        .def_function("add", |a: i64, b: i64| -> Result<i64, String> {
            a.checked_add(b).ok_or_else(|| "integer overflow".to_string())
        })
        .def_function("mul", |a: f64, b: f64| a * b)
        .def_function("div", |a: i64, b: i64| -> Result<i64, String> {
            if b == 0 {
                return Err("divided by 0".to_string());
            }
            a.checked_div(b).ok_or_else(|| "integer overflow".to_string())
        })
        .def_function("hypot", |a: f64, b: f64| a.hypot(b));

    let text = interp.def_module("Text");
    text.def_function("upcase", |s: String| s.to_uppercase())
        .def_function("length", |s: String| s.chars().count())
        .def_function("repeat", |s: String, n: i64| -> Result<String, String> {
            if n < 0 {
                return Err(format!("negative count {}", n));
            }
            let count = usize::try_from(n)
                .ok()
                .filter(|&count| matches!(count.checked_mul(s.len()), Some(len) if len <= MAX_REPEAT_LEN))
                .ok_or_else(|| format!("repeat count {} too large", n))?;
            Ok(s.repeat(count))
        })
        .def_function("concat", |a: String, b: String| a + &b)
        .def_overload("inspect", |s: String| format!("{:?}", s))
        .def_overload("inspect", |x: f64| x.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;
    use crate::errors::BindError;

    #[test]
    fn test_prelude_calls() {
        let interp = Interpreter::new();
        install(&interp);

        let sum = interp.call_path("Math::add", &[Value::Integer(2), Value::Integer(40)]).unwrap();
        assert_eq!(sum.get::<i64>(), Ok(42));

        let shout = interp.call_path("Text::upcase", &[Value::str("hi")]).unwrap();
        assert_eq!(shout.get::<String>(), Ok("HI".to_string()));

        let quoted = interp.call_path("Text::inspect", &[Value::str("a")]).unwrap();
        assert_eq!(quoted.get::<String>(), Ok("\"a\"".to_string()));
        let number = interp.call_path("Text::inspect", &[Value::Float(1.5)]).unwrap();
        assert_eq!(number.get::<String>(), Ok("1.5".to_string()));

        assert_eq!(
            interp.call_path("Math::div", &[Value::Integer(1), Value::Integer(0)]).unwrap_err(),
            BindError::native("div", "divided by 0")
        );
    }

    #[test]
    fn test_add_overflow_is_native_failure() {
        let interp = Interpreter::new();
        install(&interp);

        assert_eq!(
            interp.call_path("Math::add", &[Value::Integer(i64::MAX), Value::Integer(1)]).unwrap_err(),
            BindError::native("add", "integer overflow")
        );
        assert_eq!(
            interp.call_path("Math::div", &[Value::Integer(i64::MIN), Value::Integer(-1)]).unwrap_err(),
            BindError::native("div", "integer overflow")
        );
    }

    #[test]
    fn test_repeat_rejects_bad_counts() {
        let interp = Interpreter::new();
        install(&interp);

        let ok = interp.call_path("Text::repeat", &[Value::str("ab"), Value::Integer(3)]).unwrap();
        assert_eq!(ok.get::<String>(), Ok("ababab".to_string()));
        let empty = interp.call_path("Text::repeat", &[Value::str("ab"), Value::Integer(0)]).unwrap();
        assert_eq!(empty.get::<String>(), Ok(String::new()));

        assert_eq!(
            interp.call_path("Text::repeat", &[Value::str("x"), Value::Integer(-1)]).unwrap_err(),
            BindError::native("repeat", "negative count -1")
        );
        assert_eq!(
            interp.call_path("Text::repeat", &[Value::str("xy"), Value::Integer(i64::MAX)]).unwrap_err(),
            BindError::native("repeat", format!("repeat count {} too large", i64::MAX))
        );
    }

    #[test]
    fn test_prelude_signatures() {
        let interp = Interpreter::new();
        install(&interp);

        assert_eq!(interp.signature_of_path("Math::div").unwrap(), "(long, long) -> long");
        assert_eq!(
            interp.signature_of_path("Text::inspect").unwrap(),
            "(string) -> string | (double) -> string"
        );
        assert_eq!(interp.signature_of_path("Text::length").unwrap(), "(string) -> size");
        assert_eq!(interp.signature_of_path("Text::repeat").unwrap(), "(string, long) -> string");
    }
}
