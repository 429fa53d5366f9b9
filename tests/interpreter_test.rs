use dynbind::{BindError, Config, Interpreter, Program, Value};

#[test]
fn test_execute_returns_last_value() {
    let interp = Interpreter::new();
    interp.def_function("mul", |a: i64, b: i64| a * b);

    let program = Program::new()
        .literal("ignored")
        .call("mul", [Value::Integer(6), Value::Integer(7)]);
    assert_eq!(interp.execute(&program).unwrap().get::<i64>(), Ok(42));
}

#[test]
fn test_execute_stops_at_first_error() {
    let interp = Interpreter::new();
    let program = Program::new()
        .call("missing", [])
        .literal(1i64);
    assert_eq!(interp.execute(&program), Err(BindError::unbound("missing")));
}

#[test]
fn test_constants() {
    let interp = Interpreter::new();
    interp.def_const("VERSION", "1.0".to_string());
    let math = interp.def_module("Math");
    math.def_const("ANSWER", 42i32);

    assert!(interp.const_defined("VERSION"));
    assert_eq!(interp.execute(&Program::new().constant("Math::ANSWER")).unwrap().get::<i32>(), Ok(42));
    assert_eq!(
        interp.execute(&Program::new().constant("VERSION")).unwrap().get::<String>(),
        Ok("1.0".to_string())
    );
}

#[test]
fn test_undefined_constant_is_runtime_fault() {
    let interp = Interpreter::new();
    let program = Program::new().constant("Nope").literal(1i64);

    let err = interp.execute(&program).unwrap_err();
    assert_eq!(err, BindError::fault("uninitialized constant Nope"));
    assert_eq!(err.kind(), "runtime_fault");
}

#[test]
fn test_fault_raised_by_native_code_discards_result() {
    let interp = Interpreter::new();
    let signal = interp.fault_signal();
    interp.def_function("explode", move || {
        signal.raise("NameError: undefined local variable");
        1i32
    });

    assert_eq!(
        interp.call("explode", &[]),
        Err(BindError::fault("NameError: undefined local variable"))
    );
    // The fault is consumed by the failing call
    interp.def_function("fine", || 2i32);
    assert_eq!(interp.call("fine", &[]).unwrap().get::<i32>(), Ok(2));
}

#[test]
fn test_globals_in_programs() {
    let interp = Interpreter::new();
    interp.set_global("$greeting", "hello".to_string());

    let program = Program::new().global("$greeting");
    assert_eq!(interp.execute(&program).unwrap().value(), &Value::str("hello"));
    assert!(interp.execute(&Program::new().global("$unset")).unwrap().is_nil());
}

#[test]
fn test_nested_call_path() {
    let interp = Interpreter::new();
    let inner = interp.def_module("Outer").def_module("Inner");
    inner.def_function("twice", |s: String| s.repeat(2));

    let result = interp.call_path("Outer::Inner::twice", &[Value::str("ab")]).unwrap();
    assert_eq!(result.get::<String>(), Ok("abab".to_string()));
    assert_eq!(
        interp.call_path("Outer::Missing::twice", &[]),
        Err(BindError::UnknownModule { path: "Outer::Missing".to_string() })
    );
}

#[test]
fn test_overloads_disabled_by_config() {
    let config = Config::parse("[dispatch]\nallow_overloads = false\n").unwrap();
    let interp = Interpreter::with_config(&config);
    interp.def_overload("f", |x: i32| x).def_overload("f", |_: String| 0i32);

    assert_eq!(interp.signature_of("f").unwrap(), "(string) -> int");
    assert!(interp.call("f", &[Value::Integer(1)]).is_err());
}

#[test]
fn test_type_names() {
    struct Window;
    let interp = Interpreter::new();
    assert_eq!(interp.type_name::<i32>(), "int");
    assert_eq!(interp.type_name::<dynbind::Object>(), "object");
    interp.register_type_name::<Window>("Window");
    assert_eq!(interp.type_name::<dynbind::Data<Window>>(), "Window");
}
