use std::cell::Cell;
use std::rc::Rc;

use seine_core::Value;
use seine_infer::prim::{cache, call_primitive, Callable};
use seine_infer::{exit, Step};

/// Drives a host-callable to completion outside any inference run.
fn apply(callable: &Callable, args: Vec<Value>) -> Value {
    match callable(Rc::new(exit), args) {
        Step::Exit { value } => value,
        _ => panic!("callable suspended unexpectedly"),
    }
}

#[test]
fn distinct_argument_lists_evaluate_once_each() {
    let invocations = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&invocations);
    let adder: Callable = Rc::new(move |k, args: Vec<Value>| {
        counter.set(counter.get() + 1);
        let sum: i64 = args.iter().filter_map(Value::as_int).sum();
        k(Value::Int(sum))
    });

    let cached = cache(adder);
    for _ in 0..5 {
        assert_eq!(
            apply(&cached, vec![Value::Int(1), Value::Int(2)]),
            Value::Int(3)
        );
    }
    for _ in 0..3 {
        assert_eq!(
            apply(&cached, vec![Value::Int(3), Value::Int(4)]),
            Value::Int(7)
        );
    }
    assert_eq!(invocations.get(), 2);
}

#[test]
fn argument_lists_are_compared_structurally() {
    let invocations = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&invocations);
    let first: Callable = Rc::new(move |k, args: Vec<Value>| {
        counter.set(counter.get() + 1);
        k(args.into_iter().next().unwrap_or(Value::Unit))
    });

    let cached = cache(first);
    let nested = vec![Value::List(vec![Value::Int(1), Value::Bool(true)])];
    assert_eq!(
        apply(&cached, nested.clone()),
        Value::List(vec![Value::Int(1), Value::Bool(true)])
    );
    assert_eq!(
        apply(&cached, nested),
        Value::List(vec![Value::Int(1), Value::Bool(true)])
    );
    // Bit-different floats are different keys.
    apply(&cached, vec![Value::Float(0.0)]);
    apply(&cached, vec![Value::Float(-0.0)]);
    assert_eq!(invocations.get(), 3);
}

#[test]
fn call_primitive_resumes_with_the_host_result() {
    let doubled = call_primitive(
        Rc::new(exit),
        |args| Value::Int(args.iter().filter_map(Value::as_int).sum::<i64>() * 2),
        &[Value::Int(21)],
    );
    match doubled {
        Step::Exit { value } => assert_eq!(value, Value::Int(42)),
        _ => panic!("primitive call suspended unexpectedly"),
    }
}
