use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use seine_core::Value;

use crate::step::{Cont, Step};

/// A host-callable CPS function: consumes a continuation and an argument
/// list, returns the next suspension.
pub type Callable = Rc<dyn Fn(Cont, Vec<Value>) -> Step>;

/// Memoizes a deterministic CPS function by canonicalized argument list.
///
/// Each call canonicalizes its arguments; a hit delivers the stored result
/// to the caller's continuation without entering `f`, a miss runs `f` under
/// a continuation that records the result first. The table is shared by all
/// clones of the returned wrapper.
///
/// Correctness presumes `f` is deterministic: wrapping a function that
/// samples or factors silently violates inference semantics, because later
/// execution paths replay the first path's result.
pub fn cache(f: Callable) -> Callable {
    let table: Rc<RefCell<BTreeMap<String, Value>>> = Rc::new(RefCell::new(BTreeMap::new()));
    Rc::new(move |k: Cont, args: Vec<Value>| {
        let key = Value::List(args.clone()).canonical_key();
        let hit = table.borrow().get(&key).cloned();
        match hit {
            Some(value) => k(value),
            None => {
                let table = Rc::clone(&table);
                let recorder: Cont = Rc::new(move |value: Value| {
                    table.borrow_mut().insert(key.clone(), value.clone());
                    k(value)
                });
                f(recorder, args)
            }
        }
    })
}

/// Invokes a non-suspending host function synchronously and resumes `k`
/// with its result.
pub fn call_primitive<F>(k: Cont, f: F, args: &[Value]) -> Step
where
    F: Fn(&[Value]) -> Value,
{
    k(f(args))
}

/// Renders a value to stdout and resumes `k` with unit.
pub fn display(k: Cont, value: &Value) -> Step {
    println!("{value}");
    k(Value::Unit)
}
