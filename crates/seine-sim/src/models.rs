//! Built-in demonstration models, written against the step constructors the
//! way compiled user programs are.

use std::rc::Rc;

use seine_core::dist::{bernoulli, gaussian, random_integer};
use seine_core::Value;
use seine_infer::{factor, sample, Computation, Cont, Step};

/// Names of the built-in demo models.
pub const MODELS: &[&str] = &["two-coins", "tilted-die", "geometric", "gaussian-pair"];

/// Resolves a model name to its computation.
pub fn lookup(name: &str) -> Option<Computation> {
    match name {
        "two-coins" => Some(two_coins()),
        "tilted-die" => Some(tilted_die()),
        "geometric" => Some(geometric()),
        "gaussian-pair" => Some(gaussian_pair()),
        _ => None,
    }
}

/// Two fair coins conditioned on agreement. The exact marginal puts half
/// its mass on each agreeing pair.
pub fn two_coins() -> Computation {
    Rc::new(|k: Cont| {
        sample(
            Rc::new(move |first: Value| {
                let k = k.clone();
                sample(
                    Rc::new(move |second: Value| {
                        let weight = if first == second {
                            0.0
                        } else {
                            f64::NEG_INFINITY
                        };
                        let pair = Value::List(vec![first.clone(), second]);
                        let k = k.clone();
                        factor(Rc::new(move || k(pair.clone())), weight)
                    }),
                    bernoulli(),
                    vec![Value::Float(0.5)],
                )
            }),
            bernoulli(),
            vec![Value::Float(0.5)],
        )
    })
}

/// A three-sided die whose faces are reweighted by their own value, so the
/// exact marginal is proportional to `[e^0, e^1, e^2]`.
pub fn tilted_die() -> Computation {
    Rc::new(|k: Cont| {
        sample(
            Rc::new(move |face: Value| {
                let weight = face.as_int().map_or(f64::NEG_INFINITY, |i| i as f64);
                let k = k.clone();
                factor(Rc::new(move || k(face.clone())), weight)
            }),
            random_integer(),
            vec![Value::Int(3)],
        )
    })
}

/// Number of tails before the first head of a fair coin. Unbounded support:
/// enumeration truncates at its execution bound, best-first visiting the
/// shortest runs first.
pub fn geometric() -> Computation {
    Rc::new(|k: Cont| flips_from(0, k))
}

fn flips_from(tails: i64, k: Cont) -> Step {
    sample(
        Rc::new(move |heads: Value| {
            if heads == Value::Bool(true) {
                k(Value::Int(tails))
            } else {
                flips_from(tails + 1, k.clone())
            }
        }),
        bernoulli(),
        vec![Value::Float(0.5)],
    )
}

/// A location drawn from a standard normal and one observation around it.
/// Continuous draws carry no support, so this model is forward-only.
pub fn gaussian_pair() -> Computation {
    Rc::new(|k: Cont| {
        sample(
            Rc::new(move |location: Value| {
                let mu = location.as_float().unwrap_or(0.0);
                let k = k.clone();
                sample(
                    Rc::new(move |observation: Value| {
                        k(Value::List(vec![location.clone(), observation]))
                    }),
                    gaussian(),
                    vec![Value::Float(mu), Value::Float(0.5)],
                )
            }),
            gaussian(),
            vec![Value::Float(0.0), Value::Float(1.0)],
        )
    })
}
