use std::rc::Rc;

use seine_core::dist::{bernoulli, discrete, random_integer, uniform};
use seine_core::{CustomErp, Distribution, Erp, SeineError, Value};
use seine_infer::{factor, sample, Computation, Cont, Engine, Step};

fn two_coins() -> Computation {
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

fn tilted_die() -> Computation {
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

fn geometric() -> Computation {
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

fn continuous_draw() -> Computation {
    Rc::new(|k: Cont| sample(k, uniform(), vec![Value::Float(0.0), Value::Float(1.0)]))
}

fn impossible_evidence() -> Computation {
    Rc::new(|k: Cont| {
        sample(
            Rc::new(move |heads: Value| {
                let k = k.clone();
                factor(Rc::new(move || k(heads.clone())), f64::NEG_INFINITY)
            }),
            bernoulli(),
            vec![Value::Float(0.5)],
        )
    })
}

fn prob_of(marginal: &Erp, value: &Value) -> f64 {
    marginal.score(&[], value).unwrap().exp()
}

fn pair(a: bool, b: bool) -> Value {
    Value::List(vec![Value::Bool(a), Value::Bool(b)])
}

#[test]
fn agreeing_coins_split_mass_evenly() {
    let mut engine = Engine::new(11);
    let marginal = engine.enumerate_likely_first(&two_coins(), 1000).unwrap();

    assert!((prob_of(&marginal, &pair(true, true)) - 0.5).abs() < 1e-12);
    assert!((prob_of(&marginal, &pair(false, false)) - 0.5).abs() < 1e-12);
    assert_eq!(prob_of(&marginal, &pair(true, false)), 0.0);
    assert_eq!(prob_of(&marginal, &pair(false, true)), 0.0);

    let support = marginal.support(&[]).unwrap().unwrap();
    let mass: f64 = support.iter().map(|v| prob_of(&marginal, v)).sum();
    assert!((mass - 1.0).abs() < 1e-12);
}

#[test]
fn queue_disciplines_agree_on_the_marginal() {
    let mut engine = Engine::new(11);
    let likely = engine.enumerate_likely_first(&two_coins(), 1000).unwrap();
    let depth = engine.enumerate_depth_first(&two_coins(), 1000).unwrap();
    let breadth = engine.enumerate_breadth_first(&two_coins(), 1000).unwrap();

    for value in [
        pair(true, true),
        pair(true, false),
        pair(false, true),
        pair(false, false),
    ] {
        let p = prob_of(&likely, &value);
        assert!((p - prob_of(&depth, &value)).abs() < 1e-12);
        assert!((p - prob_of(&breadth, &value)).abs() < 1e-12);
    }
}

#[test]
fn tilted_die_matches_the_closed_form() {
    let mut engine = Engine::new(11);
    let marginal = engine.enumerate_likely_first(&tilted_die(), 1000).unwrap();

    let z = 1.0 + 1.0f64.exp() + 2.0f64.exp();
    for face in 0..3 {
        let expected = (face as f64).exp() / z;
        let actual = prob_of(&marginal, &Value::Int(face));
        assert!(
            (actual - expected).abs() < 1e-12,
            "face {face}: {actual} vs {expected}"
        );
    }
}

#[test]
fn execution_bound_truncates_to_a_single_value() {
    let mut engine = Engine::new(11);
    let marginal = engine.enumerate_likely_first(&two_coins(), 1).unwrap();
    let support = marginal.support(&[]).unwrap().unwrap();
    assert_eq!(support.len(), 1);
    assert!((prob_of(&marginal, &support[0]) - 1.0).abs() < 1e-12);
}

#[test]
fn best_first_reaches_short_geometric_runs_first() {
    let mut engine = Engine::new(11);
    let marginal = engine.enumerate_likely_first(&geometric(), 40).unwrap();

    // Truncation mass is 2^-40; the first bins are exact to that resolution.
    assert!((prob_of(&marginal, &Value::Int(0)) - 0.5).abs() < 1e-9);
    assert!((prob_of(&marginal, &Value::Int(3)) - 0.0625).abs() < 1e-9);
}

#[test]
fn continuous_distributions_cannot_be_enumerated() {
    let mut engine = Engine::new(11);
    let err = engine
        .enumerate_likely_first(&continuous_draw(), 1000)
        .unwrap_err();
    assert!(matches!(err, SeineError::EnumerationUnsupported(_)));
}

#[test]
fn unsatisfiable_evidence_is_an_empty_posterior() {
    let mut engine = Engine::new(11);
    let err = engine
        .enumerate_likely_first(&impossible_evidence(), 1000)
        .unwrap_err();
    assert!(matches!(err, SeineError::EmptyPosterior(_)));
}

#[test]
fn completion_order_shapes_the_marginal_support() {
    let mut engine = Engine::new(11);

    let first_of = |marginal: &Erp| marginal.support(&[]).unwrap().unwrap()[0].clone();

    let likely = engine.enumerate_likely_first(&two_coins(), 1000).unwrap();
    assert_eq!(first_of(&likely), pair(true, true));

    let depth = engine.enumerate_depth_first(&two_coins(), 1000).unwrap();
    assert_eq!(first_of(&depth), pair(false, false));

    let breadth = engine.enumerate_breadth_first(&two_coins(), 1000).unwrap();
    assert_eq!(first_of(&breadth), pair(true, true));
}

#[test]
fn closure_backed_distributions_enumerate_like_built_ins() {
    // A loaded three-sided die assembled from closures.
    let theta = [1.0, 3.0, 6.0];
    let loaded = CustomErp::new(
        "loaded-die",
        Rc::new(|params, rng| discrete().sample(params, rng)),
        Rc::new(|params, value| discrete().score(params, value)),
        Some(Rc::new(|params| {
            discrete().support(params).expect("discrete has support")
        })),
    );
    let params = vec![Value::List(theta.iter().copied().map(Value::Float).collect())];

    let program: Computation = Rc::new(move |k: Cont| sample(k, loaded.clone(), params.clone()));
    let mut engine = Engine::new(11);
    let marginal = engine.enumerate_likely_first(&program, 1000).unwrap();

    let total: f64 = theta.iter().sum();
    for (face, &weight) in theta.iter().enumerate() {
        let actual = prob_of(&marginal, &Value::Int(face as i64));
        assert!((actual - weight / total).abs() < 1e-12);
    }
}

#[test]
fn zero_execution_bound_is_degenerate() {
    let mut engine = Engine::new(11);
    let err = engine.enumerate_likely_first(&two_coins(), 0).unwrap_err();
    assert!(matches!(err, SeineError::DegenerateParameters(_)));
}
