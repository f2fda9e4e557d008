use proptest::prelude::*;

use seine_core::dist::discrete;
use seine_core::{multinomial_sample, Distribution, RngHandle, Value};

fn weight_params(theta: &[f64]) -> Vec<Value> {
    vec![Value::List(theta.iter().copied().map(Value::Float).collect())]
}

#[test]
fn inverse_cdf_frequencies_match_weights() {
    let theta = [1.0, 2.0, 3.0, 0.0, 4.0];
    let total: f64 = theta.iter().sum();
    let dist = discrete();
    let params = weight_params(&theta);
    let mut rng = RngHandle::from_seed(31337);

    let draws = 1_000_000usize;
    let mut counts = [0usize; 5];
    for _ in 0..draws {
        match dist.sample(&params, &mut rng).unwrap() {
            Value::Int(index) => counts[index as usize] += 1,
            other => panic!("non-integer draw: {other}"),
        }
    }

    for (index, &weight) in theta.iter().enumerate() {
        let p = weight / total;
        if p == 0.0 {
            assert_eq!(counts[index], 0, "zero-weight index {index} was drawn");
            continue;
        }
        let expected = draws as f64 * p;
        let sigma = (draws as f64 * p * (1.0 - p)).sqrt();
        let deviation = (counts[index] as f64 - expected).abs();
        assert!(
            deviation <= 3.0 * sigma,
            "index {index}: count {} deviates {deviation} from {expected} (3 sigma = {})",
            counts[index],
            3.0 * sigma
        );
    }
}

#[test]
fn leading_zeros_are_never_drawn() {
    let dist = discrete();
    let params = weight_params(&[0.0, 0.0, 1.0]);
    let mut rng = RngHandle::from_seed(7);
    for _ in 0..1_000 {
        assert_eq!(dist.sample(&params, &mut rng).unwrap(), Value::Int(2));
    }
}

proptest! {
    #[test]
    fn sampled_index_always_has_positive_weight(
        raw in proptest::collection::vec(0u8..=3, 1..8),
        seed in any::<u64>(),
    ) {
        let theta: Vec<f64> = raw.iter().map(|&w| w as f64 * 0.5).collect();
        prop_assume!(theta.iter().any(|&w| w > 0.0));
        let mut rng = RngHandle::from_seed(seed);
        let index = multinomial_sample(&mut rng, &theta).unwrap();
        prop_assert!(theta[index] > 0.0);
    }
}
