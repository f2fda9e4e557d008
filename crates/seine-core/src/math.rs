//! Log-space numeric helpers shared by the inference strategies.

use crate::errors::{ErrorInfo, SeineError};
use crate::rng::RngHandle;
use crate::value::Value;

/// Computes `ln(sum(exp(x)))` without overflowing intermediate exponentials.
///
/// Returns negative infinity for an empty slice or when every entry is
/// negative infinity.
pub fn logsumexp(xs: &[f64]) -> f64 {
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = xs.iter().map(|x| (x - max).exp()).sum();
    max + sum.ln()
}

/// Draws an index proportional to the (unnormalized, non-negative) weights.
///
/// Sampling is inverse-CDF against a uniform draw in `[0, total)`. A draw of
/// exactly zero against leading-zero weights yields the first index with
/// positive weight, and the fall-through at the top of the accumulated range
/// yields the last index with positive weight; an index with zero weight is
/// never returned.
pub fn multinomial_sample(rng: &mut RngHandle, weights: &[f64]) -> Result<usize, SeineError> {
    let total = validate_weights(weights)?;
    let draw = rng.uniform_unit() * total;
    let mut acc = 0.0;
    let mut last_positive = None;
    for (index, &weight) in weights.iter().enumerate() {
        acc += weight;
        if weight > 0.0 {
            last_positive = Some(index);
            if draw < acc {
                return Ok(index);
            }
        }
    }
    // Rounding pushed the draw past the final accumulated bound.
    last_positive.ok_or_else(|| {
        SeineError::Engine(ErrorInfo::new(
            "multinomial-exhausted",
            "no positive weight survived accumulation",
        ))
    })
}

fn validate_weights(weights: &[f64]) -> Result<f64, SeineError> {
    if weights.is_empty() {
        return Err(SeineError::DegenerateParameters(ErrorInfo::new(
            "weights-empty",
            "multinomial weights must be non-empty",
        )));
    }
    let mut total = 0.0;
    for (index, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new(
                    "weight-invalid",
                    "multinomial weights must be finite and non-negative",
                )
                .with_offender(Value::Float(weight))
                .with_detail("index", index),
            ));
        }
        total += weight;
    }
    if total <= 0.0 {
        return Err(SeineError::DegenerateParameters(
            ErrorInfo::new("weights-zero", "multinomial weights sum to zero")
                .with_detail("len", weights.len()),
        ));
    }
    Ok(total)
}
