use std::collections::BTreeMap;
use std::rc::Rc;

use seine_core::{Distribution, Erp, ErrorInfo, RngHandle, SeineError, Value};

/// Accumulates weighted return values into a normalized discrete
/// distribution.
///
/// Bins are keyed by the value's canonical key and kept in insertion order,
/// so the finished marginal's support order equals the order in which
/// execution paths completed. This builder is the sole publisher of marginal
/// distributions across all strategies.
#[derive(Default)]
pub struct MarginalBuilder {
    bins: Vec<Bin>,
    index: BTreeMap<String, usize>,
}

struct Bin {
    weight: f64,
    value: Value,
}

impl MarginalBuilder {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds unnormalized `weight` to the bin for `value`, creating the bin
    /// (and remembering `value` as its representative) if absent.
    pub fn insert(&mut self, value: Value, weight: f64) {
        let key = value.canonical_key();
        match self.index.get(&key) {
            Some(&position) => self.bins[position].weight += weight,
            None => {
                self.index.insert(key, self.bins.len());
                self.bins.push(Bin { weight, value });
            }
        }
    }

    /// Number of distinct return values observed so far.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when no return value has been observed.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Normalizes the accumulated mass and publishes the marginal.
    ///
    /// Fails with [`SeineError::EmptyPosterior`] when the total unnormalized
    /// weight is not positive (no path completed, or every path scored
    /// minus infinity).
    pub fn build(self) -> Result<Erp, SeineError> {
        let total: f64 = self.bins.iter().map(|bin| bin.weight).sum();
        if !(total > 0.0) {
            return Err(SeineError::EmptyPosterior(
                ErrorInfo::new(
                    "empty-posterior",
                    "marginal has no mass: every completed path scored minus infinity",
                )
                .with_detail("bins", self.bins.len())
                .with_hint("check that the program's evidence is satisfiable"),
            ));
        }
        let entries = self
            .bins
            .into_iter()
            .map(|bin| (bin.value, bin.weight / total))
            .collect();
        Ok(Rc::new(Marginal { entries }))
    }
}

/// The normalized distribution over observed return values.
struct Marginal {
    entries: Vec<(Value, f64)>,
}

impl Distribution for Marginal {
    fn name(&self) -> &str {
        "marginal"
    }

    fn sample(&self, _params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        let draw = rng.uniform_unit();
        let mut acc = 0.0;
        let mut last_positive = None;
        for (value, prob) in &self.entries {
            acc += prob;
            if *prob > 0.0 {
                last_positive = Some(value);
                if draw < acc {
                    return Ok(value.clone());
                }
            }
        }
        last_positive.cloned().ok_or_else(|| {
            SeineError::Engine(ErrorInfo::new(
                "marginal-exhausted",
                "no positive-probability entry survived accumulation",
            ))
        })
    }

    fn score(&self, _params: &[Value], value: &Value) -> Result<f64, SeineError> {
        for (stored, prob) in &self.entries {
            if stored == value {
                return Ok(prob.ln());
            }
        }
        Ok(f64::NEG_INFINITY)
    }

    fn support(&self, _params: &[Value]) -> Option<Result<Vec<Value>, SeineError>> {
        Some(Ok(self
            .entries
            .iter()
            .map(|(value, _)| value.clone())
            .collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_keep_completion_order_and_merge_weights() {
        let mut builder = MarginalBuilder::new();
        builder.insert(Value::Int(2), 0.25);
        builder.insert(Value::Int(0), 0.5);
        builder.insert(Value::Int(2), 0.25);

        let marginal = builder.build().unwrap();
        let support = marginal.support(&[]).unwrap().unwrap();
        assert_eq!(support, vec![Value::Int(2), Value::Int(0)]);
        assert!((marginal.score(&[], &Value::Int(2)).unwrap().exp() - 0.5).abs() < 1e-12);
        assert!((marginal.score(&[], &Value::Int(0)).unwrap().exp() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_total_mass_is_an_empty_posterior() {
        let mut builder = MarginalBuilder::new();
        builder.insert(Value::Bool(true), 0.0);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SeineError::EmptyPosterior(_)));

        let err = MarginalBuilder::new().build().unwrap_err();
        assert!(matches!(err, SeineError::EmptyPosterior(_)));
    }

    #[test]
    fn absent_values_score_minus_infinity() {
        let mut builder = MarginalBuilder::new();
        builder.insert(Value::Bool(true), 1.0);
        let marginal = builder.build().unwrap();
        assert_eq!(
            marginal.score(&[], &Value::Bool(false)).unwrap(),
            f64::NEG_INFINITY
        );
    }
}
