//! The distribution (ERP) interface: sample, log-score, optional support.

use std::rc::Rc;

use crate::errors::{ErrorInfo, SeineError};
use crate::rng::RngHandle;
use crate::value::Value;

/// Shared handle to a distribution.
///
/// Handles are reference counted so steps, frontier states, and particles
/// can hold the same distribution without copying it.
pub type Erp = Rc<dyn Distribution>;

/// The uniform interface every distribution implements.
///
/// Parameters are positional tuples of [`Value`]s. All operations are pure
/// and deterministic apart from `sample`'s use of the RNG handle. Invalid
/// parameters surface as [`SeineError::DegenerateParameters`]; a value merely
/// outside the support scores negative infinity instead of failing.
pub trait Distribution {
    /// Short stable name used in diagnostics and error context.
    fn name(&self) -> &str;

    /// Draws a value consistent with the density.
    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError>;

    /// Log-probability of `value` under `params`; negative infinity for
    /// values outside the support (including wrongly typed values and
    /// non-integers for integer-valued distributions).
    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError>;

    /// Enumerates every value of the support in deterministic order, or
    /// `None` for continuous distributions.
    fn support(&self, params: &[Value]) -> Option<Result<Vec<Value>, SeineError>> {
        let _ = params;
        None
    }
}

impl std::fmt::Debug for dyn Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Distribution").field(&self.name()).finish()
    }
}

/// Sampler closure backing a [`CustomErp`].
pub type SampleFn = Rc<dyn Fn(&[Value], &mut RngHandle) -> Result<Value, SeineError>>;
/// Scorer closure backing a [`CustomErp`].
pub type ScoreClosure = Rc<dyn Fn(&[Value], &Value) -> Result<f64, SeineError>>;
/// Support closure backing a [`CustomErp`].
pub type SupportFn = Rc<dyn Fn(&[Value]) -> Result<Vec<Value>, SeineError>>;

/// A distribution assembled from host closures.
///
/// This is the extension point for distributions the runtime does not ship:
/// provide a sampler and a scorer, and optionally a finite support so the
/// result can participate in enumeration.
pub struct CustomErp {
    name: String,
    sampler: SampleFn,
    scorer: ScoreClosure,
    enumerator: Option<SupportFn>,
}

impl CustomErp {
    /// Builds a distribution handle from the provided closures.
    pub fn new(
        name: impl Into<String>,
        sampler: SampleFn,
        scorer: ScoreClosure,
        enumerator: Option<SupportFn>,
    ) -> Erp {
        Rc::new(Self {
            name: name.into(),
            sampler,
            scorer,
            enumerator,
        })
    }
}

impl Distribution for CustomErp {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        (self.sampler)(params, rng)
    }

    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError> {
        (self.scorer)(params, value)
    }

    fn support(&self, params: &[Value]) -> Option<Result<Vec<Value>, SeineError>> {
        self.enumerator.as_ref().map(|support| support(params))
    }
}

pub(crate) fn param_float(params: &[Value], index: usize, dist: &str) -> Result<f64, SeineError> {
    let value = params.get(index).and_then(Value::as_float);
    match value {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(degenerate_param(params, index, dist, "a finite real")),
    }
}

pub(crate) fn param_int(params: &[Value], index: usize, dist: &str) -> Result<i64, SeineError> {
    params
        .get(index)
        .and_then(Value::as_int)
        .ok_or_else(|| degenerate_param(params, index, dist, "an integer"))
}

pub(crate) fn param_weights(
    params: &[Value],
    index: usize,
    dist: &str,
) -> Result<Vec<f64>, SeineError> {
    let items = match params.get(index) {
        Some(Value::List(items)) => items,
        _ => return Err(degenerate_param(params, index, dist, "a list of weights")),
    };
    let mut weights = Vec::with_capacity(items.len());
    for item in items {
        match item.as_float() {
            Some(w) if w.is_finite() && w >= 0.0 => weights.push(w),
            _ => {
                return Err(degenerate_param(
                    params,
                    index,
                    dist,
                    "finite non-negative weights",
                ))
            }
        }
    }
    Ok(weights)
}

pub(crate) fn degenerate_param(
    params: &[Value],
    index: usize,
    dist: &str,
    expected: &str,
) -> SeineError {
    let mut info = ErrorInfo::new(
        "parameter-invalid",
        format!("parameter {index} of {dist} must be {expected}"),
    )
    .in_distribution(dist)
    .with_detail("index", index);
    if let Some(value) = params.get(index) {
        info = info.with_offender(value.clone());
    }
    SeineError::DegenerateParameters(info)
}
