//! Built-in distributions.
//!
//! Each constructor returns a shared [`Erp`] handle. Samplers draw uniforms
//! through [`RngHandle::uniform_unit`] so a fixed seed reproduces the same
//! values on every platform.

use std::rc::Rc;

use crate::erp::{param_float, param_int, param_weights, Distribution, Erp};
use crate::errors::{ErrorInfo, SeineError};
use crate::math::multinomial_sample;
use crate::rng::RngHandle;
use crate::value::Value;

/// Continuous uniform distribution on `[a, b]`. No support.
pub fn uniform() -> Erp {
    Rc::new(Uniform)
}

/// Boolean Bernoulli distribution with success probability `p`.
pub fn bernoulli() -> Erp {
    Rc::new(Bernoulli)
}

/// Uniform integer distribution on `[0, n)`.
pub fn random_integer() -> Erp {
    Rc::new(RandomInteger)
}

/// Gaussian distribution with mean `mu` and standard deviation `sigma`.
pub fn gaussian() -> Erp {
    Rc::new(Gaussian)
}

/// Distribution over indices `0..len(theta)` proportional to unnormalized
/// non-negative weights `theta`.
pub fn discrete() -> Erp {
    Rc::new(Discrete)
}

/// Point mass at `value`: scores zero there and negative infinity elsewhere.
///
/// Published by forward runs. Deliberately carries no support function, so a
/// forward result cannot be fed back into enumeration.
pub fn delta(value: Value) -> Erp {
    Rc::new(Delta { value })
}

struct Uniform;

impl Uniform {
    fn bounds(&self, params: &[Value]) -> Result<(f64, f64), SeineError> {
        let a = param_float(params, 0, self.name())?;
        let b = param_float(params, 1, self.name())?;
        if b <= a {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new("interval-empty", "uniform interval must satisfy a < b")
                    .in_distribution(self.name())
                    .with_detail("a", a)
                    .with_detail("b", b),
            ));
        }
        Ok((a, b))
    }
}

impl Distribution for Uniform {
    fn name(&self) -> &str {
        "uniform"
    }

    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        let (a, b) = self.bounds(params)?;
        Ok(Value::Float(a + rng.uniform_unit() * (b - a)))
    }

    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError> {
        let (a, b) = self.bounds(params)?;
        Ok(match value.as_float() {
            Some(x) if x >= a && x <= b => -(b - a).ln(),
            _ => f64::NEG_INFINITY,
        })
    }
}

struct Bernoulli;

impl Bernoulli {
    fn rate(&self, params: &[Value]) -> Result<f64, SeineError> {
        let p = param_float(params, 0, self.name())?;
        if !(0.0..=1.0).contains(&p) {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new("rate-out-of-range", "bernoulli rate must lie in [0, 1]")
                    .in_distribution(self.name())
                    .with_offender(Value::Float(p)),
            ));
        }
        Ok(p)
    }
}

impl Distribution for Bernoulli {
    fn name(&self) -> &str {
        "bernoulli"
    }

    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        let p = self.rate(params)?;
        Ok(Value::Bool(rng.uniform_unit() < p))
    }

    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError> {
        let p = self.rate(params)?;
        Ok(match value.as_bool() {
            Some(true) => p.ln(),
            Some(false) => (1.0 - p).ln(),
            None => f64::NEG_INFINITY,
        })
    }

    fn support(&self, params: &[Value]) -> Option<Result<Vec<Value>, SeineError>> {
        Some(
            self.rate(params)
                .map(|_| vec![Value::Bool(true), Value::Bool(false)]),
        )
    }
}

struct RandomInteger;

impl RandomInteger {
    fn cardinality(&self, params: &[Value]) -> Result<i64, SeineError> {
        let n = param_int(params, 0, self.name())?;
        if n < 1 {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new("cardinality-invalid", "random integer bound must be >= 1")
                    .in_distribution(self.name())
                    .with_offender(Value::Int(n)),
            ));
        }
        Ok(n)
    }
}

impl Distribution for RandomInteger {
    fn name(&self) -> &str {
        "random-integer"
    }

    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        let n = self.cardinality(params)?;
        let drawn = (rng.uniform_unit() * n as f64).floor() as i64;
        Ok(Value::Int(drawn.min(n - 1)))
    }

    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError> {
        let n = self.cardinality(params)?;
        Ok(match value.as_int() {
            Some(v) if (0..n).contains(&v) => -(n as f64).ln(),
            _ => f64::NEG_INFINITY,
        })
    }

    fn support(&self, params: &[Value]) -> Option<Result<Vec<Value>, SeineError>> {
        Some(
            self.cardinality(params)
                .map(|n| (0..n).map(Value::Int).collect()),
        )
    }
}

struct Gaussian;

impl Gaussian {
    fn moments(&self, params: &[Value]) -> Result<(f64, f64), SeineError> {
        let mu = param_float(params, 0, self.name())?;
        let sigma = param_float(params, 1, self.name())?;
        if sigma <= 0.0 {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new("sigma-invalid", "gaussian sigma must be positive")
                    .in_distribution(self.name())
                    .with_offender(Value::Float(sigma)),
            ));
        }
        Ok((mu, sigma))
    }
}

impl Distribution for Gaussian {
    fn name(&self) -> &str {
        "gaussian"
    }

    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        let (mu, sigma) = self.moments(params)?;
        // Marsaglia polar method.
        let standard = loop {
            let u = 2.0 * rng.uniform_unit() - 1.0;
            let v = 2.0 * rng.uniform_unit() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                break u * (-2.0 * s.ln() / s).sqrt();
            }
        };
        Ok(Value::Float(mu + sigma * standard))
    }

    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError> {
        let (mu, sigma) = self.moments(params)?;
        Ok(match value.as_float() {
            Some(x) if x.is_finite() => {
                let z = (x - mu) / sigma;
                -0.5 * std::f64::consts::TAU.ln() - sigma.ln() - 0.5 * z * z
            }
            _ => f64::NEG_INFINITY,
        })
    }
}

struct Discrete;

impl Discrete {
    fn weights(&self, params: &[Value]) -> Result<(Vec<f64>, f64), SeineError> {
        let weights = param_weights(params, 0, self.name())?;
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new(
                    "weights-degenerate",
                    "discrete weights must be non-empty with positive total mass",
                )
                .in_distribution(self.name())
                .with_detail("len", weights.len())
                .with_detail("total", total),
            ));
        }
        Ok((weights, total))
    }
}

impl Distribution for Discrete {
    fn name(&self) -> &str {
        "discrete"
    }

    fn sample(&self, params: &[Value], rng: &mut RngHandle) -> Result<Value, SeineError> {
        let (weights, _) = self.weights(params)?;
        let index = multinomial_sample(rng, &weights)?;
        Ok(Value::Int(index as i64))
    }

    fn score(&self, params: &[Value], value: &Value) -> Result<f64, SeineError> {
        let (weights, total) = self.weights(params)?;
        Ok(match value.as_int() {
            Some(v) if v >= 0 && (v as usize) < weights.len() => {
                (weights[v as usize] / total).ln()
            }
            _ => f64::NEG_INFINITY,
        })
    }

    fn support(&self, params: &[Value]) -> Option<Result<Vec<Value>, SeineError>> {
        Some(
            self.weights(params)
                .map(|(weights, _)| (0..weights.len() as i64).map(Value::Int).collect()),
        )
    }
}

struct Delta {
    value: Value,
}

impl Distribution for Delta {
    fn name(&self) -> &str {
        "delta"
    }

    fn sample(&self, _params: &[Value], _rng: &mut RngHandle) -> Result<Value, SeineError> {
        Ok(self.value.clone())
    }

    fn score(&self, _params: &[Value], value: &Value) -> Result<f64, SeineError> {
        Ok(if *value == self.value {
            0.0
        } else {
            f64::NEG_INFINITY
        })
    }
}
