//! JSON report assembly for CLI runs.

use serde::Serialize;

use seine_core::{Distribution, Erp, RngHandle, SeineError, Value};

/// Report printed by `seine-sim run`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Inputs that produced this report.
    pub provenance: RunProvenance,
    /// Normalized marginal entries in support order.
    pub marginal: Vec<MarginalEntry>,
}

/// Provenance block of a run report.
#[derive(Debug, Serialize)]
pub struct RunProvenance {
    /// Demo model name.
    pub model: String,
    /// Inference method label.
    pub method: String,
    /// Master seed of the run.
    pub seed: u64,
    /// Frontier discipline, for enumeration runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Execution bound, for enumeration runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_executions: Option<usize>,
    /// Particle count, for particle filter runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particles: Option<usize>,
}

/// One support value with its normalized probability.
#[derive(Debug, Serialize)]
pub struct MarginalEntry {
    /// Return value of the user program.
    pub value: Value,
    /// Normalized probability mass on that value.
    pub prob: f64,
}

/// Extracts the marginal entries of a finished run.
///
/// Distributions with a support report every value with its probability; a
/// supportless point mass (forward runs) reports its single value, which
/// its sampler returns deterministically.
pub fn marginal_entries(dist: &Erp, seed: u64) -> Result<Vec<MarginalEntry>, SeineError> {
    match dist.support(&[]) {
        Some(values) => {
            let mut entries = Vec::new();
            for value in values? {
                let prob = dist.score(&[], &value)?.exp();
                entries.push(MarginalEntry { value, prob });
            }
            Ok(entries)
        }
        None => {
            let mut rng = RngHandle::from_seed(seed);
            let value = dist.sample(&[], &mut rng)?;
            Ok(vec![MarginalEntry { value, prob: 1.0 }])
        }
    }
}
