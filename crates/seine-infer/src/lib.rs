#![deny(missing_docs)]
#![doc = "Continuation-passing inference runtime for seine programs. User computations suspend at `sample`, `factor`, and `exit`; the engine routes each suspension to the installed strategy (forward sampling, exhaustive enumeration, or a sequential-importance-resampling particle filter) and hands back a normalized marginal distribution over return values."]

/// Serde-backed run configuration and defaults.
pub mod config;
/// Deterministic seed derivation for inference runs.
pub mod determinism;
/// The engine: coroutine slot, dispatch, and the trampolining driver loop.
pub mod engine;
/// Marginal accumulation and the distributions published by inference runs.
pub mod marginal;
/// Host-side helpers: memoization, foreign calls, and display.
pub mod prim;
/// Reified suspension points of a user computation.
pub mod step;

mod enumerate;
mod forward;
mod smc;

pub use config::{EnumerateConfig, InferConfig, SearchOrder, SeedPolicy, SmcConfig};
pub use engine::Engine;
pub use marginal::MarginalBuilder;
pub use step::{
    exit, factor, sample, sample_with_factor, Computation, Cont, Resume, ScoreFn, Step,
};
