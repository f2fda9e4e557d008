use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use seine_core::{Distribution, Erp, RngHandle, SeineError, Value};

use crate::config::EnumerateConfig;
use crate::determinism;
use crate::enumerate::Enumerate;
use crate::forward::Forward;
use crate::smc::ParticleFilter;
use crate::step::{Computation, Cont, Resume, ScoreFn, Step};

/// Per-run state shared with the installed strategy.
pub(crate) struct EngineCtx {
    /// RNG for the run, seeded from the engine's master seed and run index.
    pub rng: RngHandle,
}

/// What the driver loop does next after a strategy handled a suspension.
pub(crate) enum Control {
    /// Dispatch another suspension from a fresh driver frame.
    Resume(Step),
    /// Inference finished; deliver the distribution to the caller.
    Done(Erp),
}

/// An inference strategy occupying the coroutine slot.
///
/// Each handler receives the suspension's payload and returns either the
/// next suspension to dispatch (the trampoline: the driver re-enters from a
/// shallow frame, so native stack depth stays bounded across resumptions) or
/// the finished distribution.
pub(crate) trait Strategy {
    fn name(&self) -> &'static str;

    fn start(&mut self, ctx: &mut EngineCtx, program: &Computation)
        -> Result<Control, SeineError>;

    fn sample(
        &mut self,
        ctx: &mut EngineCtx,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
    ) -> Result<Control, SeineError>;

    fn factor(&mut self, ctx: &mut EngineCtx, k: Resume, score: f64)
        -> Result<Control, SeineError>;

    fn exit(&mut self, ctx: &mut EngineCtx, value: Value) -> Result<Control, SeineError>;

    /// Combined draw-and-weight suspension. The default body draws from the
    /// prior and reroutes through [`Strategy::factor`] with the extra score,
    /// resuming the caller with the drawn value; strategies with a cheaper
    /// formulation (enumeration) override it.
    fn sample_with_factor(
        &mut self,
        ctx: &mut EngineCtx,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
        score_fn: ScoreFn,
    ) -> Result<Control, SeineError> {
        let value = dist.sample(&params, &mut ctx.rng)?;
        let score = score_fn(&value);
        let resume: Resume = {
            let value = value.clone();
            Rc::new(move || k(value.clone()))
        };
        self.factor(ctx, resume, score)
    }
}

/// The inference engine: owns the coroutine slot and the seeding policy.
///
/// The slot holds exactly one installed strategy at any time and rests on a
/// forward pass (samples draw from the prior, factor statements are
/// rejected). Inference entry points install a strategy, drive the program
/// to completion, and restore the predecessor (on the error path too, so a
/// failed run leaves the engine usable). Each run draws from an RNG substream
/// keyed by the strategy's stream label and that strategy's own run counter,
/// so every sequence of runs is reproducible from the master seed and runs
/// of different strategies never perturb each other's streams.
pub struct Engine {
    master_seed: u64,
    runs: BTreeMap<&'static str, u64>,
    current: Box<dyn Strategy>,
}

impl Engine {
    /// Creates an engine with the given master seed.
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            runs: BTreeMap::new(),
            current: Box::new(Forward),
        }
    }

    /// Name of the strategy currently occupying the coroutine slot.
    pub fn installed_strategy(&self) -> &'static str {
        self.current.name()
    }

    /// Executes `program` under the resting slot occupant: draws follow the
    /// prior and a factor statement fails with
    /// [`SeineError::FactorOutsideInference`].
    pub fn run(&mut self, program: &Computation) -> Result<Erp, SeineError> {
        let occupant = self.current.name();
        let mut ctx = self.next_ctx(occupant);
        Self::drive(&mut ctx, self.current.as_mut(), program)
    }

    /// Runs forward (prior) sampling: a single execution, delivered as a
    /// point-mass distribution over its return value.
    pub fn forward(&mut self, program: &Computation) -> Result<Erp, SeineError> {
        self.run_strategy(Box::new(Forward), program)
    }

    /// Exhaustively enumerates the program's choice tree under `config`.
    pub fn enumerate(
        &mut self,
        program: &Computation,
        config: &EnumerateConfig,
    ) -> Result<Erp, SeineError> {
        let strategy = Enumerate::new(config)?;
        self.run_strategy(Box::new(strategy), program)
    }

    /// Enumeration visiting the highest-scored frontier state first.
    pub fn enumerate_likely_first(
        &mut self,
        program: &Computation,
        max_executions: usize,
    ) -> Result<Erp, SeineError> {
        self.enumerate(program, &EnumerateConfig::likely_first(max_executions))
    }

    /// Enumeration visiting the most recently enqueued state first.
    pub fn enumerate_depth_first(
        &mut self,
        program: &Computation,
        max_executions: usize,
    ) -> Result<Erp, SeineError> {
        self.enumerate(program, &EnumerateConfig::depth_first(max_executions))
    }

    /// Enumeration visiting the earliest enqueued state first.
    pub fn enumerate_breadth_first(
        &mut self,
        program: &Computation,
        max_executions: usize,
    ) -> Result<Erp, SeineError> {
        self.enumerate(program, &EnumerateConfig::breadth_first(max_executions))
    }

    /// Runs a sequential-importance-resampling particle filter with
    /// `particles` synchronized executions.
    pub fn particle_filter(
        &mut self,
        program: &Computation,
        particles: usize,
    ) -> Result<Erp, SeineError> {
        let strategy = ParticleFilter::new(particles)?;
        self.run_strategy(Box::new(strategy), program)
    }

    fn next_ctx(&mut self, strategy: &'static str) -> EngineCtx {
        let counter = self.runs.entry(strategy).or_insert(0);
        let seed = determinism::run_seed(self.master_seed, strategy, *counter);
        *counter += 1;
        EngineCtx {
            rng: RngHandle::from_seed(seed),
        }
    }

    fn run_strategy(
        &mut self,
        strategy: Box<dyn Strategy>,
        program: &Computation,
    ) -> Result<Erp, SeineError> {
        let mut ctx = self.next_ctx(strategy.name());
        let predecessor = mem::replace(&mut self.current, strategy);
        let outcome = Self::drive(&mut ctx, self.current.as_mut(), program);
        // Restore the predecessor on success and failure alike.
        self.current = predecessor;
        outcome
    }

    fn drive(
        ctx: &mut EngineCtx,
        strategy: &mut dyn Strategy,
        program: &Computation,
    ) -> Result<Erp, SeineError> {
        let mut control = strategy.start(ctx, program)?;
        loop {
            let step = match control {
                Control::Done(result) => return Ok(result),
                Control::Resume(step) => step,
            };
            control = match step {
                Step::Sample { dist, params, next } => strategy.sample(ctx, next, dist, params)?,
                Step::SampleWithFactor {
                    dist,
                    params,
                    score_fn,
                    next,
                } => strategy.sample_with_factor(ctx, next, dist, params, score_fn)?,
                Step::Factor { score, next } => strategy.factor(ctx, next, score)?,
                Step::Exit { value } => strategy.exit(ctx, value)?,
            };
        }
    }
}
