//! Forward (prior) sampling: a single unweighted execution.

use seine_core::dist::delta;
use seine_core::{Distribution, Erp, ErrorInfo, SeineError, Value};

use crate::engine::{Control, EngineCtx, Strategy};
use crate::step::{terminal, Computation, Cont, Resume};

/// Draws every `sample` from the prior, rejects `factor`, and delivers the
/// single return value as a point mass. Also the resting occupant of the
/// coroutine slot: running a program with no inference installed behaves
/// exactly like one forward pass.
pub(crate) struct Forward;

impl Strategy for Forward {
    fn name(&self) -> &'static str {
        "forward"
    }

    fn start(
        &mut self,
        _ctx: &mut EngineCtx,
        program: &Computation,
    ) -> Result<Control, SeineError> {
        Ok(Control::Resume(program(terminal())))
    }

    fn sample(
        &mut self,
        ctx: &mut EngineCtx,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
    ) -> Result<Control, SeineError> {
        let value = dist.sample(&params, &mut ctx.rng)?;
        Ok(Control::Resume(k(value)))
    }

    fn factor(
        &mut self,
        _ctx: &mut EngineCtx,
        _k: Resume,
        score: f64,
    ) -> Result<Control, SeineError> {
        Err(SeineError::FactorOutsideInference(
            ErrorInfo::new(
                "factor-outside-inference",
                "factor statements require an enumeration or particle filter run",
            )
            .in_strategy(self.name())
            .with_detail("score", score)
            .with_hint("run the program under Engine::enumerate or Engine::particle_filter"),
        ))
    }

    fn exit(&mut self, _ctx: &mut EngineCtx, value: Value) -> Result<Control, SeineError> {
        Ok(Control::Done(delta(value)))
    }
}
