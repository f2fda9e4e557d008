use std::rc::Rc;

use seine_core::{Erp, Value};

/// Continuation of a user computation: consumes the value produced at a
/// suspension point and runs the program to its next suspension, returning
/// the reified [`Step`] found there.
///
/// Continuations close over immutable state only, so cloning one (`Rc`
/// clone) is the deep copy enumeration and particle resampling rely on, and
/// invoking one repeatedly is safe.
pub type Cont = Rc<dyn Fn(Value) -> Step>;

/// Resumption stored by a factor statement; consumes nothing.
pub type Resume = Rc<dyn Fn() -> Step>;

/// A reified user program: invoked with its terminal continuation, returns
/// the program's first suspension. Re-entrant; the particle filter enters
/// it once per particle.
pub type Computation = Rc<dyn Fn(Cont) -> Step>;

/// Per-value extra log-score used by combined draw-and-weight suspensions.
pub type ScoreFn = Rc<dyn Fn(&Value) -> f64>;

/// A suspension of the user computation, handed to the installed strategy
/// by the engine's driver loop.
pub enum Step {
    /// A random choice from `dist` under `params`; `next` consumes the
    /// chosen value.
    Sample {
        /// Distribution to draw from.
        dist: Erp,
        /// Positional parameters of the draw.
        params: Vec<Value>,
        /// Continuation consuming the drawn value.
        next: Cont,
    },
    /// A random choice immediately weighted by a per-value score.
    SampleWithFactor {
        /// Distribution to draw from.
        dist: Erp,
        /// Positional parameters of the draw.
        params: Vec<Value>,
        /// Extra log-score applied to the drawn value.
        score_fn: ScoreFn,
        /// Continuation consuming the drawn value.
        next: Cont,
    },
    /// A log-weight added to the current execution path.
    Factor {
        /// Log-weight of the evidence.
        score: f64,
        /// Resumption after the factor statement.
        next: Resume,
    },
    /// Termination of one execution with the program's return value.
    Exit {
        /// The return value.
        value: Value,
    },
}

/// Builds the suspension for a random draw from `dist`.
pub fn sample(k: Cont, dist: Erp, params: Vec<Value>) -> Step {
    Step::Sample {
        dist,
        params,
        next: k,
    }
}

/// Builds the suspension for a draw from `dist` weighted by `score_fn` of
/// the drawn value.
pub fn sample_with_factor(k: Cont, dist: Erp, params: Vec<Value>, score_fn: ScoreFn) -> Step {
    Step::SampleWithFactor {
        dist,
        params,
        score_fn,
        next: k,
    }
}

/// Builds the suspension for a factor statement adding `log_weight`.
pub fn factor(k: Resume, log_weight: f64) -> Step {
    Step::Factor {
        score: log_weight,
        next: k,
    }
}

/// Builds the terminal suspension carrying the program's return value.
pub fn exit(value: Value) -> Step {
    Step::Exit { value }
}

/// The terminal continuation handed to a program entry: routes the return
/// value into [`Step::Exit`].
pub(crate) fn terminal() -> Cont {
    Rc::new(|value| Step::Exit { value })
}
