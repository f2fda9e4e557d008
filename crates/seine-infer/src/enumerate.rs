//! Exhaustive enumeration over finite-support choice trees.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::mem;

use seine_core::{Distribution, Erp, ErrorInfo, SeineError, Value};

use crate::config::{EnumerateConfig, SearchOrder};
use crate::engine::{Control, EngineCtx, Strategy};
use crate::marginal::MarginalBuilder;
use crate::step::{terminal, Computation, Cont, Resume, ScoreFn};

/// One branch of the choice tree awaiting exploration: the continuation of
/// the suspended execution, the support value to resume it with, and the
/// cumulative log-score of the path up to and including that choice.
struct FrontierState {
    resume: Cont,
    value: Value,
    score: f64,
}

/// Frontier state ranked for the best-first discipline: higher cumulative
/// score wins, ties fall back to enqueue order so runs are deterministic.
struct RankedState {
    state: FrontierState,
    seq: u64,
}

impl Ord for RankedState {
    fn cmp(&self, other: &Self) -> Ordering {
        self.state
            .score
            .total_cmp(&other.state.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for RankedState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankedState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedState {}

enum Frontier {
    LikelyFirst { heap: BinaryHeap<RankedState>, seq: u64 },
    DepthFirst(Vec<FrontierState>),
    BreadthFirst(VecDeque<FrontierState>),
}

impl Frontier {
    fn for_order(order: SearchOrder) -> Self {
        match order {
            SearchOrder::LikelyFirst => Frontier::LikelyFirst {
                heap: BinaryHeap::new(),
                seq: 0,
            },
            SearchOrder::DepthFirst => Frontier::DepthFirst(Vec::new()),
            SearchOrder::BreadthFirst => Frontier::BreadthFirst(VecDeque::new()),
        }
    }

    fn enqueue(&mut self, state: FrontierState) {
        match self {
            Frontier::LikelyFirst { heap, seq } => {
                heap.push(RankedState { state, seq: *seq });
                *seq += 1;
            }
            Frontier::DepthFirst(stack) => stack.push(state),
            Frontier::BreadthFirst(queue) => queue.push_back(state),
        }
    }

    fn dequeue(&mut self) -> Option<FrontierState> {
        match self {
            Frontier::LikelyFirst { heap, .. } => heap.pop().map(|ranked| ranked.state),
            Frontier::DepthFirst(stack) => stack.pop(),
            Frontier::BreadthFirst(queue) => queue.pop_front(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Frontier::LikelyFirst { heap, .. } => heap.is_empty(),
            Frontier::DepthFirst(stack) => stack.is_empty(),
            Frontier::BreadthFirst(queue) => queue.is_empty(),
        }
    }
}

/// Exhaustive exploration of every support branch, weighted by cumulative
/// log-score. Exact when the choice tree is finite and `max_executions` is
/// not reached; a truncated approximation otherwise.
pub(crate) struct Enumerate {
    frontier: Frontier,
    score: f64,
    completed: usize,
    max_executions: usize,
    marginal: MarginalBuilder,
}

impl Enumerate {
    pub(crate) fn new(config: &EnumerateConfig) -> Result<Self, SeineError> {
        if config.max_executions == 0 {
            return Err(SeineError::DegenerateParameters(
                ErrorInfo::new(
                    "max-executions-zero",
                    "enumeration requires at least one execution",
                )
                .in_strategy("enumerate"),
            ));
        }
        Ok(Self {
            frontier: Frontier::for_order(config.order),
            score: 0.0,
            completed: 0,
            max_executions: config.max_executions,
            marginal: MarginalBuilder::new(),
        })
    }

    /// Expands one random choice: enqueues every support branch (including
    /// minus-infinity scored ones, which surface as zero-probability bins),
    /// then advances to the frontier's next state.
    fn expand(
        &mut self,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
        extra: Option<&ScoreFn>,
    ) -> Result<Control, SeineError> {
        let support = match dist.support(&params) {
            Some(values) => values?,
            None => {
                return Err(SeineError::EnumerationUnsupported(
                    ErrorInfo::new(
                        "support-missing",
                        "enumeration requires a finite support function",
                    )
                    .in_strategy("enumerate")
                    .in_distribution(dist.name())
                    .with_hint("use a discrete distribution or provide a support closure"),
                ))
            }
        };
        for value in support {
            let mut branch = self.score + dist.score(&params, &value)?;
            if let Some(extra) = extra {
                branch += extra(&value);
            }
            self.frontier.enqueue(FrontierState {
                resume: k.clone(),
                value,
                score: branch,
            });
        }
        self.advance()
    }

    /// Resumes the next frontier state, or closes the marginal when the
    /// frontier is exhausted.
    fn advance(&mut self) -> Result<Control, SeineError> {
        match self.frontier.dequeue() {
            Some(state) => {
                self.score = state.score;
                Ok(Control::Resume((state.resume)(state.value)))
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> Result<Control, SeineError> {
        let marginal = mem::take(&mut self.marginal).build()?;
        Ok(Control::Done(marginal))
    }
}

impl Strategy for Enumerate {
    fn name(&self) -> &'static str {
        "enumerate"
    }

    fn start(
        &mut self,
        _ctx: &mut EngineCtx,
        program: &Computation,
    ) -> Result<Control, SeineError> {
        self.score = 0.0;
        Ok(Control::Resume(program(terminal())))
    }

    fn sample(
        &mut self,
        _ctx: &mut EngineCtx,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
    ) -> Result<Control, SeineError> {
        self.expand(k, dist, params, None)
    }

    fn sample_with_factor(
        &mut self,
        _ctx: &mut EngineCtx,
        k: Cont,
        dist: Erp,
        params: Vec<Value>,
        score_fn: ScoreFn,
    ) -> Result<Control, SeineError> {
        self.expand(k, dist, params, Some(&score_fn))
    }

    fn factor(
        &mut self,
        _ctx: &mut EngineCtx,
        k: Resume,
        score: f64,
    ) -> Result<Control, SeineError> {
        self.score += score;
        Ok(Control::Resume(k()))
    }

    fn exit(&mut self, _ctx: &mut EngineCtx, value: Value) -> Result<Control, SeineError> {
        self.marginal.insert(value, self.score.exp());
        self.completed += 1;
        if self.frontier.is_empty() || self.completed >= self.max_executions {
            self.finish()
        } else {
            self.advance()
        }
    }
}
