//! Demo models and run orchestration for the seine CLI.

pub mod models;
pub mod report;

use std::error::Error;

use clap::ValueEnum;

use seine_infer::{Engine, EnumerateConfig, SearchOrder};

use crate::report::{RunProvenance, RunReport};

/// Inference method selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// One forward (prior) execution.
    Forward,
    /// Exhaustive enumeration of the choice tree.
    Enumerate,
    /// Sequential-importance-resampling particle filter.
    Smc,
}

impl Method {
    fn label(self) -> &'static str {
        match self {
            Method::Forward => "forward",
            Method::Enumerate => "enumerate",
            Method::Smc => "smc",
        }
    }
}

/// Frontier discipline selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderChoice {
    /// Highest cumulative log-score first.
    LikelyFirst,
    /// Most recently enqueued first.
    DepthFirst,
    /// Earliest enqueued first.
    BreadthFirst,
}

impl OrderChoice {
    /// The engine-side discipline this choice selects.
    pub fn to_order(self) -> SearchOrder {
        match self {
            OrderChoice::LikelyFirst => SearchOrder::LikelyFirst,
            OrderChoice::DepthFirst => SearchOrder::DepthFirst,
            OrderChoice::BreadthFirst => SearchOrder::BreadthFirst,
        }
    }
}

fn order_label(order: SearchOrder) -> &'static str {
    match order {
        SearchOrder::LikelyFirst => "likely-first",
        SearchOrder::DepthFirst => "depth-first",
        SearchOrder::BreadthFirst => "breadth-first",
    }
}

/// Fully resolved inputs of one CLI run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Demo model name.
    pub model: String,
    /// Inference method.
    pub method: Method,
    /// Master seed.
    pub seed: u64,
    /// Enumeration frontier discipline.
    pub order: SearchOrder,
    /// Enumeration execution bound.
    pub max_executions: usize,
    /// Particle count.
    pub particles: usize,
}

/// Runs the requested inference and assembles the report.
pub fn execute(request: &RunRequest) -> Result<RunReport, Box<dyn Error>> {
    let program = models::lookup(&request.model)
        .ok_or_else(|| format!("unknown model: {}", request.model))?;
    let mut engine = Engine::new(request.seed);
    let (marginal, order, max_executions, particles) = match request.method {
        Method::Forward => (engine.forward(&program)?, None, None, None),
        Method::Enumerate => {
            let config = EnumerateConfig {
                max_executions: request.max_executions,
                order: request.order,
            };
            (
                engine.enumerate(&program, &config)?,
                Some(order_label(request.order).to_string()),
                Some(request.max_executions),
                None,
            )
        }
        Method::Smc => (
            engine.particle_filter(&program, request.particles)?,
            None,
            None,
            Some(request.particles),
        ),
    };
    let entries = report::marginal_entries(&marginal, request.seed)?;
    Ok(RunReport {
        provenance: RunProvenance {
            model: request.model.clone(),
            method: request.method.label().to_string(),
            seed: request.seed,
            order,
            max_executions,
            particles,
        },
        marginal: entries,
    })
}
