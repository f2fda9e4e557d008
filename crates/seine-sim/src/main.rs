use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use seine_infer::InferConfig;
use seine_sim::{execute, models, Method, OrderChoice, RunRequest};

#[derive(Parser, Debug)]
#[command(name = "seine-sim", about = "seine inference runtime CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one inference method over a demo model and print a JSON report.
    Run(RunArgs),
    /// List the available demo models.
    Models,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Demo model name (see `seine-sim models`).
    #[arg(long)]
    model: String,
    /// Inference method.
    #[arg(long, value_enum, default_value = "enumerate")]
    method: Method,
    /// YAML configuration supplying defaults for seed, bounds, and particles.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Master seed override.
    #[arg(long)]
    seed: Option<u64>,
    /// Enumeration frontier discipline override.
    #[arg(long, value_enum)]
    order: Option<OrderChoice>,
    /// Enumeration execution bound override.
    #[arg(long)]
    max_executions: Option<usize>,
    /// Particle count override.
    #[arg(long)]
    particles: Option<usize>,
    /// Write the JSON report to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(&args),
        Command::Models => {
            for name in models::MODELS {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config: InferConfig = match &args.config {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => InferConfig::default(),
    };
    let request = RunRequest {
        model: args.model.clone(),
        method: args.method,
        seed: args.seed.unwrap_or(config.seed_policy.master_seed),
        order: args
            .order
            .map(OrderChoice::to_order)
            .unwrap_or(config.enumerate.order),
        max_executions: args
            .max_executions
            .unwrap_or(config.enumerate.max_executions),
        particles: args.particles.unwrap_or(config.smc.particles),
    };
    let report = execute(&request)?;
    let json = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
