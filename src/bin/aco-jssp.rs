use std::fs;
use std::path::PathBuf;

use aco_jssp::aco::{AcoConfig, AcoSolution, ColonyOptimizer};
use aco_jssp::instance::ProblemFile;
use aco_jssp::models::ProblemModel;
use aco_jssp::scheduler::ScheduleKpi;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Solve a job-shop problem with an ant colony.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the JSON problem file
    problem: PathBuf,
    /// Ants per round
    #[arg(short, long)]
    ants: Option<usize>,
    /// Number of rounds
    #[arg(short, long)]
    rounds: Option<usize>,
    /// Pheromone weight
    #[arg(long)]
    alpha: Option<f64>,
    /// Heuristic weight
    #[arg(long)]
    beta: Option<f64>,
    /// Evaporation rate in [0, 1)
    #[arg(short, long)]
    evaporation: Option<f64>,
    /// Initial pheromone on every operation
    #[arg(long)]
    initial_pheromone: Option<f64>,
    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,
    /// Build ants on one thread
    #[arg(long)]
    sequential: bool,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn apply(&self, mut config: AcoConfig) -> AcoConfig {
        if let Some(ants) = self.ants {
            config = config.with_num_ants(ants);
        }
        if let Some(rounds) = self.rounds {
            config = config.with_num_rounds(rounds);
        }
        if let Some(alpha) = self.alpha {
            config = config.with_alpha(alpha);
        }
        if let Some(beta) = self.beta {
            config = config.with_beta(beta);
        }
        if let Some(rate) = self.evaporation {
            config = config.with_evaporation_rate(rate);
        }
        if let Some(value) = self.initial_pheromone {
            config = config.with_initial_pheromone(value);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.sequential {
            config = config.with_parallel(false);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let text = fs::read_to_string(&cli.problem)
        .with_context(|| format!("reading {}", cli.problem.display()))?;
    let file = ProblemFile::from_json(&text)
        .with_context(|| format!("parsing {}", cli.problem.display()))?;
    let problem = file.problem().context("building problem")?;
    let config = cli.apply(file.config());
    info!(path = %cli.problem.display(), "problem loaded");

    let mut colony = ColonyOptimizer::new(problem.clone(), config)?;
    if let Some(order) = file.activity_order(&problem) {
        colony = colony.with_order_policy(order);
    }
    let solution = colony.run().context("colony run failed")?;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&solution)?),
        Format::Text => print_text(&problem, &solution),
    }
    Ok(())
}

fn print_text(problem: &ProblemModel, solution: &AcoSolution) {
    let kpi = ScheduleKpi::calculate(&solution.schedule, problem);
    println!("best makespan {}", solution.makespan);
    println!(
        "lower bound {} (gap {:.1}%)",
        kpi.lower_bound,
        kpi.gap_to_lower_bound * 100.0
    );
    println!("rounds {}", solution.rounds);
    println!();

    for resource in problem.resources() {
        let busy = solution.schedule.assignments_for_resource(&resource.id);
        if busy.is_empty() {
            continue;
        }
        println!("{}", resource.display_name());
        for a in busy {
            let job = problem
                .job(a.job)
                .map(|j| if j.name.is_empty() { j.id.as_str() } else { j.name.as_str() })
                .unwrap_or_default();
            let label = a.label.as_deref().unwrap_or("");
            println!("  {:>6} {:>6}  {job} #{} {label}", a.start, a.end, a.task);
        }
    }
}
