//! Command-line driver: evolve a Set Covering instance and optionally store the run.

use clap::Parser;
use crossover_ga::config::Config;
use crossover_ga::crossover::CrossoverFabric;
use crossover_ga::observer::LogObserver;
use crossover_ga::problem::Problem;
use crossover_ga::set_covering::SetCoveringProblem;
use crossover_ga::utils::{format_duration, format_parameters, save_run_record, RunRecord};
use crossover_ga::GeneticAlgorithm;
use itertools::Itertools;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "crossover-ga", about = "Genetic algorithm for the Set Covering Problem")]
struct Cli {
    /// Problem instance file (OR-Library format)
    #[arg(short = 'f', long = "infile")]
    infile: PathBuf,

    /// JSON file to store the run in; nothing is stored when omitted
    #[arg(short = 'd', long = "db")]
    db: Option<PathBuf>,

    /// JSON experiment file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Experiment label stored with the run
    #[arg(long)]
    id: Option<String>,

    /// Population size [default: 100]
    #[arg(short = 'p', long = "popsize")]
    pop_size: Option<usize>,

    /// Number of generations [default: 50]
    #[arg(short = 'g', long = "epochs")]
    epochs: Option<usize>,

    /// Crossover operator id: 0 uniform, k > 0 k-point [default: 0]
    #[arg(short = 'x', long = "crossover")]
    crossover_id: Option<usize>,

    /// Crossover rate [default: 0.8]
    #[arg(short = 'c', long = "xrate")]
    crossover_rate: Option<f64>,

    /// Per-gene mutation rate [default: 0.05]
    #[arg(short = 'm', long = "mrate")]
    mutation_rate: Option<f64>,

    /// Ring size of the deterministic tournament [default: 8]
    #[arg(short = 'r', long = "ring")]
    ring: Option<usize>,

    /// Number of elite individuals kept every generation [default: 1]
    #[arg(long)]
    elitism: Option<usize>,

    /// Lower bound of the allele probability of the initial population [default: 0.25]
    #[arg(long)]
    bias: Option<f64>,

    /// Random seed [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Time limit in seconds
    #[arg(long = "time-limit")]
    time_limit: Option<u64>,
}

impl Cli {
    fn to_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::new(),
        };

        if let Some(v) = &self.id {
            config = config.with_id(v.clone());
        }
        if let Some(v) = self.pop_size {
            config = config.with_population_size(v);
        }
        if let Some(v) = self.epochs {
            config = config.with_generations(v);
        }
        if let Some(v) = self.crossover_id {
            config = config.with_crossover_id(v);
        }
        if let Some(v) = self.crossover_rate {
            config = config.with_crossover_rate(v);
        }
        if let Some(v) = self.mutation_rate {
            config = config.with_mutation_rate(v);
        }
        if let Some(v) = self.ring {
            config = config.with_tournament_size(v);
        }
        if let Some(v) = self.elitism {
            config = config.with_elitism(v);
        }
        if let Some(v) = self.bias {
            config = config.with_bias(v);
        }
        if let Some(v) = self.seed {
            config = config.with_seed(v);
        }
        if let Some(v) = self.time_limit {
            config = config.with_time_limit(Duration::from_secs(v));
        }

        config.validate()?;
        Ok(config)
    }
}

fn separator() -> String {
    "-".repeat(60)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.to_config()?;
    let crossover_name = CrossoverFabric::new().name(config.crossover_id)?;

    let problem = SetCoveringProblem::from_file(&cli.infile)?;
    println!("{}", separator());
    println!("{}", problem);
    println!("{}", separator());
    println!("{}", format_parameters(&config, &crossover_name));
    println!("{}", separator());

    let mut algorithm = GeneticAlgorithm::new(problem, config.clone())?;
    let mut observer = LogObserver::inverse_cost(algorithm.problem.direction());
    let outcome = algorithm.run(&mut observer)?;

    println!("{}", separator());
    println!("Evolution time: {}", format_duration(outcome.duration));

    let record = RunRecord::new(&algorithm.problem, &config, &crossover_name, &outcome);
    println!("Best solution cost: {}", record.total_cost);
    println!("Feasible: {}", algorithm.problem.is_feasible(&outcome.best));
    println!("Selected columns: {}", record.selected_columns.iter().join(" "));

    if let Some(path) = &cli.db {
        save_run_record(&record, path)?;
        info!("Run stored in {}", path.display());
    }

    Ok(())
}
