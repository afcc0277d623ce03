//! Utility functions and structures for reporting runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::problem::Problem;
use crate::set_covering::SetCoveringProblem;
use crate::RunOutcome;
use serde::{Deserialize, Serialize};

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = duration.subsec_millis();

    format!("{}h {:02}m {:02}.{:03}s", hours, minutes, seconds, millis)
}

/// Everything stored about a finished Set Covering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Experiment label from the configuration
    #[serde(default)]
    pub id: Option<String>,
    pub problem: String,
    pub acronym: String,
    pub instance: String,
    pub population_size: usize,
    pub generations: usize,
    pub crossover_id: usize,
    pub crossover_name: String,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub seed: u64,
    /// Best fitness of every completed generation
    pub convergence: Vec<f64>,
    pub duration_ms: u128,
    /// One-based ids of the selected columns, as numbered in the instance file
    pub selected_columns: Vec<usize>,
    pub total_cost: f64,
}

impl RunRecord {
    /// Collect the record of a run over a Set Covering instance.
    pub fn new(problem: &SetCoveringProblem, config: &Config, crossover_name: &str, outcome: &RunOutcome) -> Self {
        RunRecord {
            id: config.id.clone(),
            problem: problem.name().to_string(),
            acronym: problem.acronym().to_string(),
            instance: problem.instance.clone(),
            population_size: config.population_size,
            generations: config.generations,
            crossover_id: config.crossover_id,
            crossover_name: crossover_name.to_string(),
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            seed: config.seed,
            convergence: outcome.convergence_fitness(),
            duration_ms: outcome.duration.as_millis(),
            selected_columns: problem
                .selected_columns(&outcome.best)
                .into_iter()
                .map(|col| col + 1)
                .collect(),
            total_cost: problem.total_cost(&outcome.best),
        }
    }
}

/// Save a run record to a JSON file.
pub fn save_run_record<P: AsRef<Path>>(record: &RunRecord, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Load a run record previously written by `save_run_record`.
pub fn load_run_record<P: AsRef<Path>>(path: P) -> Result<RunRecord> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Format the run parameters as an aligned table.
pub fn format_parameters(config: &Config, crossover_name: &str) -> String {
    format!(
        "Population : {}
Generations: {}
Crossover  : {}
Cross. rate: {}%
Mut. rate  : {}%
Ring size  : {}
Elitism    : {}
Seed       : {}",
        config.population_size,
        config.generations,
        crossover_name,
        config.crossover_rate * 100.0,
        config.mutation_rate * 100.0,
        config.tournament_size,
        config.elitism,
        config.seed
    )
}
