//! Configuration parameters for the genetic algorithm.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Keys that must be present in an experiment file.
const REQUIRED_KEYS: [&str; 5] = [
    "population_size",
    "generations",
    "crossover_id",
    "crossover_rate",
    "mutation_rate",
];

/// Configuration settings for a genetic algorithm run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label identifying the experiment in stored runs
    pub id: Option<String>,
    /// Number of chromosomes in the population
    pub population_size: usize,
    /// Number of generations to evolve
    pub generations: usize,
    /// Id of the crossover operator in the crossover fabric
    pub crossover_id: usize,
    /// Probability of applying crossover to a pair of parents
    pub crossover_rate: f64,
    /// Probability of flipping each gene of an offspring
    pub mutation_rate: f64,
    /// Number of best individuals carried over to the next generation
    pub elitism: usize,
    /// Ring size of the deterministic tournament selection
    pub tournament_size: usize,
    /// Lower bound of the per-individual allele probability at initialization
    pub bias: f64,
    /// Seed of the random number generator
    pub seed: u64,
    /// Optional time limit for the evolution
    pub time_limit: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            id: None,
            population_size: 100,
            generations: 50,
            crossover_id: 0,
            crossover_rate: 0.8,
            mutation_rate: 0.05,
            elitism: 1,
            tournament_size: 8,
            bias: 0.25,
            seed: 42,
            time_limit: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load an experiment file in JSON format.
    ///
    /// Population size, generation count, crossover id and both rates must be
    /// given explicitly; everything else falls back to the defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("could not read {}: {}", path.display(), e))
        })?;

        let value: serde_json::Value = serde_json::from_str(&text)?;
        let map = value.as_object().ok_or_else(|| {
            Error::Configuration(format!("{}: config file should be a map", path.display()))
        })?;

        for key in REQUIRED_KEYS {
            match map.get(key) {
                None => {
                    return Err(Error::Configuration(format!(
                        "{}: parameter \"{}\" is not defined",
                        path.display(),
                        key
                    )))
                }
                Some(v) if !(v.is_number() || v.is_string() || v.is_boolean()) => {
                    return Err(Error::Configuration(format!(
                        "{}: \"{}\" must be a scalar",
                        path.display(),
                        key
                    )))
                }
                Some(_) => {}
            }
        }

        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is inside its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::Configuration(
                "population size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::Configuration(format!(
                "crossover rate {} outside [0, 1]",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::Configuration(format!(
                "mutation rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        if self.elitism > self.population_size {
            return Err(Error::Configuration(format!(
                "elitism {} larger than the population size {}",
                self.elitism, self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(Error::Configuration(
                "tournament ring size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the experiment label.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Set the crossover operator id.
    pub fn with_crossover_id(mut self, id: usize) -> Self {
        self.crossover_id = id;
        self
    }

    /// Set the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Set the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Set the number of elite individuals.
    pub fn with_elitism(mut self, n: usize) -> Self {
        self.elitism = n;
        self
    }

    /// Set the tournament ring size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Set the initialization bias.
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }
}
