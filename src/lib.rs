//! # crossover_ga
//!
//! A generational genetic algorithm over fixed-length bit strings, used to
//! compare crossover operators on constrained combinatorial problems.
//!
//! The engine is problem-agnostic: a [`problem::Problem`] supplies the initial
//! population, the objective function and a repair procedure, and the
//! [`set_covering::SetCoveringProblem`] encoding instantiates it for the Set
//! Covering Problem.
//!
//! Every generation selects parents, recombines them with the configured
//! crossover operator, mutates and repairs the offspring, evaluates them and
//! carries the elite of the previous generation over.

pub mod chromosome;
pub mod config;
pub mod crossover;
pub mod error;
pub mod mutation;
pub mod observer;
pub mod population;
pub mod problem;
pub mod selection;
pub mod set_covering;
pub mod termination;
pub mod utils;

use crate::chromosome::Chromosome;
use crate::config::Config;
use crate::crossover::{CrossoverFabric, CrossoverOperator};
use crate::error::{Error, Result};
use crate::mutation::{BitFlipMutation, MutationOperator};
use crate::observer::GenerationObserver;
use crate::population::Population;
use crate::problem::Problem;
use crate::selection::{DeterministicTournament, SelectionOperator};
use crate::termination::{AnyContinuator, Continuator, GenerationContinuator, TimeContinuator};

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The population after the last generation
    pub population: Population,
    /// The best chromosome of the final population
    pub best: Chromosome,
    /// Best chromosome of every completed generation
    pub convergence: Vec<Chromosome>,
    /// Wall-clock duration of the evolution
    pub duration: Duration,
}

impl RunOutcome {
    /// Best fitness of every completed generation.
    pub fn convergence_fitness(&self) -> Vec<f64> {
        self.convergence
            .iter()
            .map(|c| c.fitness().unwrap_or(0.0))
            .collect()
    }
}

/// The generational genetic algorithm.
pub struct GeneticAlgorithm<P: Problem> {
    pub problem: P,
    pub config: Config,
    pub crossover: CrossoverOperator,
    pub selection: Box<dyn SelectionOperator>,
    pub mutation: Box<dyn MutationOperator>,
    /// Probability of handing an offspring to the mutation operator
    pub mutation_probability: f64,
    pub continuator: Box<dyn Continuator>,
    /// Best chromosome of every completed generation
    pub convergence: Vec<Chromosome>,
    /// Number of completed generations
    pub generation: usize,
    pub run_time: Duration,
    rng: ChaCha8Rng,
}

impl<P: Problem> GeneticAlgorithm<P> {
    /// Create a new engine for the given problem and configuration.
    ///
    /// Uses deterministic tournament selection, bit-flip mutation at the
    /// configured rate and a generation budget (plus the optional time
    /// limit) as termination predicate. Fails on an invalid configuration or
    /// an unknown crossover id before anything runs.
    pub fn new(problem: P, config: Config) -> Result<Self> {
        config.validate()?;

        let crossover = CrossoverFabric::new().create(config.crossover_id)?;
        if let CrossoverOperator::KPoint(k) = crossover {
            if k >= problem.chromosome_size() {
                return Err(Error::Configuration(format!(
                    "{} crossover needs chromosomes longer than {} genes",
                    crossover,
                    problem.chromosome_size()
                )));
            }
        }

        let mut continuator =
            AnyContinuator::new().with(Box::new(GenerationContinuator::new(config.generations)));
        if let Some(limit) = config.time_limit {
            continuator = continuator.with(Box::new(TimeContinuator::new(limit)));
        }

        Ok(GeneticAlgorithm {
            problem,
            crossover,
            selection: Box::new(DeterministicTournament::new(config.tournament_size)),
            mutation: Box::new(BitFlipMutation::new(config.mutation_rate)),
            mutation_probability: 1.0,
            continuator: Box::new(continuator),
            convergence: Vec::new(),
            generation: 0,
            run_time: Duration::from_secs(0),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    /// Replace the selection operator.
    pub fn with_selection(mut self, selection: Box<dyn SelectionOperator>) -> Self {
        self.selection = selection;
        self
    }

    /// Replace the mutation operator and the probability of applying it to an offspring.
    pub fn with_mutation(mut self, mutation: Box<dyn MutationOperator>, probability: f64) -> Self {
        self.mutation = mutation;
        self.mutation_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Replace the termination predicate.
    pub fn with_continuator(mut self, continuator: Box<dyn Continuator>) -> Self {
        self.continuator = continuator;
        self
    }

    /// Access the engine's random number generator.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Build and evaluate the initial population.
    pub fn initialize(&mut self) -> Result<Population> {
        let mut population =
            self.problem
                .init_pop(self.config.population_size, self.config.bias, &mut self.rng);
        self.problem.eval(&mut population)?;

        self.convergence.clear();
        self.generation = 0;
        Ok(population)
    }

    /// Evolve the population until the continuator stops the run.
    pub fn evolve(
        &mut self,
        population: &mut Population,
        observer: &mut dyn GenerationObserver,
    ) -> Result<()> {
        if population.is_empty() {
            return Err(Error::Configuration("cannot evolve an empty population".to_string()));
        }

        let direction = self.problem.direction();

        while self.continuator.should_continue(self.generation, population) {
            self.step(population)?;
            self.generation += 1;

            if let Some(best) = population.best_element(direction) {
                debug!("Generation {}: best fitness {:?}", self.generation, best.fitness());
                self.convergence.push(best.clone());
            }
            observer.on_generation(self.generation, population);
        }

        Ok(())
    }

    /// Run one generation: selection, crossover, mutation, repair,
    /// evaluation and elitist replacement.
    pub fn step(&mut self, population: &mut Population) -> Result<()> {
        let direction = self.problem.direction();
        let size = population.len();

        let parents = self
            .selection
            .select(population, direction, size, &mut self.rng);

        let mut offspring = Population::with_capacity(size);
        for pair in parents.chunks(2) {
            match pair {
                [parent1, parent2] => {
                    let (child1, child2) = self.crossover.apply(
                        parent1,
                        parent2,
                        self.config.crossover_rate,
                        &mut self.rng,
                    )?;
                    offspring.push(child1);
                    offspring.push(child2);
                }
                [parent] => offspring.push(parent.clone()),
                _ => {}
            }
        }

        for child in offspring.iter_mut() {
            if self.rng.gen_bool(self.mutation_probability) {
                self.mutation.mutate(child, &mut self.rng);
            }
        }

        if self.problem.can_be_infeasible() {
            for child in offspring.iter_mut() {
                self.problem.repair(child)?;
            }
        }

        self.problem.eval(&mut offspring)?;

        let elite = population.best_n(self.config.elitism.min(size), direction);
        let worst = offspring.worst_indices(elite.len(), direction);
        for (index, chromosome) in worst.into_iter().zip(elite) {
            offspring[index] = chromosome;
        }

        *population = offspring;
        Ok(())
    }

    /// Run the whole algorithm: initialize, evolve and collect the outcome.
    pub fn run(&mut self, observer: &mut dyn GenerationObserver) -> Result<RunOutcome> {
        info!(
            "Starting evolution: {} individuals, crossover {} at {}, mutation rate {}",
            self.config.population_size,
            self.crossover,
            self.config.crossover_rate,
            self.config.mutation_rate
        );

        let mut population = self.initialize()?;

        let start_time = Instant::now();
        self.evolve(&mut population, observer)?;
        self.run_time = start_time.elapsed();

        let best = population
            .best_element(self.problem.direction())
            .cloned()
            .ok_or_else(|| Error::Configuration("empty final population".to_string()))?;

        info!(
            "Evolution finished after {} generations in {:?}",
            self.generation, self.run_time
        );

        Ok(RunOutcome {
            population,
            best,
            convergence: self.convergence.clone(),
            duration: self.run_time,
        })
    }
}
