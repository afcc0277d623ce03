//! Problem encoding abstraction consumed by the genetic algorithm.
//!
//! A problem supplies everything the engine needs to know about a bit-string
//! encoding: how to build an initial population, how to score a chromosome,
//! and how to bring an infeasible chromosome back inside the constraints.

use crate::chromosome::{Chromosome, Direction};
use crate::error::Result;
use crate::population::Population;
use rand::RngCore;

/// Capabilities an encoding must provide to be evolved by the engine.
pub trait Problem {
    /// Full problem name, e.g. "Set Covering Problem".
    fn name(&self) -> &str;

    /// Short problem name, e.g. "SCP".
    fn acronym(&self) -> &str;

    /// Number of decision variables, which is the length of every chromosome.
    fn chromosome_size(&self) -> usize;

    /// Whether higher fitness values are better.
    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    /// Build a population of `size` random chromosomes.
    ///
    /// `bias` controls the density of set genes; its exact meaning is
    /// encoding-specific.
    fn init_pop(&self, size: usize, bias: f64, rng: &mut dyn RngCore) -> Population;

    /// Compute the fitness of a chromosome.
    fn objective_function(&self, chromosome: &Chromosome) -> Result<f64>;

    /// Check whether a chromosome satisfies the problem constraints.
    fn is_feasible(&self, chromosome: &Chromosome) -> bool;

    /// Modify the chromosome in place so that it becomes feasible.
    ///
    /// Must leave an already feasible chromosome untouched.
    fn repair(&self, chromosome: &mut Chromosome) -> Result<()>;

    /// Whether genetic operators can produce infeasible chromosomes.
    fn can_be_infeasible(&self) -> bool {
        true
    }

    /// Evaluate every chromosome of the population, reusing cached fitness values.
    fn eval(&self, population: &mut Population) -> Result<()> {
        for chromosome in population.iter_mut() {
            chromosome.evaluate(self)?;
        }
        Ok(())
    }
}
