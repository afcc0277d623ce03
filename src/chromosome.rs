//! Bit-string chromosome representation for the genetic algorithm.

use crate::error::{Error, Result};
use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Optimization direction declared by a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Compare two fitness values so that `Ordering::Greater` means `a` is better.
    ///
    /// Missing fitness values (unevaluated chromosomes) are always worse than
    /// evaluated ones.
    pub fn compare(&self, a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Direction::Maximize => ord,
                    Direction::Minimize => ord.reverse(),
                }
            }
        }
    }

    /// Check if fitness `a` is strictly better than fitness `b`.
    pub fn is_better(&self, a: Option<f64>, b: Option<f64>) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// A fixed-length vector of boolean genes with a cached fitness value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chromosome {
    /// The decision variables
    genes: Vec<bool>,
    /// Cached fitness, `None` until evaluated or after any gene change
    fitness: Option<f64>,
}

impl Chromosome {
    /// Create a chromosome from its genes. The fitness starts invalid.
    pub fn new(genes: Vec<bool>) -> Self {
        Chromosome {
            genes,
            fitness: None,
        }
    }

    /// Create a chromosome of the given length with every gene cleared.
    pub fn zeros(len: usize) -> Self {
        Chromosome::new(vec![false; len])
    }

    /// Create a chromosome from a slice of 0/1 values.
    pub fn from_bits(bits: &[u8]) -> Self {
        Chromosome::new(bits.iter().map(|&b| b != 0).collect())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Get the gene at `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.genes.get(index).copied().ok_or(Error::Index {
            index,
            len: self.genes.len(),
        })
    }

    /// Set the gene at `index`, invalidating the fitness if the value changes.
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        let len = self.genes.len();
        let gene = self.genes.get_mut(index).ok_or(Error::Index { index, len })?;
        if *gene != value {
            *gene = value;
            self.fitness = None;
        }
        Ok(())
    }

    /// Flip the gene at `index`.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        let value = self.get(index)?;
        self.set(index, !value)
    }

    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    /// Indices of the genes that are set, in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter(|&(_, &g)| g)
            .map(|(i, _)| i)
    }

    /// Number of genes that are set.
    pub fn count_ones(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }

    /// The cached fitness, if it is still valid.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drop the cached fitness so the next evaluation recomputes it.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Return the cached fitness, computing it with the problem's objective if invalid.
    pub fn evaluate<P: Problem + ?Sized>(&mut self, problem: &P) -> Result<f64> {
        match self.fitness {
            Some(fitness) => Ok(fitness),
            None => {
                let fitness = problem.objective_function(self)?;
                self.fitness = Some(fitness);
                Ok(fitness)
            }
        }
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &gene in &self.genes {
            write!(f, "{}", if gene { '1' } else { '0' })?;
        }
        match self.fitness {
            Some(fitness) => write!(f, " ({})", fitness),
            None => write!(f, " (invalid)"),
        }
    }
}

impl PartialEq for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for Chromosome {}
