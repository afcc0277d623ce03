//! Population management for the genetic algorithm.

use crate::chromosome::{Chromosome, Direction};
use std::ops::{Index, IndexMut};

/// An ordered collection of chromosomes evolved together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
}

impl Population {
    /// Create a population from the given chromosomes.
    pub fn new(chromosomes: Vec<Chromosome>) -> Self {
        Population { chromosomes }
    }

    /// Create an empty population with room for `capacity` chromosomes.
    pub fn with_capacity(capacity: usize) -> Self {
        Population {
            chromosomes: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, chromosome: Chromosome) {
        self.chromosomes.push(chromosome);
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome> {
        self.chromosomes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Chromosome> {
        self.chromosomes.iter_mut()
    }

    pub fn as_slice(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn into_vec(self) -> Vec<Chromosome> {
        self.chromosomes
    }

    /// Index of the best chromosome. Ties go to the first occurrence.
    pub fn best_index(&self, direction: Direction) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, chromosome) in self.chromosomes.iter().enumerate() {
            match best {
                Some(b) if !direction.is_better(chromosome.fitness(), self.chromosomes[b].fitness()) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// The best chromosome of the population under the given direction.
    pub fn best_element(&self, direction: Direction) -> Option<&Chromosome> {
        self.best_index(direction).map(|i| &self.chromosomes[i])
    }

    /// Indices of the population ordered from best to worst.
    ///
    /// The sort is stable, so equally fit chromosomes keep their population order.
    pub fn ranked_indices(&self, direction: Direction) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.chromosomes.len()).collect();
        indices.sort_by(|&a, &b| {
            direction.compare(self.chromosomes[b].fitness(), self.chromosomes[a].fitness())
        });
        indices
    }

    /// Clones of the `n` best chromosomes, best first.
    pub fn best_n(&self, n: usize, direction: Direction) -> Vec<Chromosome> {
        self.ranked_indices(direction)
            .into_iter()
            .take(n)
            .map(|i| self.chromosomes[i].clone())
            .collect()
    }

    /// Indices of the `n` worst chromosomes, worst first.
    pub fn worst_indices(&self, n: usize, direction: Direction) -> Vec<usize> {
        let mut ranked = self.ranked_indices(direction);
        ranked.reverse();
        ranked.truncate(n);
        ranked
    }

    /// Average fitness over evaluated chromosomes.
    pub fn average_fitness(&self) -> Option<f64> {
        let values: Vec<f64> = self.chromosomes.iter().filter_map(|c| c.fitness()).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

impl Index<usize> for Population {
    type Output = Chromosome;

    fn index(&self, index: usize) -> &Chromosome {
        &self.chromosomes[index]
    }
}

impl IndexMut<usize> for Population {
    fn index_mut(&mut self, index: usize) -> &mut Chromosome {
        &mut self.chromosomes[index]
    }
}

impl From<Vec<Chromosome>> for Population {
    fn from(chromosomes: Vec<Chromosome>) -> Self {
        Population::new(chromosomes)
    }
}

impl FromIterator<Chromosome> for Population {
    fn from_iter<I: IntoIterator<Item = Chromosome>>(iter: I) -> Self {
        Population::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Population {
    type Item = Chromosome;
    type IntoIter = std::vec::IntoIter<Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Chromosome;
    type IntoIter = std::slice::Iter<'a, Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}
