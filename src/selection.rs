//! Parent selection strategies.

use crate::chromosome::{Chromosome, Direction};
use crate::population::Population;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

/// Chooses the parents that take part in reproduction.
pub trait SelectionOperator {
    fn name(&self) -> String;

    /// Select `count` parents (with replacement) from the population.
    fn select(
        &self,
        population: &Population,
        direction: Direction,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome>;
}

/// Deterministic tournament: the best of `ring_size` uniformly drawn
/// individuals wins.
#[derive(Debug, Clone, Copy)]
pub struct DeterministicTournament {
    pub ring_size: usize,
}

impl DeterministicTournament {
    pub fn new(ring_size: usize) -> Self {
        DeterministicTournament {
            ring_size: ring_size.max(1),
        }
    }

    fn tournament(&self, population: &Population, direction: Direction, rng: &mut dyn RngCore) -> usize {
        let n = population.len();
        let mut best = rng.gen_range(0..n);
        for _ in 1..self.ring_size {
            let idx = rng.gen_range(0..n);
            if direction.is_better(population[idx].fitness(), population[best].fitness()) {
                best = idx;
            }
        }
        best
    }
}

impl Default for DeterministicTournament {
    fn default() -> Self {
        DeterministicTournament::new(8)
    }
}

impl SelectionOperator for DeterministicTournament {
    fn name(&self) -> String {
        format!("Deterministic tournament ({})", self.ring_size)
    }

    fn select(
        &self,
        population: &Population,
        direction: Direction,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome> {
        if population.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| population[self.tournament(population, direction, rng)].clone())
            .collect()
    }
}

/// Linear ranking selection.
///
/// With `n` individuals and pressure `s`, the individual of rank `i`
/// (0 = worst) is drawn with probability `(2 - s)/n + 2·i·(s - 1)/(n·(n - 1))`.
#[derive(Debug, Clone, Copy)]
pub struct RankingSelection {
    pub pressure: f64,
}

impl RankingSelection {
    /// Create a ranking selection; `pressure` is clamped into `[1, 2]`.
    pub fn new(pressure: f64) -> Self {
        RankingSelection {
            pressure: pressure.clamp(1.0, 2.0),
        }
    }

    fn weights(&self, n: usize) -> Vec<f64> {
        if n == 1 {
            return vec![1.0];
        }
        let s = self.pressure;
        let n_f = n as f64;
        (0..n)
            .map(|i| (2.0 - s) / n_f + 2.0 * i as f64 * (s - 1.0) / (n_f * (n_f - 1.0)))
            .collect()
    }
}

impl Default for RankingSelection {
    fn default() -> Self {
        RankingSelection::new(2.0)
    }
}

impl SelectionOperator for RankingSelection {
    fn name(&self) -> String {
        format!("Linear ranking ({})", self.pressure)
    }

    fn select(
        &self,
        population: &Population,
        direction: Direction,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome> {
        if population.is_empty() {
            return Vec::new();
        }

        // Worst first, so the weight grows with the rank.
        let mut ranked = population.ranked_indices(direction);
        ranked.reverse();
        let weights = self.weights(ranked.len());

        match WeightedIndex::new(&weights) {
            Ok(dist) => (0..count)
                .map(|_| population[ranked[dist.sample(rng)]].clone())
                .collect(),
            Err(_) => (0..count)
                .map(|_| population[rng.gen_range(0..population.len())].clone())
                .collect(),
        }
    }
}
