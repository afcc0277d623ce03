//! Crossover operators for bit-string chromosomes and the id-keyed fabric
//! that builds them.

use crate::chromosome::Chromosome;
use crate::error::{Error, Result};
use itertools::Itertools;
use rand::{seq::index, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Recombination operators producing two offspring from two parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverOperator {
    /// Each gene is exchanged between the offspring with probability 1/2.
    Uniform,
    /// The parents are cut at `k` distinct positions and alternate segments are exchanged.
    KPoint(usize),
}

impl CrossoverOperator {
    /// Display name of the operator.
    pub fn name(&self) -> String {
        match self {
            CrossoverOperator::Uniform => "Uniforme".to_string(),
            CrossoverOperator::KPoint(k) => format!("{}-Pontos", k),
        }
    }

    /// Apply the operator with probability `rate`.
    ///
    /// When the gate fails the offspring are copies of the parents, cached
    /// fitness included.
    pub fn apply(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rate: f64,
        rng: &mut dyn RngCore,
    ) -> Result<(Chromosome, Chromosome)> {
        if parent1.len() != parent2.len() {
            return Err(Error::Configuration(format!(
                "cannot cross chromosomes of lengths {} and {}",
                parent1.len(),
                parent2.len()
            )));
        }

        if !rng.gen_bool(rate.clamp(0.0, 1.0)) {
            return Ok((parent1.clone(), parent2.clone()));
        }

        Ok(self.cross(parent1, parent2, rng))
    }

    /// Recombine two parents of equal length unconditionally.
    pub fn cross(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut dyn RngCore,
    ) -> (Chromosome, Chromosome) {
        match self {
            CrossoverOperator::Uniform => uniform_crossover(parent1, parent2, rng),
            CrossoverOperator::KPoint(k) => k_point_crossover(parent1, parent2, *k, rng),
        }
    }
}

impl fmt::Display for CrossoverOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn uniform_crossover(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut dyn RngCore,
) -> (Chromosome, Chromosome) {
    let mut genes1 = parent1.genes().to_vec();
    let mut genes2 = parent2.genes().to_vec();

    for i in 0..genes1.len() {
        if rng.gen_bool(0.5) && genes1[i] != genes2[i] {
            std::mem::swap(&mut genes1[i], &mut genes2[i]);
        }
    }

    (Chromosome::new(genes1), Chromosome::new(genes2))
}

fn k_point_crossover(
    parent1: &Chromosome,
    parent2: &Chromosome,
    k: usize,
    rng: &mut dyn RngCore,
) -> (Chromosome, Chromosome) {
    let len = parent1.len();
    if len < 2 || k == 0 {
        return (parent1.clone(), parent2.clone());
    }

    // Cut point `c` means gene `c` starts a new segment.
    let k = k.min(len - 1);
    let cuts: Vec<usize> = index::sample(rng, len - 1, k)
        .into_iter()
        .map(|i| i + 1)
        .sorted()
        .collect();

    let mut genes1 = parent1.genes().to_vec();
    let mut genes2 = parent2.genes().to_vec();
    let mut exchanging = false;
    let mut next_cut = cuts.iter().peekable();

    for i in 0..len {
        if next_cut.peek() == Some(&&i) {
            exchanging = !exchanging;
            next_cut.next();
        }
        if exchanging {
            std::mem::swap(&mut genes1[i], &mut genes2[i]);
        }
    }

    (Chromosome::new(genes1), Chromosome::new(genes2))
}

/// Registry mapping operator ids to crossover operators.
///
/// Id `0` is uniform crossover and any id `k > 0` is k-point crossover with
/// `k` cut points. Explicit registrations take precedence over the k-point
/// rule; a fabric built with `empty` knows only what was registered.
#[derive(Debug, Clone)]
pub struct CrossoverFabric {
    registry: BTreeMap<usize, CrossoverOperator>,
    /// Build `KPoint(id)` for unregistered ids above zero
    k_point_ids: bool,
}

impl CrossoverFabric {
    /// Create a fabric with the standard registrations.
    pub fn new() -> Self {
        let mut fabric = CrossoverFabric::empty();
        fabric.register(0, CrossoverOperator::Uniform);
        fabric.k_point_ids = true;
        fabric
    }

    /// Create a fabric with no registrations.
    pub fn empty() -> Self {
        CrossoverFabric {
            registry: BTreeMap::new(),
            k_point_ids: false,
        }
    }

    /// Register an operator under `id`, returning the one it replaces.
    pub fn register(&mut self, id: usize, operator: CrossoverOperator) -> Option<CrossoverOperator> {
        self.registry.insert(id, operator)
    }

    /// Build the operator for `id`.
    pub fn create(&self, id: usize) -> Result<CrossoverOperator> {
        match self.registry.get(&id) {
            Some(operator) => Ok(*operator),
            None if self.k_point_ids && id > 0 => Ok(CrossoverOperator::KPoint(id)),
            None => Err(Error::UnknownOperator(id)),
        }
    }

    /// Display name of the operator registered under `id`.
    pub fn name(&self, id: usize) -> Result<String> {
        self.create(id).map(|op| op.name())
    }

    /// Explicitly registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.registry.keys().copied()
    }
}

impl Default for CrossoverFabric {
    fn default() -> Self {
        CrossoverFabric::new()
    }
}
