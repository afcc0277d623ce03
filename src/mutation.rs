//! Mutation operators.

use crate::chromosome::Chromosome;
use rand::{Rng, RngCore};

/// Perturbs a single chromosome in place.
pub trait MutationOperator {
    fn name(&self) -> String;

    /// Mutate the chromosome, returning whether any gene changed.
    fn mutate(&self, chromosome: &mut Chromosome, rng: &mut dyn RngCore) -> bool;
}

/// Flips every gene independently with probability `rate`.
#[derive(Debug, Clone, Copy)]
pub struct BitFlipMutation {
    pub rate: f64,
}

impl BitFlipMutation {
    pub fn new(rate: f64) -> Self {
        BitFlipMutation {
            rate: rate.clamp(0.0, 1.0),
        }
    }
}

impl MutationOperator for BitFlipMutation {
    fn name(&self) -> String {
        format!("Bit flip ({})", self.rate)
    }

    fn mutate(&self, chromosome: &mut Chromosome, rng: &mut dyn RngCore) -> bool {
        let mut changed = false;
        for i in 0..chromosome.len() {
            if rng.gen_bool(self.rate) && chromosome.flip(i).is_ok() {
                changed = true;
            }
        }
        changed
    }
}
