//! Generation observers notified after every completed generation.

use crate::chromosome::Direction;
use crate::population::Population;
use log::info;

/// Receives the population at the end of each generation.
///
/// Observers cannot change the engine state.
pub trait GenerationObserver {
    fn on_generation(&mut self, generation: usize, population: &Population);
}

impl<F> GenerationObserver for F
where
    F: FnMut(usize, &Population),
{
    fn on_generation(&mut self, generation: usize, population: &Population) {
        self(generation, population)
    }
}

/// Does nothing.
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {
    fn on_generation(&mut self, _generation: usize, _population: &Population) {}
}

/// Logs the best fitness of every generation at `info` level.
pub struct LogObserver {
    pub direction: Direction,
    /// Report `1 / fitness` instead of the raw fitness
    pub as_cost: bool,
}

impl LogObserver {
    pub fn new(direction: Direction) -> Self {
        LogObserver {
            direction,
            as_cost: false,
        }
    }

    /// Report the best cost, for problems whose fitness is an inverse cost.
    pub fn inverse_cost(direction: Direction) -> Self {
        LogObserver {
            direction,
            as_cost: true,
        }
    }
}

impl GenerationObserver for LogObserver {
    fn on_generation(&mut self, generation: usize, population: &Population) {
        let best = match population.best_element(self.direction).and_then(|c| c.fitness()) {
            Some(fitness) => fitness,
            None => return,
        };

        if self.as_cost && best > 0.0 {
            info!("Generation {}: best cost {:.2}", generation, 1.0 / best);
        } else {
            info!("Generation {}: best fitness {}", generation, best);
        }
    }
}
