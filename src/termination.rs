//! Termination predicates (continuators) for the generational loop.

use crate::population::Population;
use std::time::{Duration, Instant};

/// Decides whether another generation should run.
pub trait Continuator {
    /// Called before each generation with the number of completed generations.
    fn should_continue(&mut self, generation: usize, population: &Population) -> bool;
}

/// Runs a fixed number of generations.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContinuator {
    pub max_generations: usize,
}

impl GenerationContinuator {
    pub fn new(max_generations: usize) -> Self {
        GenerationContinuator { max_generations }
    }
}

impl Continuator for GenerationContinuator {
    fn should_continue(&mut self, generation: usize, _population: &Population) -> bool {
        generation < self.max_generations
    }
}

/// Runs until a wall-clock limit has elapsed since the first check.
#[derive(Debug, Clone, Copy)]
pub struct TimeContinuator {
    pub limit: Duration,
    start: Option<Instant>,
}

impl TimeContinuator {
    pub fn new(limit: Duration) -> Self {
        TimeContinuator { limit, start: None }
    }
}

impl Continuator for TimeContinuator {
    fn should_continue(&mut self, _generation: usize, _population: &Population) -> bool {
        let start = *self.start.get_or_insert_with(Instant::now);
        start.elapsed() < self.limit
    }
}

/// Stops as soon as any of its continuators says stop.
#[derive(Default)]
pub struct AnyContinuator {
    continuators: Vec<Box<dyn Continuator>>,
}

impl AnyContinuator {
    pub fn new() -> Self {
        AnyContinuator::default()
    }

    pub fn with(mut self, continuator: Box<dyn Continuator>) -> Self {
        self.continuators.push(continuator);
        self
    }
}

impl Continuator for AnyContinuator {
    fn should_continue(&mut self, generation: usize, population: &Population) -> bool {
        // Every continuator is consulted so that timers start on the first call.
        let mut keep_going = true;
        for continuator in self.continuators.iter_mut() {
            keep_going &= continuator.should_continue(generation, population);
        }
        keep_going
    }
}
