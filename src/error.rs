//! Error types shared by the engine, the problem encodings and the loaders.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required parameter is missing or out of range, or an instance file is malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown crossover operator id: {0}")]
    UnknownOperator(usize),

    /// Repair found a row that no column of the instance covers.
    #[error("Infeasible instance: row {row} is not covered by any column")]
    InfeasibleInstance { row: usize },

    #[error("Degenerate solution: feasible chromosome with zero total cost")]
    DegenerateSolution,

    #[error("Gene index {index} out of bounds for chromosome of length {len}")]
    Index { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
