//! Set Covering Problem encoding and instance loading.
//!
//! Gene `j` of a chromosome selects column (subset) `j`. A chromosome is
//! feasible when the selected columns cover every row of the universe, and
//! its fitness is the inverse of the total weight of the selected columns.

use crate::chromosome::Chromosome;
use crate::error::{Error, Result};
use crate::population::Population;
use crate::problem::Problem;
use log::{debug, warn};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Upper bound of the per-individual allele probability used by `init_pop`.
pub const MAX_BIAS: f64 = 0.5;

/// Row × column incidence matrix together with the column weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageMatrix {
    num_rows: usize,
    num_columns: usize,
    /// Row-major incidence cells
    cells: Vec<bool>,
    weights: Vec<f64>,
}

impl CoverageMatrix {
    /// Build a matrix from the list of rows each column covers.
    pub fn from_columns(num_rows: usize, columns: &[Vec<usize>], weights: Vec<f64>) -> Result<Self> {
        let num_columns = columns.len();
        let mut matrix = Self::empty(num_rows, num_columns, weights)?;

        for (col, rows) in columns.iter().enumerate() {
            for &row in rows {
                matrix.mark(row, col)?;
            }
        }

        Ok(matrix)
    }

    /// Build a matrix from the list of columns covering each row.
    pub fn from_rows(num_columns: usize, rows: &[Vec<usize>], weights: Vec<f64>) -> Result<Self> {
        let num_rows = rows.len();
        let mut matrix = Self::empty(num_rows, num_columns, weights)?;

        for (row, columns) in rows.iter().enumerate() {
            for &col in columns {
                matrix.mark(row, col)?;
            }
        }

        Ok(matrix)
    }

    fn empty(num_rows: usize, num_columns: usize, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != num_columns {
            return Err(Error::Configuration(format!(
                "expected {} column weights, got {}",
                num_columns,
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::Configuration(format!("invalid column weight {}", w)));
        }

        Ok(CoverageMatrix {
            num_rows,
            num_columns,
            cells: vec![false; num_rows * num_columns],
            weights,
        })
    }

    fn mark(&mut self, row: usize, col: usize) -> Result<()> {
        if row >= self.num_rows || col >= self.num_columns {
            return Err(Error::Configuration(format!(
                "cell ({}, {}) outside a {}x{} coverage matrix",
                row, col, self.num_rows, self.num_columns
            )));
        }
        self.cells[row * self.num_columns + col] = true;
        Ok(())
    }

    /// Check whether `col` covers `row`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.num_rows && col < self.num_columns && self.cells[row * self.num_columns + col]
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Parse an instance in the OR-Library format.
    ///
    /// The format is: the number of rows `m` and columns `n`, the `n` column
    /// costs, then for every row the number of columns covering it followed
    /// by their one-based indices.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let num_rows = tokens.next_usize("number of rows")?;
        let num_columns = tokens.next_usize("number of columns")?;

        let mut weights = Vec::with_capacity(num_columns);
        for _ in 0..num_columns {
            weights.push(tokens.next_f64("column cost")?);
        }

        let mut rows = Vec::with_capacity(num_rows);
        for row in 0..num_rows {
            let count = tokens.next_usize("row cover count")?;
            let mut columns = Vec::with_capacity(count);
            for _ in 0..count {
                let col = tokens.next_usize("column index")?;
                if col == 0 || col > num_columns {
                    return Err(Error::Configuration(format!(
                        "row {} references column {} outside 1..={}",
                        row + 1,
                        col,
                        num_columns
                    )));
                }
                columns.push(col - 1);
            }
            rows.push(columns);
        }

        CoverageMatrix::from_rows(num_columns, &rows, weights)
    }
}

/// Whitespace tokenizer over an instance file.
struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            inner: text.split_whitespace(),
        }
    }

    fn next_token(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| Error::Configuration(format!("unexpected end of instance, expected {}", what)))
    }

    fn next_usize(&mut self, what: &str) -> Result<usize> {
        let token = self.next_token(what)?;
        token
            .parse::<usize>()
            .map_err(|_| Error::Configuration(format!("invalid {}: {:?}", what, token)))
    }

    fn next_f64(&mut self, what: &str) -> Result<f64> {
        let token = self.next_token(what)?;
        token
            .parse::<f64>()
            .map_err(|_| Error::Configuration(format!("invalid {}: {:?}", what, token)))
    }
}

/// The Set Covering Problem over a fixed coverage matrix.
#[derive(Debug, Clone)]
pub struct SetCoveringProblem {
    /// Name of the instance, usually the file it was loaded from
    pub instance: String,
    matrix: CoverageMatrix,
    universe: BTreeSet<usize>,
    columns_that_cover: Vec<BTreeSet<usize>>,
    rows_covered_by: Vec<BTreeSet<usize>>,
}

impl SetCoveringProblem {
    /// Create a problem and precompute its coverage indices.
    pub fn new(instance: String, matrix: CoverageMatrix) -> Self {
        let num_rows = matrix.num_rows();
        let num_columns = matrix.num_columns();

        let universe: BTreeSet<usize> = (0..num_rows).collect();
        let mut columns_that_cover = vec![BTreeSet::new(); num_rows];
        let mut rows_covered_by = vec![BTreeSet::new(); num_columns];

        for row in 0..num_rows {
            for col in 0..num_columns {
                if matrix.get(row, col) {
                    columns_that_cover[row].insert(col);
                    rows_covered_by[col].insert(row);
                }
            }
        }

        for (row, columns) in columns_that_cover.iter().enumerate() {
            if columns.is_empty() {
                warn!("{}: row {} is not covered by any column", instance, row);
            }
        }

        SetCoveringProblem {
            instance,
            matrix,
            universe,
            columns_that_cover,
            rows_covered_by,
        }
    }

    /// Load an OR-Library instance file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("could not open instance {}: {}", path.display(), e))
        })?;
        let matrix = CoverageMatrix::parse(&text)?;
        let instance = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(
            "Loaded {} with {} rows and {} columns",
            instance,
            matrix.num_rows(),
            matrix.num_columns()
        );

        Ok(SetCoveringProblem::new(instance, matrix))
    }

    pub fn matrix(&self) -> &CoverageMatrix {
        &self.matrix
    }

    pub fn num_elements(&self) -> usize {
        self.matrix.num_rows()
    }

    pub fn num_subsets(&self) -> usize {
        self.matrix.num_columns()
    }

    pub fn universe(&self) -> &BTreeSet<usize> {
        &self.universe
    }

    /// Columns covering `row`, in ascending order.
    pub fn columns_that_cover(&self, row: usize) -> &BTreeSet<usize> {
        &self.columns_that_cover[row]
    }

    /// Rows covered by `col`, in ascending order.
    pub fn rows_covered_by(&self, col: usize) -> &BTreeSet<usize> {
        &self.rows_covered_by[col]
    }

    /// All rows covered by the columns selected in the chromosome.
    pub fn coverage_set(&self, chromosome: &Chromosome) -> BTreeSet<usize> {
        chromosome
            .ones()
            .filter_map(|col| self.rows_covered_by.get(col))
            .flatten()
            .copied()
            .collect()
    }

    /// Sum of the weights of the selected columns.
    pub fn total_cost(&self, chromosome: &Chromosome) -> f64 {
        let weights = self.matrix.weights();
        chromosome
            .ones()
            .filter_map(|col| weights.get(col))
            .sum()
    }

    /// Indices of the selected columns in ascending order.
    pub fn selected_columns(&self, chromosome: &Chromosome) -> Vec<usize> {
        chromosome.ones().collect()
    }
}

impl Problem for SetCoveringProblem {
    fn name(&self) -> &str {
        "Set Covering Problem"
    }

    fn acronym(&self) -> &str {
        "SCP"
    }

    fn chromosome_size(&self) -> usize {
        self.matrix.num_columns()
    }

    /// Every individual draws its own allele probability from `[bias, 0.5]`,
    /// so the initial population spans a range of densities.
    fn init_pop(&self, size: usize, bias: f64, rng: &mut dyn RngCore) -> Population {
        let mut bias = bias;
        if bias > MAX_BIAS {
            warn!("init_pop: bias {} cannot be > {}, correcting", bias, MAX_BIAS);
            bias = MAX_BIAS;
        }
        if bias < 0.0 || bias.is_nan() {
            warn!("init_pop: bias {} cannot be negative, correcting", bias);
            bias = 0.0;
        }

        let n = self.chromosome_size();
        let mut population = Population::with_capacity(size);
        for _ in 0..size {
            let p = rng.gen_range(bias..=MAX_BIAS);
            let genes = (0..n).map(|_| rng.gen_bool(p)).collect();
            population.push(Chromosome::new(genes));
        }
        population
    }

    fn objective_function(&self, chromosome: &Chromosome) -> Result<f64> {
        if !self.is_feasible(chromosome) {
            return Ok(0.0);
        }

        let total_weight = self.total_cost(chromosome);
        if total_weight == 0.0 {
            return Err(Error::DegenerateSolution);
        }
        Ok(1.0 / total_weight)
    }

    fn is_feasible(&self, chromosome: &Chromosome) -> bool {
        self.coverage_set(chromosome).len() == self.universe.len()
    }

    /// Covers every uncovered row, in ascending row order, with its lowest
    /// indexed column. Uncovered rows are taken from the coverage before the
    /// repair, so a column added for one row is not rechecked for the next.
    fn repair(&self, chromosome: &mut Chromosome) -> Result<()> {
        if self.is_feasible(chromosome) {
            return Ok(());
        }

        let covered = self.coverage_set(chromosome);
        let uncovered: Vec<usize> = self.universe.difference(&covered).copied().collect();

        for row in uncovered {
            let col = self.columns_that_cover[row]
                .iter()
                .next()
                .copied()
                .ok_or(Error::InfeasibleInstance { row })?;
            if !chromosome.get(col)? {
                chromosome.set(col, true)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for SetCoveringProblem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} ({})", self.name(), self.acronym())?;
        writeln!(f, "Instance: {}", self.instance)?;
        writeln!(f, "Universe size: {}", self.num_elements())?;
        write!(f, "Number of subsets: {}", self.num_subsets())
    }
}
