use log::debug;
use rand::Rng;

use crate::config::EngineConfig;
use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_real::{parse_lines, RealMatrix};
use crate::utils::{normalize_zero, round_to};

/// Builds matrices carrying the configured precision.
#[derive(Debug, Clone, Default)]
pub struct MatrixFactory {
    config: EngineConfig,
}

impl MatrixFactory {
    pub fn new(config: EngineConfig) -> Self {
        MatrixFactory { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn from_list(&self, lines: Vec<Vec<f64>>) -> Result<RealMatrix> {
        RealMatrix::from_list_with_precision(lines, self.config.precision)
    }

    pub fn parse(&self, text: &str) -> Result<RealMatrix> {
        self.from_list(parse_lines(text)?)
    }

    pub fn filled(&self, rows: usize, cols: usize, value: f64) -> Result<RealMatrix> {
        self.from_list(vec![vec![value; cols]; rows])
    }

    pub fn zeros(&self, rows: usize, cols: usize) -> Result<RealMatrix> {
        self.filled(rows, cols, 0.0)
    }

    pub fn identity(&self, n: usize) -> Result<RealMatrix> {
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(RealMatrix::identity(n).with_precision(self.config.precision))
    }

    /// Matrix whose cells are all waiting for a value.
    pub fn empty(&self, rows: usize, cols: usize) -> Result<PendingMatrix> {
        Ok(PendingMatrix::new(rows, cols)?.with_precision(self.config.precision))
    }

    /// Uniform cells in `[random_min, random_max]` keeping `random_decimals` decimals.
    pub fn random<R: Rng>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<RealMatrix> {
        self.config.validate()?;
        let (min, max) = (self.config.random_min, self.config.random_max);
        let decimals = self.config.random_decimals;
        debug!("random {}x{} matrix in [{}, {}]", rows, cols, min, max);

        self.generate(rows, cols, || round_to(rng.gen_range(min..=max), decimals))
    }

    /// Uniform whole numbers in `[random_min, random_max]`.
    pub fn random_integers<R: Rng>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<RealMatrix> {
        self.config.validate()?;
        let (min, max) = (self.config.random_min.ceil(), self.config.random_max.floor());
        if min > max {
            return Err(MatrixError::InvalidRange { min, max });
        }
        let (min, max) = (min as i64, max as i64);
        debug!("random integer {}x{} matrix in [{}, {}]", rows, cols, min, max);

        self.generate(rows, cols, || normalize_zero(rng.gen_range(min..=max) as f64))
    }

    fn generate(
        &self,
        rows: usize,
        cols: usize,
        mut sample: impl FnMut() -> f64,
    ) -> Result<RealMatrix> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        self.from_list(
            (0..rows)
                .map(|_| (0..cols).map(|_| sample()).collect())
                .collect(),
        )
    }

    /// Reject determinant input above `max_determinant_size`, the cofactor
    /// expansion grows factorially.
    pub fn check_determinant_size(&self, matrix: &RealMatrix) -> Result<()> {
        let size = matrix.rows().max(matrix.cols());
        if size > self.config.max_determinant_size {
            return Err(MatrixError::TooLarge {
                size,
                max: self.config.max_determinant_size,
            });
        }
        Ok(())
    }
}

/// Grid being filled cell by cell. Becomes a `RealMatrix` once complete.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
    precision: u32,
}

impl PendingMatrix {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(PendingMatrix {
            rows,
            cols,
            cells: vec![None; rows * cols],
            precision: crate::utils::DEFAULT_PRECISION,
        })
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Returns `false` when `(row, col)` is outside of the grid.
    pub fn fill(&mut self, value: f64, row: usize, col: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = Some(normalize_zero(value));
        true
    }

    pub fn clear(&mut self, row: usize, col: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = None;
        true
    }

    /// First unfilled cell in row order.
    pub fn next_unfilled(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(Option::is_none)
            .map(|i| (i / self.cols, i % self.cols))
    }

    pub fn is_complete(&self) -> bool {
        self.next_unfilled().is_none()
    }

    pub fn into_matrix(self) -> Result<RealMatrix> {
        if let Some((row, col)) = self.next_unfilled() {
            return Err(MatrixError::Unfilled { row, col });
        }
        let lines: Vec<Vec<f64>> = self
            .cells
            .chunks(self.cols)
            .map(|line| line.iter().flatten().copied().collect())
            .collect();
        RealMatrix::from_list_with_precision(lines, self.precision)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
