use itertools::Itertools;
use log::debug;
use num_traits::Zero;
use std::fmt;
use std::ops;
use std::str::FromStr;

use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::utils::{normalize_zero, parse_decimal, round_to, DEFAULT_PRECISION};

/// Direction of a cofactor expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

/// Dense grid of real numbers stored row by row.
///
/// Operations taking `&mut self` mutate the grid in place, everything taking
/// `&self` leaves it untouched and returns a fresh value. Every rounded result
/// keeps `precision` decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct RealMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
    precision: u32,
}

impl Matrix<f64> for RealMatrix {
    fn from_list(lines: Vec<Vec<f64>>) -> Result<Self> {
        RealMatrix::from_list_with_precision(lines, DEFAULT_PRECISION)
    }

    fn to_list(&self) -> Vec<Vec<f64>> {
        self.cells
            .chunks(self.cols)
            .map(|line| line.into())
            .collect()
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn is_rref(&self) -> bool {
        let mut lead = None;

        for i in 0..self.rows {
            let pivot_col_opt = self.row(i).iter().position(|x| !x.is_zero());

            match pivot_col_opt {
                None => {
                    if (i + 1..self.rows).any(|r| self.row(r).iter().any(|x| !x.is_zero())) {
                        return false;
                    }
                    break;
                }
                Some(pivot_col) => {
                    if let Some(prev_lead) = lead {
                        if pivot_col <= prev_lead {
                            return false;
                        }
                    }
                    lead = Some(pivot_col);

                    if self.at(i, pivot_col) != 1.0 {
                        return false;
                    }

                    if (0..self.rows).any(|r| r != i && !self.at(r, pivot_col).is_zero()) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn identity(n: usize) -> Self {
        assert!(n > 0, "Identity matrix needs at least one row");
        RealMatrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { 1.0 } else { 0.0 }))
                .collect(),
            precision: DEFAULT_PRECISION,
        }
    }

    fn transpose(&self) -> Self {
        RealMatrix {
            rows: self.cols,
            cols: self.rows,
            cells: (0..self.cols)
                .flat_map(|c| (0..self.rows).map(move |r| self.at(r, c)))
                .collect(),
            precision: self.precision,
        }
    }

    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "Index ({}, {}) is outside of a {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, value: f64, row: usize, col: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = round_to(value, self.precision);
        true
    }
}

impl RealMatrix {
    /// Like `from_list`, every cell is rounded to `precision` decimals.
    pub fn from_list_with_precision(lines: Vec<Vec<f64>>, precision: u32) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if let Some((row, line)) = lines.iter().find_position(|l| l.len() != cols) {
            return Err(MatrixError::Ragged {
                row,
                expected: cols,
                found: line.len(),
            });
        }

        Ok(RealMatrix {
            rows,
            cols,
            cells: lines
                .into_iter()
                .flatten()
                .map(|x| round_to(x, precision))
                .collect(),
            precision,
        })
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(RealMatrix {
            rows,
            cols,
            cells: vec![round_to(value, DEFAULT_PRECISION); rows * cols],
            precision: DEFAULT_PRECISION,
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, 0.0)
    }

    /// Switch to `precision` decimals, rounding the stored cells to match.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = round_to(*cell, precision));
        self
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Cells of `row`. Panics when `row >= self.rows()`, like `at`.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Checked read, fails on indices outside of the grid.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.rows || col >= self.cols {
            return Err(self.out_of_bounds(row, col));
        }
        Ok(self.cells[row * self.cols + col])
    }

    pub fn normalize_zeros(&mut self) {
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = normalize_zero(*cell));
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> MatrixError {
        MatrixError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn check_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    // --------------------------------------------------
    //                  ARITHMETIC
    // --------------------------------------------------

    /// Multiply every cell by `factor`.
    pub fn scale(&mut self, factor: f64) {
        let precision = self.precision;
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = round_to(*cell * factor, precision));
    }

    /// Elementwise sum (or difference when `subtract`) stored into `self`.
    pub fn combine(&mut self, other: &RealMatrix, subtract: bool) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MatrixError::ShapeMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: other.rows,
                right_cols: other.cols,
            });
        }

        let precision = self.precision;
        self.cells
            .iter_mut()
            .zip(other.cells.iter())
            .for_each(|(a, b)| {
                let value = if subtract { *a - b } else { *a + b };
                *a = round_to(value, precision);
            });
        Ok(())
    }

    /// Replace `self` by `self × other`.
    pub fn multiply(&mut self, other: &RealMatrix) -> Result<()> {
        *self = self.product(other)?;
        Ok(())
    }

    /// `self × other` as a new matrix. Only the stored cells are rounded.
    pub fn product(&self, other: &RealMatrix) -> Result<RealMatrix> {
        if self.cols != other.rows {
            return Err(MatrixError::NotConformable {
                left_cols: self.cols,
                right_rows: other.rows,
            });
        }

        let precision = self.precision;
        Ok(RealMatrix {
            rows: self.rows,
            cols: other.cols,
            cells: (0..self.rows)
                .flat_map(|i| {
                    (0..other.cols).map(move |j| {
                        let dot: f64 = (0..self.cols).map(|k| self.at(i, k) * other.at(k, j)).sum();
                        round_to(dot, precision)
                    })
                })
                .collect(),
            precision,
        })
    }

    pub fn transpose_mut(&mut self) {
        *self = <Self as Matrix<f64>>::transpose(self);
    }

    pub fn trace(&self) -> Result<f64> {
        self.check_square()?;
        Ok(round_to(
            (0..self.rows).map(|i| self.at(i, i)).sum(),
            self.precision,
        ))
    }

    // --------------------------------------------------
    //                  ROWS / COLUMNS
    // --------------------------------------------------

    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<()> {
        if a >= self.rows || b >= self.rows {
            return Err(self.out_of_bounds(a.max(b), 0));
        }
        if a != b {
            debug!("swapping rows {} and {}", a, b);
            for k in 0..self.cols {
                self.cells.swap(a * self.cols + k, b * self.cols + k);
            }
        }
        Ok(())
    }

    /// `row[target] -= factor * row[source]`, rounded per cell.
    pub fn subtract_scaled_row(&mut self, target: usize, source: usize, factor: f64) -> Result<()> {
        if target >= self.rows || source >= self.rows {
            return Err(self.out_of_bounds(target.max(source), 0));
        }
        let precision = self.precision;
        for k in 0..self.cols {
            let value = self.cells[target * self.cols + k] - factor * self.cells[source * self.cols + k];
            self.cells[target * self.cols + k] = round_to(value, precision);
        }
        Ok(())
    }

    /// Divide every cell of `row` by `divisor`, a zero divisor leaves the row as is.
    pub fn divide_row(&mut self, row: usize, divisor: f64) -> Result<()> {
        if row >= self.rows {
            return Err(self.out_of_bounds(row, 0));
        }
        if divisor.is_zero() {
            return Ok(());
        }
        let precision = self.precision;
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter_mut()
            .for_each(|cell| *cell = round_to(*cell / divisor, precision));
        Ok(())
    }

    /// Swap two columns by swapping rows of the transposed grid.
    pub fn swap_columns(&mut self, a: usize, b: usize) -> Result<()> {
        if a >= self.cols || b >= self.cols {
            return Err(self.out_of_bounds(0, a.max(b)));
        }
        self.transpose_mut();
        self.swap_rows(a, b)?;
        self.transpose_mut();
        Ok(())
    }

    /// Copy of `self` without column `col`.
    pub fn remove_column(&self, col: usize) -> Result<RealMatrix> {
        if col >= self.cols {
            return Err(self.out_of_bounds(0, col));
        }
        if self.cols < 2 {
            return Err(MatrixError::Empty);
        }
        Ok(RealMatrix {
            rows: self.rows,
            cols: self.cols - 1,
            cells: self
                .cells
                .chunks(self.cols)
                .flat_map(|line| {
                    line.iter()
                        .enumerate()
                        .filter(move |&(c, _)| c != col)
                        .map(|(_, value)| *value)
                })
                .collect(),
            precision: self.precision,
        })
    }

    /// Copy of `self` without row `row` and column `col`.
    pub fn minor(&self, row: usize, col: usize) -> Result<RealMatrix> {
        if row >= self.rows || col >= self.cols {
            return Err(self.out_of_bounds(row, col));
        }
        if self.rows < 2 || self.cols < 2 {
            return Err(MatrixError::Empty);
        }
        Ok(self.minor_unchecked(row, col))
    }

    fn minor_unchecked(&self, row: usize, col: usize) -> RealMatrix {
        RealMatrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            cells: (0..self.rows)
                .filter(|&r| r != row)
                .flat_map(|r| {
                    (0..self.cols)
                        .filter(move |&c| c != col)
                        .map(move |c| self.at(r, c))
                })
                .collect(),
            precision: self.precision,
        }
    }

    // --------------------------------------------------
    //                  DETERMINANT
    // --------------------------------------------------

    /// Laplace expansion along the row or column holding the most zeros.
    pub fn determinant(&self) -> Result<f64> {
        self.check_square()?;
        Ok(round_to(self.det_raw(), self.precision))
    }

    /// Laplace expansion along an explicitly chosen row or column.
    pub fn cofactor_expansion(&self, axis: Axis, index: usize) -> Result<f64> {
        self.check_square()?;
        if index >= self.rows {
            return Err(match axis {
                Axis::Row => self.out_of_bounds(index, 0),
                Axis::Column => self.out_of_bounds(0, index),
            });
        }
        let value = if self.rows == 1 {
            self.cells[0]
        } else {
            self.expand(axis, index)
        };
        Ok(round_to(value, self.precision))
    }

    fn det_raw(&self) -> f64 {
        match self.rows {
            1 => self.cells[0],
            2 => self.cells[0] * self.cells[3] - self.cells[1] * self.cells[2],
            _ => {
                let (axis, index) = self.expansion_axis();
                self.expand(axis, index)
            }
        }
    }

    // Ties go to columns.
    fn expansion_axis(&self) -> (Axis, usize) {
        let (row, row_zeros) = (0..self.rows)
            .map(|r| (r, self.row(r).iter().filter(|x| x.is_zero()).count()))
            .max_by_key(|&(_, zeros)| zeros)
            .unwrap_or((0, 0));
        let (col, col_zeros) = (0..self.cols)
            .map(|c| (c, (0..self.rows).filter(|&r| self.at(r, c).is_zero()).count()))
            .max_by_key(|&(_, zeros)| zeros)
            .unwrap_or((0, 0));

        let choice = if row_zeros > col_zeros {
            (Axis::Row, row)
        } else {
            (Axis::Column, col)
        };
        debug!(
            "{}x{} determinant: expanding along {:?} {} ({} zeros)",
            self.rows,
            self.cols,
            choice.0,
            choice.1,
            row_zeros.max(col_zeros)
        );
        choice
    }

    fn expand(&self, axis: Axis, index: usize) -> f64 {
        (0..self.rows)
            .filter_map(|k| {
                let (r, c) = match axis {
                    Axis::Row => (index, k),
                    Axis::Column => (k, index),
                };
                let value = self.at(r, c);
                if value.is_zero() {
                    return None;
                }
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                Some(sign * value * self.minor_unchecked(r, c).det_raw())
            })
            .sum()
    }
}

impl FromStr for RealMatrix {
    type Err = MatrixError;

    /// One row per line, cells separated by whitespace, `,` or `.` as decimal mark.
    fn from_str(text: &str) -> Result<Self> {
        <RealMatrix as Matrix<f64>>::from_list(parse_lines(text)?)
    }
}

/// Cell values of the text format, one `Vec` per non-blank line.
pub(crate) fn parse_lines(text: &str) -> Result<Vec<Vec<f64>>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(row, line)| {
            line.split_whitespace()
                .enumerate()
                .map(|(col, token)| {
                    parse_decimal(token).ok_or_else(|| MatrixError::InvalidNumber {
                        row,
                        col,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}

impl fmt::Display for RealMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.cells
                .chunks(self.cols)
                .map(|line| line.iter().join("\t"))
                .join("\n")
        )
    }
}

impl ops::Add<&RealMatrix> for &RealMatrix {
    type Output = Result<RealMatrix>;

    fn add(self, rhs: &RealMatrix) -> Result<RealMatrix> {
        let mut result = self.clone();
        result.combine(rhs, false)?;
        Ok(result)
    }
}

impl ops::Sub<&RealMatrix> for &RealMatrix {
    type Output = Result<RealMatrix>;

    fn sub(self, rhs: &RealMatrix) -> Result<RealMatrix> {
        let mut result = self.clone();
        result.combine(rhs, true)?;
        Ok(result)
    }
}

impl ops::Mul<&RealMatrix> for &RealMatrix {
    type Output = Result<RealMatrix>;

    fn mul(self, rhs: &RealMatrix) -> Result<RealMatrix> {
        self.product(rhs)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
