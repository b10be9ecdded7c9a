use log::{trace, warn};
use num_traits::Zero;

use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_real::RealMatrix;
use crate::utils::round_to;

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionKind {
    Unique,
    /// Variables without a pivot, their value can be chosen freely.
    Infinite { free_vars: Vec<usize> },
    /// `row` reads `0 = c` with `c != 0`.
    Inconsistent { row: usize },
}

/// Result of solving an augmented system by Gaussian elimination.
///
/// `pivot_cols[row]` is the column of the leading `1` of `row` in both
/// `row_echelon` and `reduced`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSolution {
    pub row_echelon: RealMatrix,
    pub reduced: RealMatrix,
    pub pivot_cols: Vec<Option<usize>>,
    pub rank: usize,
    pub kind: SolutionKind,
}

impl GaussianSolution {
    /// Value of each variable, only when the solution is unique.
    pub fn values(&self) -> Option<Vec<f64>> {
        if self.kind != SolutionKind::Unique {
            return None;
        }
        let constants = self.reduced.cols() - 1;
        let mut values = vec![0.0; constants];
        for (row, pivot) in self.pivot_cols.iter().enumerate() {
            if let Some(col) = pivot {
                values[*col] = self.reduced.at(row, constants);
            }
        }
        Some(values)
    }
}

// Augmented systems: every column but the last holds a variable's coefficients,
// the last one holds the constants.
impl RealMatrix {
    pub fn variables(&self) -> usize {
        self.cols() - 1
    }

    /// Copy without the constants column.
    pub fn coefficients(&self) -> Result<RealMatrix> {
        self.remove_column(self.cols() - 1)
    }

    pub fn constants(&self) -> Vec<f64> {
        let last = self.cols() - 1;
        (0..self.rows()).map(|r| self.at(r, last)).collect()
    }

    fn check_system(&self) -> Result<()> {
        if self.cols() < 3 {
            return Err(MatrixError::InsufficientVariables { cols: self.cols() });
        }
        Ok(())
    }

    /// Forward elimination in place. Returns the pivot column of every row.
    ///
    /// A zero in the top-left corner is first fixed by swapping the first and
    /// last rows; any later zero pivot is replaced by the first row below with a
    /// non-zero entry in that column. A column without such a row is free and
    /// the next column is tried on the same row.
    pub fn row_echelon_form(&mut self) -> Result<Vec<Option<usize>>> {
        self.check_system()?;

        let rows = self.rows();
        if self.at(0, 0).is_zero() && rows > 1 {
            self.swap_rows(0, rows - 1)?;
        }

        let mut pivot_cols = vec![None; rows];
        let mut row = 0;

        for col in 0..self.variables() {
            if row >= rows {
                break;
            }

            if self.at(row, col).is_zero() {
                match (row + 1..rows).find(|&r| !self.at(r, col).is_zero()) {
                    Some(r) => self.swap_rows(row, r)?,
                    None => {
                        trace!("column {} has no pivot", col);
                        continue;
                    }
                }
            }

            let pivot = self.at(row, col);
            trace!("pivot {} at ({}, {})", pivot, row, col);
            for below in row + 1..rows {
                let ratio = self.at(below, col) / pivot;
                if ratio.is_zero() {
                    continue;
                }
                self.subtract_scaled_row(below, row, ratio)?;
                self.set(0.0, below, col);
            }

            self.divide_row(row, pivot)?;
            self.set(1.0, row, col);
            pivot_cols[row] = Some(col);
            row += 1;
        }

        Ok(pivot_cols)
    }

    /// Forward elimination followed by back substitution, in place.
    pub fn reduced_row_echelon_form(&mut self) -> Result<Vec<Option<usize>>> {
        let pivot_cols = self.row_echelon_form()?;
        self.back_substitute(&pivot_cols)?;
        Ok(pivot_cols)
    }

    fn back_substitute(&mut self, pivot_cols: &[Option<usize>]) -> Result<()> {
        for (row, pivot) in pivot_cols.iter().enumerate().rev() {
            let Some(col) = *pivot else {
                continue;
            };
            for above in 0..row {
                let factor = self.at(above, col);
                if factor.is_zero() {
                    continue;
                }
                self.subtract_scaled_row(above, row, factor)?;
                self.set(0.0, above, col);
            }
        }
        Ok(())
    }

    fn classify(&self, pivot_cols: &[Option<usize>]) -> SolutionKind {
        let vars = self.variables();

        let contradiction = (0..self.rows()).find(|&r| {
            self.row(r)[..vars].iter().all(|x| x.is_zero()) && !self.at(r, vars).is_zero()
        });
        if let Some(row) = contradiction {
            return SolutionKind::Inconsistent { row };
        }

        let free_vars: Vec<usize> = (0..vars)
            .filter(|c| !pivot_cols.contains(&Some(*c)))
            .collect();
        if free_vars.is_empty() {
            SolutionKind::Unique
        } else {
            SolutionKind::Infinite { free_vars }
        }
    }

    /// Solve the augmented system on a copy, `self` is left untouched.
    pub fn solve_by_gaussian_elimination(&self) -> Result<GaussianSolution> {
        let mut row_echelon = self.clone();
        let pivot_cols = row_echelon.row_echelon_form()?;

        let mut reduced = row_echelon.clone();
        reduced.back_substitute(&pivot_cols)?;

        let rank = pivot_cols.iter().flatten().count();
        let kind = reduced.classify(&pivot_cols);
        if let SolutionKind::Inconsistent { row } = kind {
            warn!("system is inconsistent: row {} reduces to 0 = c", row);
        }

        Ok(GaussianSolution {
            row_echelon,
            reduced,
            pivot_cols,
            rank,
            kind,
        })
    }

    /// Solve a square augmented system with Cramer's rule.
    ///
    /// The answer has the same shape as `self`: a `1` on the diagonal and the
    /// value of each variable in the constants column.
    pub fn solve_by_cramers_rule(&self) -> Result<RealMatrix> {
        self.check_system()?;
        let n = self.variables();
        if self.rows() != n {
            return Err(MatrixError::NotSquare {
                rows: self.rows(),
                cols: n,
            });
        }

        let det = self.coefficients()?.determinant()?;
        if det.is_zero() {
            warn!("coefficient determinant is zero, Cramer's rule does not apply");
            return Err(MatrixError::Singular);
        }

        let precision = self.precision();
        let mut answer = RealMatrix::zeros(n, n + 1)?.with_precision(precision);
        for i in 0..n {
            // column `i` takes the constants, the original column `i` falls off the end
            let mut variant = self.clone();
            variant.swap_columns(i, n)?;
            let det_i = variant.remove_column(n)?.determinant()?;

            answer.set(1.0, i, i);
            answer.set(round_to(det_i / det, precision), i, n);
        }
        Ok(answer)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn m(lines: Vec<Vec<f64>>) -> RealMatrix {
        RealMatrix::from_list(lines).unwrap()
    }

    #[test]
    fn test_gauss_two_variables() {
        init();
        let system = m(vec![vec![1.0, 1.0, 3.0], vec![2.0, -1.0, 0.0]]);
        let solution = system.solve_by_gaussian_elimination().unwrap();

        assert_eq!(solution.kind, SolutionKind::Unique);
        assert_eq!(solution.rank, 2);
        assert_eq!(solution.values(), Some(vec![1.0, 2.0]));
        assert_eq!(
            solution.row_echelon.to_list(),
            vec![vec![1.0, 1.0, 3.0], vec![0.0, 1.0, 2.0]]
        );
        assert_eq!(
            solution.reduced.to_list(),
            vec![vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 2.0]]
        );
        assert!(solution.reduced.is_rref());
        assert_eq!(
            system.to_list(),
            vec![vec![1.0, 1.0, 3.0], vec![2.0, -1.0, 0.0]]
        );
    }

    #[test]
    fn test_gauss_three_variables() {
        init();
        let system = m(vec![
            vec![1.0, 1.0, 1.0, 6.0],
            vec![0.0, 2.0, 5.0, -4.0],
            vec![2.0, 5.0, -1.0, 27.0],
        ]);
        let values = system.solve_by_gaussian_elimination().unwrap().values().unwrap();
        let expected = [5.0, 3.0, -2.0];
        for (value, expected) in values.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gauss_zero_corner() {
        init();
        let mut system = m(vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 3.0]]);
        assert_eq!(
            system.reduced_row_echelon_form().unwrap(),
            vec![Some(0), Some(1)]
        );
        assert_eq!(
            system.to_list(),
            vec![vec![1.0, 0.0, 3.0], vec![0.0, 1.0, 2.0]]
        );

        let mut lower = m(vec![
            vec![1.0, 2.0, 3.0, 1.0],
            vec![2.0, 4.0, 1.0, 2.0],
            vec![0.0, 1.0, 1.0, 3.0],
        ]);
        let pivots = lower.row_echelon_form().unwrap();
        assert_eq!(pivots, vec![Some(0), Some(1), Some(2)]);
        assert!(lower.cells().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_gauss_free_variables() {
        init();
        let dependent = m(vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]]);
        let solution = dependent.solve_by_gaussian_elimination().unwrap();
        assert_eq!(solution.kind, SolutionKind::Infinite { free_vars: vec![1] });
        assert_eq!(solution.rank, 1);
        assert_eq!(solution.pivot_cols, vec![Some(0), None]);
        assert_eq!(solution.values(), None);

        let wide = m(vec![vec![1.0, 1.0, 1.0, 3.0], vec![0.0, 1.0, 2.0, 4.0]]);
        let solution = wide.solve_by_gaussian_elimination().unwrap();
        assert_eq!(solution.kind, SolutionKind::Infinite { free_vars: vec![2] });
        assert_eq!(
            solution.reduced.to_list(),
            vec![vec![1.0, 0.0, -1.0, -1.0], vec![0.0, 1.0, 2.0, 4.0]]
        );

        let middle = m(vec![vec![1.0, 2.0, 1.0, 4.0], vec![2.0, 4.0, 3.0, 9.0]]);
        let solution = middle.solve_by_gaussian_elimination().unwrap();
        assert_eq!(solution.pivot_cols, vec![Some(0), Some(2)]);
        assert_eq!(solution.kind, SolutionKind::Infinite { free_vars: vec![1] });
        assert_eq!(
            solution.reduced.to_list(),
            vec![vec![1.0, 2.0, 0.0, 3.0], vec![0.0, 0.0, 1.0, 1.0]]
        );
    }

    #[test]
    fn test_gauss_inconsistent() {
        init();
        let system = m(vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 7.0]]);
        let solution = system.solve_by_gaussian_elimination().unwrap();
        assert_eq!(solution.kind, SolutionKind::Inconsistent { row: 1 });
        assert_eq!(solution.values(), None);
    }

    #[test]
    fn test_gauss_more_equations() {
        init();
        let system = m(vec![
            vec![1.0, 1.0, 2.0],
            vec![1.0, -1.0, 0.0],
            vec![2.0, 2.0, 4.0],
        ]);
        let solution = system.solve_by_gaussian_elimination().unwrap();
        assert_eq!(solution.pivot_cols, vec![Some(0), Some(1), None]);
        assert_eq!(solution.values(), Some(vec![1.0, 1.0]));
    }

    #[test]
    fn test_gauss_insufficient_variables() {
        let mut system = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(
            system.row_echelon_form(),
            Err(MatrixError::InsufficientVariables { cols: 2 })
        );
        assert!(system.solve_by_gaussian_elimination().is_err());
        assert!(system.solve_by_cramers_rule().is_err());
    }

    #[test]
    fn test_cramer() {
        init();
        let system = m(vec![vec![1.0, 1.0, 3.0], vec![2.0, -1.0, 0.0]]);
        assert_eq!(
            system.solve_by_cramers_rule().unwrap().to_list(),
            vec![vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 2.0]]
        );

        let system = m(vec![
            vec![1.0, 1.0, 1.0, 6.0],
            vec![0.0, 2.0, 5.0, -4.0],
            vec![2.0, 5.0, -1.0, 27.0],
        ]);
        let answer = system.solve_by_cramers_rule().unwrap();
        assert_eq!(answer.constants(), vec![5.0, 3.0, -2.0]);
        assert_eq!(answer.coefficients().unwrap(), RealMatrix::identity(3));
    }

    #[test]
    fn test_cramer_singular() {
        init();
        let system = m(vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]]);
        assert_eq!(system.solve_by_cramers_rule(), Err(MatrixError::Singular));

        let wide = m(vec![vec![1.0, 1.0, 1.0, 3.0], vec![0.0, 1.0, 2.0, 4.0]]);
        assert_eq!(
            wide.solve_by_cramers_rule(),
            Err(MatrixError::NotSquare { rows: 2, cols: 3 })
        );
    }

    fn dominant_system() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (2usize..5).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(-5i32..=5, n + 1), n).prop_map(
                |lines| {
                    lines
                        .into_iter()
                        .enumerate()
                        .map(|(i, line)| {
                            line.into_iter()
                                .enumerate()
                                .map(|(j, x)| f64::from(x) + if i == j { 30.0 } else { 0.0 })
                                .collect::<Vec<f64>>()
                        })
                        .collect::<Vec<Vec<f64>>>()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn cramer_agrees_with_gauss(lines in dominant_system()) {
            let system = m(lines);
            let gauss = system.solve_by_gaussian_elimination().unwrap();
            prop_assert_eq!(&gauss.kind, &SolutionKind::Unique);
            let cramer = system.solve_by_cramers_rule().unwrap().constants();
            for (a, b) in gauss.values().unwrap().iter().zip(cramer.iter()) {
                prop_assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
            }
        }
    }
}
