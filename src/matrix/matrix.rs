use crate::error::Result;

/// Rectangular grid addressed by `(row, col)`.
pub trait Matrix<T>
where
    Self: Sized,
{
    fn from_list(lines: Vec<Vec<T>>) -> Result<Self>;
    fn to_list(&self) -> Vec<Vec<T>>;

    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    fn is_rref(&self) -> bool;
    fn identity(n: usize) -> Self;
    fn transpose(&self) -> Self;

    /// Panics when `(row, col)` is outside of the grid.
    fn at(&self, row: usize, col: usize) -> T;
    /// Returns `false` without writing when `(row, col)` is outside of the grid.
    fn set(&mut self, value: T, row: usize, col: usize) -> bool;
}
