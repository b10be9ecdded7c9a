use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Index ({row}, {col}) is outside of a {rows}x{cols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Matrices must have the same size ({left_rows}x{left_cols} vs {right_rows}x{right_cols})")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("Matrices cannot be multiplied: {left_cols} columns against {right_rows} rows")]
    NotConformable { left_cols: usize, right_rows: usize },

    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("System needs at least 2 variables and a constants column, got {cols} columns")]
    InsufficientVariables { cols: usize },

    #[error("System cannot be solved by Cramer's rule: coefficient determinant is zero")]
    Singular,

    #[error("Matrix must have at least one row and one column")]
    Empty,

    #[error("Row {row} has {found} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number {token:?} at row {row}, column {col}")]
    InvalidNumber {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("Cell ({row}, {col}) has not been filled")]
    Unfilled { row: usize, col: usize },

    #[error("Matrix of size {size} exceeds the limit of {max}")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid random range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("Precision of {precision} decimals exceeds the limit of {max}")]
    PrecisionTooHigh { precision: u32, max: u32 },
}
