pub mod matrix {
    pub mod matrix;
    pub mod matrix_factory;
    pub mod matrix_real;
    pub mod matrix_solve;
}

pub mod config;
pub mod error;
pub mod utils;

#[cfg(feature = "python")]
pub mod python;

pub use config::{load_engine_config, EngineConfig};
pub use error::{MatrixError, Result};
pub use matrix::matrix::Matrix;
pub use matrix::matrix_factory::{MatrixFactory, PendingMatrix};
pub use matrix::matrix_real::{Axis, RealMatrix};
pub use matrix::matrix_solve::{GaussianSolution, SolutionKind};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn matrix_calc(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyMatrix>()?;
    Ok(())
}
