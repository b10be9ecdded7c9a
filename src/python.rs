use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyType;

use crate::error::MatrixError;
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_real::{Axis, RealMatrix};

fn value_error(error: MatrixError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

#[derive(Debug, Clone)]
#[pyclass(name = "Matrix")]
pub struct PyMatrix {
    inner: RealMatrix,
}

impl From<RealMatrix> for PyMatrix {
    fn from(inner: RealMatrix) -> Self {
        PyMatrix { inner }
    }
}

#[pymethods]
impl PyMatrix {
    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<f64>>) -> PyResult<Self> {
        match RealMatrix::from_list(lines) {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    #[classmethod]
    pub fn parse(_cls: &Bound<PyType>, text: &str) -> PyResult<Self> {
        match text.parse::<RealMatrix>() {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_list()
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    #[getter]
    pub fn precision(&self) -> u32 {
        self.inner.precision()
    }

    pub fn get(&self, row: usize, col: usize) -> PyResult<f64> {
        self.inner.get(row, col).map_err(value_error)
    }

    pub fn set(&mut self, value: f64, row: usize, col: usize) -> bool {
        self.inner.set(value, row, col)
    }

    pub fn scale(&mut self, factor: f64) {
        self.inner.scale(factor)
    }

    pub fn __add__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        match &self.inner + &rhs.inner {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn __sub__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        match &self.inner - &rhs.inner {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn __mul__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        match &self.inner * &rhs.inner {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    #[getter]
    #[allow(non_snake_case)]
    pub fn T(&self) -> PyMatrix {
        self.inner.transpose().into()
    }

    pub fn trace(&self) -> PyResult<f64> {
        self.inner.trace().map_err(value_error)
    }

    pub fn determinant(&self) -> PyResult<f64> {
        self.inner.determinant().map_err(value_error)
    }

    /// `along` is `"row"` or `"column"`.
    pub fn cofactor_expansion(&self, along: &str, index: usize) -> PyResult<f64> {
        let axis = match along {
            "row" => Axis::Row,
            "column" => Axis::Column,
            _ => return Err(PyValueError::new_err("Axis must be \"row\" or \"column\"")),
        };
        self.inner
            .cofactor_expansion(axis, index)
            .map_err(value_error)
    }

    pub fn minor(&self, row: usize, col: usize) -> PyResult<PyMatrix> {
        match self.inner.minor(row, col) {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    /// `(row_echelon, reduced, pivot_cols, rank, values)`, `values` is `None`
    /// unless the solution is unique.
    pub fn solve_by_gaussian_elimination(
        &self,
    ) -> PyResult<(PyMatrix, PyMatrix, Vec<Option<usize>>, usize, Option<Vec<f64>>)> {
        match self.inner.solve_by_gaussian_elimination() {
            Ok(solution) => {
                let values = solution.values();
                Ok((
                    solution.row_echelon.into(),
                    solution.reduced.into(),
                    solution.pivot_cols,
                    solution.rank,
                    values,
                ))
            }
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn solve_by_cramers_rule(&self) -> PyResult<PyMatrix> {
        match self.inner.solve_by_cramers_rule() {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }
}
