// src/matrix.rs

use crate::error::MatGradError;
use crate::ops::traits::MatNumeric;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Dense row-major 2-D array, the value and gradient storage of every node.
///
/// A `1 x 1` matrix plays the role of a scalar. Element `(r, c)` lives at
/// `data[r * cols + c]`.
#[derive(Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: MatNumeric> Matrix<T> {
    /// Creates a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `MatGradError::TensorCreationError` if `data.len() != rows * cols`.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> Result<Self, MatGradError> {
        if data.len() != rows * cols {
            return Err(MatGradError::TensorCreationError {
                data_len: data.len(),
                shape: (rows, cols),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from a slice of rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, MatGradError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(MatGradError::TensorCreationError {
                    data_len: row.len(),
                    shape: (n_rows, n_cols),
                });
            }
            data.extend_from_slice(row);
        }
        Matrix::new(data, n_rows, n_cols)
    }

    pub fn full(rows: usize, cols: usize, value: T) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, T::zero())
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, T::one())
    }

    /// A `1 x 1` matrix holding `value`.
    pub fn scalar(value: T) -> Self {
        Self::full(1, 1, value)
    }

    /// Builds a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns element `(r, c)` or `None` when out of range.
    pub fn get(&self, r: usize, c: usize) -> Option<T> {
        if r < self.rows && c < self.cols {
            Some(self.data[r * self.cols + c])
        } else {
            None
        }
    }

    /// Copies column `c` into a new vector.
    pub fn column(&self, c: usize) -> Vec<T> {
        (0..self.rows).map(|r| self.data[r * self.cols + c]).collect()
    }

    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    pub fn transpose(&self) -> Self {
        Matrix::from_fn(self.cols, self.rows, |r, c| self.data[c * self.cols + r])
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Element-wise combination of two equally shaped matrices.
    pub fn zip_map<F>(&self, other: &Matrix<T>, f: F) -> Result<Self, MatGradError>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape() != other.shape() {
            return Err(MatGradError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
                operation: "zip_map".to_string(),
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn scale(&self, factor: T) -> Self {
        self.map(|x| x * factor)
    }

    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Sums every row across its columns, giving a `[rows, 1]` matrix.
    pub fn sum_columns(&self) -> Self {
        Matrix::from_fn(self.rows, 1, |r, _| {
            self.data[r * self.cols..(r + 1) * self.cols]
                .iter()
                .fold(T::zero(), |acc, &x| acc + x)
        })
    }

    /// Sums every column across its rows, giving a `[1, cols]` matrix.
    pub fn sum_rows(&self) -> Self {
        let mut out = Matrix::zeros(1, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c] += self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Matrix product `self · other`.
    ///
    /// # Errors
    /// `MatGradError::IncompatibleShapes` when `self.cols != other.rows`.
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Self, MatGradError> {
        if self.cols != other.rows {
            return Err(MatGradError::IncompatibleShapes {
                shape1: self.shape(),
                shape2: other.shape(),
                operation: "matmul".to_string(),
            });
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut out = vec![T::zero(); m * n];
        // i-l-j loop order keeps the inner loop contiguous in both operands.
        for i in 0..m {
            for l in 0..k {
                let a = self.data[i * k + l];
                let b_row = &other.data[l * n..(l + 1) * n];
                let out_row = &mut out[i * n..(i + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row.iter()) {
                    *o += a * b;
                }
            }
        }
        Matrix::new(out, m, n)
    }

    /// Same elements, new dimensions (row-major reinterpretation).
    pub fn reshaped(&self, rows: usize, cols: usize) -> Result<Self, MatGradError> {
        if rows * cols != self.numel() {
            return Err(MatGradError::ShapeMismatch {
                expected: (rows, cols),
                actual: self.shape(),
                operation: "reshape".to_string(),
            });
        }
        Ok(Matrix {
            rows,
            cols,
            data: self.data.clone(),
        })
    }

    /// In-place `self += other`, the gradient accumulation primitive.
    pub fn accumulate(&mut self, other: &Matrix<T>) -> Result<(), MatGradError> {
        if self.shape() != other.shape() {
            return Err(MatGradError::GradientAccumulationShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(a, &b)| *a += b);
        Ok(())
    }

    pub fn max_abs_diff(&self, other: &Matrix<T>) -> Option<T> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs())),
        )
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        assert!(r < self.rows && c < self.cols, "Matrix index ({}, {}) out of range", r, c);
        &self.data[r * self.cols + c]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        assert!(r < self.rows && c < self.cols, "Matrix index ({}, {}) out of range", r, c);
        &mut self.data[r * self.cols + c]
    }
}

impl<T: fmt::Debug> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix[{}x{}](", self.rows, self.cols)?;
        for r in 0..self.rows {
            if r > 0 {
                write!(f, ", ")?;
            }
            f.debug_list()
                .entries(&self.data[r * self.cols..(r + 1) * self.cols])
                .finish()?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;
