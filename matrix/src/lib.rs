mod error;

pub use error::MatrixError;

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

/// Two elements closer than this are considered equal, and a determinant smaller than this in
/// magnitude is considered zero
pub const EPSILON: f64 = 1e-7;

/// A dense matrix of `f64` stored in row-major order
///
/// A matrix always has at least one row and one column.
#[derive(Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.chunks(self.cols)).finish()
    }
}

/// Element-wise comparison with a tolerance of [`EPSILON`]
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.eq_matrix(other)
    }
}

impl Matrix {
    /// Creates a `rows` by `cols` matrix filled with zeros
    pub fn new(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidDimensions {rows, cols});
        }

        Ok(Self {rows, cols, data: vec![0.0; rows * cols]})
    }

    /// Creates the `n` by `n` identity matrix
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let mut matrix = Self::new(n, n)?;
        for i in 0..n {
            matrix[(i, i)] = 1.0;
        }

        Ok(matrix)
    }

    /// Creates a matrix from its rows
    ///
    /// Fails with [`MatrixError::InvalidDimensions`] if there are no rows, the rows are empty, or
    /// the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let row_count = rows.len();
        if row_count == 0 || cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return Err(MatrixError::InvalidDimensions {rows: row_count, cols});
        }

        let data = rows.into_iter().flatten().collect();
        Ok(Self {rows: row_count, cols, data})
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns the element at (`row`, `col`)
    pub fn get(&self, row: usize, col: usize) -> Result<f64, MatrixError> {
        let index = self.offset(row, col)?;
        Ok(self.data[index])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f64, MatrixError> {
        let index = self.offset(row, col)?;
        Ok(&mut self.data[index])
    }

    /// Changes the number of rows
    ///
    /// Rows that exist both before and after keep their values. New rows are filled with zeros.
    pub fn set_rows(&mut self, rows: usize) -> Result<(), MatrixError> {
        self.resize(rows, self.cols)
    }

    /// Changes the number of columns
    ///
    /// Columns that exist both before and after keep their values. New columns are filled with
    /// zeros.
    pub fn set_cols(&mut self, cols: usize) -> Result<(), MatrixError> {
        self.resize(self.rows, cols)
    }

    /// Returns true if both matrices have the same shape and every pair of elements differs by
    /// less than [`EPSILON`]
    pub fn eq_matrix(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(&other.data).all(|(a, b)| (a - b).abs() < EPSILON)
    }

    /// Adds `other` to this matrix element by element
    pub fn sum(&mut self, other: &Self) -> Result<(), MatrixError> {
        self.check_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }

        Ok(())
    }

    /// Subtracts `other` from this matrix element by element
    pub fn sub(&mut self, other: &Self) -> Result<(), MatrixError> {
        self.check_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }

        Ok(())
    }

    /// Multiplies every element by `num`
    pub fn mul_number(&mut self, num: f64) {
        for value in &mut self.data {
            *value *= num;
        }
    }

    /// Replaces this matrix with the product `self * other`
    ///
    /// Fails with [`MatrixError::DimensionMismatch`] unless `self.cols() == other.rows()`.
    pub fn mul_matrix(&mut self, other: &Self) -> Result<(), MatrixError> {
        *self = self.try_mul(other)?;
        Ok(())
    }

    /// Returns `self + other`
    pub fn try_add(&self, other: &Self) -> Result<Self, MatrixError> {
        let mut result = self.clone();
        result.sum(other)?;
        Ok(result)
    }

    /// Returns `self - other`
    pub fn try_sub(&self, other: &Self) -> Result<Self, MatrixError> {
        let mut result = self.clone();
        result.sub(other)?;
        Ok(result)
    }

    /// Returns the product `self * other`
    pub fn try_mul(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::DimensionMismatch {left: self.shape(), right: other.shape()});
        }

        let mut result = Self::new(self.rows, other.cols)?;
        for i in 0..self.rows {
            for j in 0..other.cols {
                result[(i, j)] = (0..self.cols)
                    .map(|k| self[(i, k)] * other[(k, j)])
                    .sum::<f64>();
            }
        }

        Ok(result)
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self[(i, j)]);
            }
        }

        Self {rows: self.cols, cols: self.rows, data}
    }

    /// Returns the matrix with row `row` and column `col` removed
    ///
    /// Fails with [`MatrixError::InvalidDimensions`] if the result would be empty.
    pub fn minor(&self, row: usize, col: usize) -> Result<Self, MatrixError> {
        self.offset(row, col)?;
        if self.rows < 2 || self.cols < 2 {
            return Err(MatrixError::InvalidDimensions {rows: self.rows - 1, cols: self.cols - 1});
        }

        let data = self.data.chunks(self.cols)
            .enumerate()
            .filter(|&(i, _)| i != row)
            .flat_map(|(_, values)| {
                values.iter()
                    .enumerate()
                    .filter(|&(j, _)| j != col)
                    .map(|(_, &value)| value)
            })
            .collect();

        Ok(Self {rows: self.rows - 1, cols: self.cols - 1, data})
    }

    /// Returns the matrix of cofactors: each element is the signed determinant of its minor
    pub fn calc_complements(&self) -> Result<Self, MatrixError> {
        self.check_square()?;
        if self.rows == 1 {
            // The minor of a 1x1 matrix is empty and has determinant 1
            return Ok(Self {rows: 1, cols: 1, data: vec![1.0]});
        }

        let mut result = Self::new(self.rows, self.cols)?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                result[(i, j)] = sign * self.minor(i, j)?.determinant()?;
            }
        }

        Ok(result)
    }

    /// Computes the determinant by Gaussian elimination with partial pivoting
    pub fn determinant(&self) -> Result<f64, MatrixError> {
        self.check_square()?;

        let n = self.rows;
        let mut data = self.data.clone();
        let mut det = 1.0;
        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&a, &b| {
                    let a = data[a * n + col].abs();
                    let b = data[b * n + col].abs();
                    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
                })
                .unwrap_or(col);

            let pivot_value = data[pivot * n + col];
            if pivot_value == 0.0 {
                return Ok(0.0);
            }

            if pivot != col {
                for k in 0..n {
                    data.swap(pivot * n + k, col * n + k);
                }
                det = -det;
            }

            det *= pivot_value;
            for row in col + 1..n {
                let factor = data[row * n + col] / pivot_value;
                for k in col..n {
                    data[row * n + k] -= factor * data[col * n + k];
                }
            }
        }

        Ok(det)
    }

    /// Returns the inverse matrix
    ///
    /// Fails with [`MatrixError::Singular`] if the determinant is smaller than [`EPSILON`] in
    /// magnitude.
    pub fn inverse(&self) -> Result<Self, MatrixError> {
        let det = self.determinant()?;
        if det.abs() < EPSILON {
            return Err(MatrixError::Singular);
        }

        let mut result = self.calc_complements()?.transpose();
        result.mul_number(1.0 / det);
        Ok(result)
    }

    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {row, col, rows: self.rows, cols: self.cols});
        }

        Ok(row * self.cols + col)
    }

    fn check_same_shape(&self, other: &Self) -> Result<(), MatrixError> {
        if self.shape() != other.shape() {
            return Err(MatrixError::DimensionMismatch {left: self.shape(), right: other.shape()});
        }
        Ok(())
    }

    fn check_square(&self) -> Result<(), MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {rows: self.rows, cols: self.cols});
        }
        Ok(())
    }

    fn resize(&mut self, rows: usize, cols: usize) -> Result<(), MatrixError> {
        let mut resized = Self::new(rows, cols)?;
        log::trace!("resizing {}x{} matrix to {}x{}", self.rows, self.cols, rows, cols);

        for i in 0..self.rows.min(rows) {
            for j in 0..self.cols.min(cols) {
                resized[(i, j)] = self[(i, j)];
            }
        }

        *self = resized;
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    /// # Panics
    ///
    /// Panics if the index is out of range
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        match self.offset(row, col) {
            Ok(index) => &self.data[index],
            Err(err) => panic!("{}", err),
        }
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        match self.offset(row, col) {
            Ok(index) => &mut self.data[index],
            Err(err) => panic!("{}", err),
        }
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, num: f64) -> Matrix {
        let mut result = self.clone();
        result.mul_number(num);
        result
    }
}

impl Mul<f64> for Matrix {
    type Output = Matrix;

    fn mul(mut self, num: f64) -> Matrix {
        self.mul_number(num);
        self
    }
}

impl MulAssign<f64> for Matrix {
    fn mul_assign(&mut self, num: f64) {
        self.mul_number(num);
    }
}
