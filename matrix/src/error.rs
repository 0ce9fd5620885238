use std::fmt;

/// Errors reported by matrix construction and arithmetic
///
/// A failing operation never modifies its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// A matrix must have at least one row and one column, and every row the same length
    InvalidDimensions {
        rows: usize,
        cols: usize,
    },
    /// The shapes of the two operands are not compatible with the operation
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// The operation is only defined for square matrices
    NotSquare {
        rows: usize,
        cols: usize,
    },
    /// The determinant is zero (within tolerance), so there is no inverse
    Singular,
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MatrixError::*;
        match self {
            InvalidDimensions {rows, cols} => {
                write!(f, "invalid matrix dimensions {}x{}", rows, cols)
            },
            DimensionMismatch {left, right} => {
                write!(f, "dimension mismatch: {}x{} and {}x{}", left.0, left.1, right.0, right.1)
            },
            NotSquare {rows, cols} => {
                write!(f, "matrix must be square, but it is {}x{}", rows, cols)
            },
            Singular => write!(f, "matrix is singular: determinant is zero"),
            IndexOutOfRange {row, col, rows, cols} => {
                write!(f, "index ({}, {}) is out of range for a {}x{} matrix", row, col, rows, cols)
            },
        }
    }
}

impl std::error::Error for MatrixError {}
