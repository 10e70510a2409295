//! Dense row-major containers indexed by axis position
//!
//! The normalizer resolves every sparse mapping into one of these once, so
//! the model builder never has to re-derive defaults at read sites.

use serde::{Deserialize, Serialize};

/// Two-dimensional dense matrix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid2<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid2<T> {
    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// Cells of one row, in column order
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl<T: Copy> Grid2<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn at(&self, row: usize, col: usize) -> T {
        *self.get(row, col)
    }
}

/// Three-dimensional dense tensor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid3<T> {
    dims: (usize, usize, usize),
    data: Vec<T>,
}

impl<T> Grid3<T> {
    pub fn from_fn(
        dims: (usize, usize, usize),
        mut f: impl FnMut(usize, usize, usize) -> T,
    ) -> Self {
        let (a, b, c) = dims;
        let mut data = Vec::with_capacity(a * b * c);
        for i in 0..a {
            for j in 0..b {
                for k in 0..c {
                    data.push(f(i, j, k));
                }
            }
        }
        Self { dims, data }
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        let (a, b, c) = self.dims;
        debug_assert!(i < a && j < b && k < c);
        (i * b + j) * c + k
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> &T {
        &self.data[self.offset(i, j, k)]
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let idx = self.offset(i, j, k);
        self.data[idx] = value;
    }

    /// All cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T: Copy> Grid3<T> {
    pub fn filled(dims: (usize, usize, usize), value: T) -> Self {
        Self {
            dims,
            data: vec![value; dims.0 * dims.1 * dims.2],
        }
    }

    pub fn at(&self, i: usize, j: usize, k: usize) -> T {
        *self.get(i, j, k)
    }
}
