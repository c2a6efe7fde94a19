//! Row-major `f64` matrix used for layer weights.
//!
//! Row `i` holds the weights feeding node `i`, so a layer with `n` nodes and
//! `m` inputs stores an `n × m` matrix.

use crate::error::{NetworkError, Result};
use crate::utils::rng::RandomSource;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Every entry drawn independently from uniform [low, high).
    pub fn random_uniform<R>(rows: usize, cols: usize, low: f64, high: f64, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range_f64(low, high))
            .collect();
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from nested rows. All rows must share one length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(NetworkError::mismatch("matrix row", cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.offset(row, col)]
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.data[offset] = value;
    }

    /// Weights feeding node `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row {} out of bounds for {} rows", row, self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.rows, "row {} out of bounds for {} rows", row, self.rows);
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Copies the matrix out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// Matrix-vector product: `out[i] = Σ_j self[i][j] * x[j]`.
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.cols {
            return Err(NetworkError::mismatch("matrix-vector product", self.cols, x.len()));
        }
        Ok((0..self.rows)
            .map(|r| self.row(r).iter().zip(x).map(|(w, v)| w * v).sum())
            .collect())
    }

    /// Returns the `cols × rows` transpose.
    pub fn transpose(&self) -> Matrix {
        let mut t = Matrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.set(c, r, self.get(r, c));
            }
        }
        t
    }

    /// Rank-one update: `self[i][j] += u[i] * v[j]`.
    pub fn add_outer(&mut self, u: &[f64], v: &[f64]) -> Result<()> {
        if u.len() != self.rows {
            return Err(NetworkError::mismatch("outer product rows", self.rows, u.len()));
        }
        if v.len() != self.cols {
            return Err(NetworkError::mismatch("outer product cols", self.cols, v.len()));
        }
        for (i, &ui) in u.iter().enumerate() {
            for (w, &vj) in self.row_mut(i).iter_mut().zip(v) {
                *w += ui * vj;
            }
        }
        Ok(())
    }
}
