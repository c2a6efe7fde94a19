//! Human-readable dumps of vectors and matrices.

use crate::utils::matrix::Matrix;
use std::fmt::Write;

/// One value per line at five decimals, followed by a blank line.
pub fn format_vector(values: &[f64]) -> String {
    let mut out = String::new();
    for value in values {
        let _ = writeln!(out, "{:.5}", value);
    }
    out.push('\n');
    out
}

/// One row per line, each entry at five decimals followed by a tab, then a
/// blank line.
pub fn format_matrix(matrix: &Matrix) -> String {
    let mut out = String::new();
    for r in 0..matrix.rows() {
        for value in matrix.row(r) {
            let _ = write!(out, "{:.5}\t", value);
        }
        out.push('\n');
    }
    out.push('\n');
    out
}
