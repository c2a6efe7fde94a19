//! Output-vector sources
//!
//! A `Source` is anything a layer can read its input from. The input vector
//! fed into the network is the only leaf source; every layer is also a source
//! for the layer after it.

use crate::error::{NetworkError, Result};

/// Anything exposing a fixed-length numeric output vector.
///
/// `output` returns a copy, so callers can never mutate the source's state
/// through it. The length never changes over the source's lifetime.
pub trait Source {
    /// Copy of the current output vector.
    fn output(&self) -> Vec<f64>;

    /// Length of the output vector.
    fn output_len(&self) -> usize {
        self.output().len()
    }
}

/// Externally supplied input values.
///
/// Created zeroed with a fixed size and only changed through `set_output`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSource {
    output: Vec<f64>,
}

impl InputSource {
    /// Allocates a zeroed input vector of length `num_inputs`.
    pub fn new(num_inputs: usize) -> Self {
        Self {
            output: vec![0.0; num_inputs],
        }
    }

    /// Copies `values` into the input vector.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch if `values` is not exactly as long as the
    /// input vector. The stored values are left untouched in that case.
    pub fn set_output(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.output.len() {
            return Err(NetworkError::mismatch(
                "input values",
                self.output.len(),
                values.len(),
            ));
        }
        self.output.copy_from_slice(values);
        Ok(())
    }
}

impl Source for InputSource {
    fn output(&self) -> Vec<f64> {
        self.output.clone()
    }

    fn output_len(&self) -> usize {
        self.output.len()
    }
}
