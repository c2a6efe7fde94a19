//! Shared utilities for the network
//!
//! This module provides random number generation, the sigmoid activation,
//! the weight matrix type, and dump formatting.

pub mod activations;
pub mod dump;
pub mod matrix;
pub mod rng;

pub use matrix::Matrix;
pub use rng::{RandomSource, SimpleRng};
