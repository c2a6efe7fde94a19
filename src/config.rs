//! Configuration structures for layer chains
//!
//! A chain is described in JSON by its input size, one entry per layer, and
//! an optional RNG seed for weight initialization.

use crate::error::{NetworkError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration for a single layer of the chain.
///
/// `weights`, when present, replaces the random initialization and must have
/// `size` rows, each as long as the previous layer (or the input).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LayerConfig {
    /// Number of nodes in the layer
    pub size: usize,

    /// Explicit weights, one row per node
    #[serde(default)]
    pub weights: Option<Vec<Vec<f64>>>,
}

/// Configuration for an entire chain.
///
/// The last layer is the output layer; every layer before it is hidden.
///
/// # Example
///
/// ```json
/// {
///   "input_size": 2,
///   "layers": [
///     { "size": 2, "weights": [[0.1, 0.8], [0.4, 0.6]] },
///     { "size": 1, "weights": [[0.3, 0.9]] }
///   ],
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Length of the input vector
    pub input_size: usize,

    /// Layers from first hidden layer to output layer
    pub layers: Vec<LayerConfig>,

    /// Seed for weight initialization; seeded from the clock when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    /// Layer sizes in chain order.
    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.size).collect()
    }
}

/// Loads a chain configuration from a JSON file.
///
/// # Returns
///
/// `Ok(NetworkConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or the chain fails validation.
///
/// # Examples
///
/// ```no_run
/// use nnet::config::load_config;
///
/// let cfg = load_config("config/canonical.json").unwrap();
/// assert_eq!(cfg.input_size, 2);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NetworkConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses and validates a chain configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<NetworkConfig> {
    let config: NetworkConfig = serde_json::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &NetworkConfig) -> Result<()> {
    if config.input_size == 0 {
        return Err(NetworkError::Config(
            "input_size must be greater than 0".into(),
        ));
    }

    if config.layers.is_empty() {
        return Err(NetworkError::Config(
            "configuration must have at least one layer".into(),
        ));
    }

    let mut fan_in = config.input_size;
    for (index, layer) in config.layers.iter().enumerate() {
        if layer.size == 0 {
            return Err(NetworkError::Config(format!(
                "Layer {}: size must be greater than 0",
                index
            )));
        }

        if let Some(ref weights) = layer.weights {
            if weights.len() != layer.size {
                return Err(NetworkError::Config(format!(
                    "Layer {}: expected {} weight rows, found {}",
                    index,
                    layer.size,
                    weights.len()
                )));
            }
            if let Some(row) = weights.iter().position(|row| row.len() != fan_in) {
                return Err(NetworkError::Config(format!(
                    "Layer {}: weight row {} must have {} entries, found {}",
                    index,
                    row,
                    fan_in,
                    weights[row].len()
                )));
            }
        }

        fan_in = layer.size;
    }

    Ok(())
}
