//! Building networks from configuration
//!
//! Turns a validated [`NetworkConfig`] into a wired [`Network`]: roles are
//! assigned by position, weights are drawn from a seeded [`SimpleRng`], and
//! any explicit weights from the configuration overwrite the random ones.

use crate::config::{load_config, NetworkConfig};
use crate::error::Result;
use crate::network::{LayerId, Network};
use crate::utils::rng::{RandomSource, SimpleRng};
use std::path::Path;
use tracing::info;

/// Builds a network from `config`, seeding the RNG from `config.seed` or,
/// when absent, from the current time.
pub fn build_network(config: &NetworkConfig) -> Result<Network> {
    let mut rng = match config.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };
    build_network_with_rng(config, &mut rng)
}

/// Builds a network from `config`, drawing random weights from `rng`.
pub fn build_network_with_rng<R>(config: &NetworkConfig, rng: &mut R) -> Result<Network>
where
    R: RandomSource + ?Sized,
{
    let mut network = Network::chain(config.input_size, &config.sizes(), rng)?;

    for (index, layer) in config.layers.iter().enumerate() {
        if let Some(ref weights) = layer.weights {
            network.set_weights(LayerId(index), weights)?;
        }
    }

    info!(
        layers = config.layers.len(),
        explicit = config.layers.iter().filter(|l| l.weights.is_some()).count(),
        "network built from configuration"
    );
    Ok(network)
}

/// Loads a configuration file and builds the network it describes.
///
/// # Examples
///
/// ```no_run
/// use nnet::architecture::load_network;
///
/// let network = load_network("config/canonical.json").unwrap();
/// assert_eq!(network.layers().len(), 2);
/// ```
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<Network> {
    build_network(&load_config(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_explicit_weights_applied() {
        let config = parse_config(
            r#"{
                "input_size": 2,
                "layers": [{ "size": 1, "weights": [[0.3, 0.9]] }],
                "seed": 5
            }"#,
        )
        .unwrap();
        let network = build_network(&config).unwrap();
        let weight = network.layers()[0].weight().unwrap();
        assert_eq!(weight.to_rows(), vec![vec![0.3, 0.9]]);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let config = parse_config(
            r#"{ "input_size": 4, "layers": [{ "size": 3 }, { "size": 2 }], "seed": 99 }"#,
        )
        .unwrap();
        let a = build_network(&config).unwrap();
        let b = build_network(&config).unwrap();
        for (la, lb) in a.layers().iter().zip(b.layers()) {
            assert_eq!(la.weight(), lb.weight());
        }
    }
}
