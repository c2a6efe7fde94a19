//! Layered feedforward neural network
//!
//! This library provides sigmoid layers chained from an input vector to an
//! output layer, with single-sample feedforward and backpropagation.
//!
//! # Modules
//!
//! - `layers`: Source capability, input vector, and the sigmoid Layer
//! - `network`: Layer arena, wiring, and the feedforward/backpropagate protocol
//! - `utils`: Shared utilities (RNG, sigmoid, matrix, dump formatting)
//! - `config`: JSON chain configuration
//! - `architecture`: Building networks from configuration
//! - `error`: Crate error type
//!
//! # Example
//!
//! ```
//! use nnet::network::{Network, SourceId};
//! use nnet::utils::SimpleRng;
//!
//! let mut rng = SimpleRng::new(42);
//! let mut network = Network::new(2);
//! let hidden = network.add_hidden_layer(2);
//! let output = network.add_output_layer(1);
//! network.set_source(hidden, SourceId::Input, &mut rng).unwrap();
//! network.set_source(output, hidden.into(), &mut rng).unwrap();
//! network.set_sink(hidden, output).unwrap();
//!
//! let prediction = network.train_step(&[0.35, 0.9], &[0.5]).unwrap();
//! assert_eq!(prediction.len(), 1);
//! ```

pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod network;
pub mod utils;

pub use error::{NetworkError, Result};
pub use layers::{InputSource, Layer, LayerRole, Source};
pub use network::{LayerId, Network, SourceId};
