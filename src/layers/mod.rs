//! Layer abstractions for the network
//!
//! This module provides the `Source` capability, the input vector that feeds
//! the first layer, and the sigmoid `Layer` with its hidden/output roles.

pub mod layer;
pub mod source;

pub use layer::{Layer, LayerRole};
pub use source::{InputSource, Source};
