//! Layer chain owning the input vector and every layer
//!
//! Layers refer to their neighbours through index handles into this arena,
//! never through references. The network resolves those handles for each
//! pass and copies the upstream output before it mutates the layer reading
//! it, which is the same copy-out contract `Source` promises.
//!
//! # Call protocol
//!
//! One training step is `feedforward` on every layer from input to output,
//! then backpropagation from output to input. [`Network::train_step`] runs
//! exactly that sequence for a chain built with [`Network::chain`].

use crate::error::{NetworkError, Result, RoleKind};
use crate::layers::{InputSource, Layer, LayerRole, Source};
use crate::utils::dump::{format_matrix, format_vector};
use crate::utils::matrix::Matrix;
use crate::utils::rng::RandomSource;
use std::fmt;
use tracing::{debug, info};

/// Handle to a layer inside a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) usize);

impl LayerId {
    /// Position of the layer in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything a layer can read from: the input vector or another layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Input,
    Layer(LayerId),
}

impl From<LayerId> for SourceId {
    fn from(id: LayerId) -> Self {
        SourceId::Layer(id)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Input => write!(f, "input"),
            SourceId::Layer(id) => write!(f, "layer {}", id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    input: InputSource,
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a network with a zeroed input vector and no layers.
    pub fn new(num_inputs: usize) -> Self {
        Self {
            input: InputSource::new(num_inputs),
            layers: Vec::new(),
        }
    }

    /// Builds a fully wired chain `num_inputs → sizes[0] → … → sizes[n-1]`.
    ///
    /// The last layer gets the output role, every other layer the hidden role
    /// with the next layer as its sink. Weights are drawn from `rng`.
    pub fn chain<R>(num_inputs: usize, sizes: &[usize], rng: &mut R) -> Result<Self>
    where
        R: RandomSource + ?Sized,
    {
        let (&last, hidden) = sizes
            .split_last()
            .ok_or_else(|| NetworkError::Config("a chain needs at least one layer".into()))?;

        let mut network = Network::new(num_inputs);
        let mut ids = Vec::with_capacity(sizes.len());
        for &size in hidden {
            ids.push(network.add_hidden_layer(size));
        }
        ids.push(network.add_output_layer(last));

        let mut upstream = SourceId::Input;
        for &id in &ids {
            network.set_source(id, upstream, rng)?;
            upstream = SourceId::Layer(id);
        }
        for pair in ids.windows(2) {
            network.set_sink(pair[0], pair[1])?;
        }

        info!(num_inputs, ?sizes, "built layer chain");
        Ok(network)
    }

    pub fn add_hidden_layer(&mut self, num_nodes: usize) -> LayerId {
        self.push_layer(num_nodes, LayerRole::Hidden { sink: None })
    }

    pub fn add_output_layer(&mut self, num_nodes: usize) -> LayerId {
        self.push_layer(num_nodes, LayerRole::Output)
    }

    fn push_layer(&mut self, num_nodes: usize, role: LayerRole) -> LayerId {
        let id = LayerId(self.layers.len());
        self.layers.push(Layer::new(id, num_nodes, role));
        debug!(layer = %id, num_nodes, role = %role.kind(), "added layer");
        id
    }

    pub fn input(&self) -> &InputSource {
        &self.input
    }

    /// Copies `values` into the input vector. Lengths must match.
    pub fn set_input(&mut self, values: &[f64]) -> Result<()> {
        self.input.set_output(values)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer> {
        self.layers.get(id.0).ok_or(NetworkError::UnknownLayer(id))
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers.get_mut(id.0).ok_or(NetworkError::UnknownLayer(id))
    }

    /// The layer with the output role, if any. A chain has exactly one.
    pub fn output_layer(&self) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|layer| layer.role() == LayerRole::Output)
            .map(Layer::id)
    }

    /// Resolves a source handle.
    pub fn source(&self, id: SourceId) -> Result<&dyn Source> {
        match id {
            SourceId::Input => Ok(&self.input as &dyn Source),
            SourceId::Layer(layer) => Ok(self.layer(layer)? as &dyn Source),
        }
    }

    /// True if walking upstream from `from` reaches `target`.
    fn is_upstream(&self, target: LayerId, from: SourceId) -> bool {
        let mut current = from;
        for _ in 0..=self.layers.len() {
            match current {
                SourceId::Input => return false,
                SourceId::Layer(id) if id == target => return true,
                SourceId::Layer(id) => match self.layers.get(id.0).and_then(Layer::source) {
                    Some(next) => current = next,
                    None => return false,
                },
            }
        }
        // Only reachable if the existing wiring already loops.
        true
    }

    /// Attaches `source` upstream of `layer` and re-draws its weights.
    ///
    /// The weight matrix gets one column per element of the source's current
    /// output. Previously set weights are discarded.
    pub fn set_source<R>(&mut self, layer: LayerId, source: SourceId, rng: &mut R) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        self.layer(layer)?;
        let num_inputs = self.source(source)?.output_len();
        if self.is_upstream(layer, source) {
            return Err(NetworkError::InvalidConnection(format!(
                "{} cannot read from {}: it would form a cycle",
                layer, source
            )));
        }
        self.layer_mut(layer)?.attach_source(source, num_inputs, rng);
        Ok(())
    }

    /// Attaches the downstream layer a hidden layer pulls error from.
    pub fn set_sink(&mut self, hidden: LayerId, sink: LayerId) -> Result<()> {
        self.layer(sink)?;
        if hidden == sink {
            return Err(NetworkError::InvalidConnection(format!(
                "{} cannot be its own sink",
                hidden
            )));
        }
        let upstream = self.layer(hidden)?.source();
        if let Some(upstream) = upstream {
            if self.is_upstream(sink, upstream) {
                return Err(NetworkError::InvalidConnection(format!(
                    "{} is upstream of {} and cannot be its sink",
                    sink, hidden
                )));
            }
        }
        self.layer_mut(hidden)?.attach_sink(sink)
    }

    /// Replaces a layer's weights with explicit rows.
    ///
    /// The layer must already have a source, and `rows` must match its
    /// `num_nodes × num_inputs` shape.
    pub fn set_weights<W: AsRef<[f64]>>(&mut self, layer: LayerId, rows: &[W]) -> Result<()> {
        let weights = Matrix::from_rows(rows)?;
        self.layer_mut(layer)?.set_weights(weights)
    }

    fn source_output_of(&self, layer: LayerId) -> Result<Vec<f64>> {
        let source = self
            .layer(layer)?
            .source()
            .ok_or(NetworkError::SourceNotSet(layer))?;
        Ok(self.source(source)?.output())
    }

    /// Recomputes one layer's output from its source's current output.
    pub fn feedforward(&mut self, layer: LayerId) -> Result<()> {
        let input = self.source_output_of(layer)?;
        self.layer_mut(layer)?.feedforward(&input)
    }

    /// Backpropagates an output layer against `target`.
    pub fn backpropagate_output(&mut self, layer: LayerId, target: &[f64]) -> Result<()> {
        let input = self.source_output_of(layer)?;
        self.layer_mut(layer)?.backpropagate_target(target, &input)
    }

    /// Backpropagates a hidden layer from its sink.
    ///
    /// The sink's weight and error are read as they are right now. When the
    /// sink was backpropagated first, as the protocol requires, its weights
    /// have already been updated, so the propagated error uses the
    /// post-update weights rather than the ones from the forward pass.
    ///
    /// The sink may be attached before it has a source, but by now it must
    /// read directly from `layer`.
    pub fn backpropagate_hidden(&mut self, layer: LayerId) -> Result<()> {
        let hidden = self.layer(layer)?;
        let sink_id = match hidden.role() {
            LayerRole::Hidden { sink } => sink.ok_or(NetworkError::SinkNotSet(layer))?,
            LayerRole::Output => {
                return Err(NetworkError::WrongRole {
                    layer,
                    expected: RoleKind::Hidden,
                })
            }
        };
        let sink = self.layer(sink_id)?;
        let sink_weight = sink.weight().ok_or(NetworkError::SourceNotSet(sink_id))?;
        if sink.source() != Some(SourceId::Layer(layer)) {
            return Err(NetworkError::InvalidConnection(format!(
                "sink {} of {} reads from {} instead",
                sink_id,
                layer,
                sink.source().map_or_else(|| "nothing".to_string(), |s| s.to_string())
            )));
        }
        let propagated = sink_weight.transpose().mul_vec(sink.error())?;

        let input = self.source_output_of(layer)?;
        self.layer_mut(layer)?
            .backpropagate_propagated(&propagated, &input)
    }

    /// Layers from the input to the output, following source links.
    ///
    /// # Errors
    ///
    /// The layers must form one strict chain that starts at the input, ends
    /// at the output layer and includes every layer:
    ///
    /// - no output layer gives a `Config` error
    /// - an output layer that was never given a source gives `SourceNotSet`
    /// - two layers reading the same source, or a layer left off the chain,
    ///   gives `InvalidConnection`
    pub fn chain_order(&self) -> Result<Vec<LayerId>> {
        let output = self
            .output_layer()
            .ok_or_else(|| NetworkError::Config("network has no output layer".into()))?;

        let mut order = Vec::with_capacity(self.layers.len());
        let mut upstream = SourceId::Input;
        while order.len() < self.layers.len() {
            let mut readers = self
                .layers
                .iter()
                .filter(|layer| layer.source() == Some(upstream))
                .map(Layer::id);
            let Some(next) = readers.next() else { break };
            if let Some(other) = readers.next() {
                return Err(NetworkError::InvalidConnection(format!(
                    "{} feeds both {} and {}",
                    upstream, next, other
                )));
            }
            order.push(next);
            upstream = SourceId::Layer(next);
        }

        if order.last() != Some(&output) {
            if self.layer(output)?.source().is_none() {
                return Err(NetworkError::SourceNotSet(output));
            }
            return Err(NetworkError::InvalidConnection(format!(
                "output layer {} is not reachable from the input",
                output
            )));
        }
        if let Some(stray) = self.layers.iter().find(|layer| !order.contains(&layer.id())) {
            return Err(NetworkError::InvalidConnection(format!(
                "{} is not on the chain from the input to the output",
                stray.id()
            )));
        }
        Ok(order)
    }

    /// Feeds `input` through the chain and returns the output layer's
    /// activations.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let order = self.chain_order()?;
        self.run_forward(&order, input)
    }

    fn run_forward(&mut self, order: &[LayerId], input: &[f64]) -> Result<Vec<f64>> {
        self.set_input(input)?;
        for &id in order {
            self.feedforward(id)?;
        }
        let output = *order
            .last()
            .ok_or_else(|| NetworkError::Config("network has no layers".into()))?;
        Ok(self.layer(output)?.output())
    }

    /// One single-sample step: forward, then backpropagate from the output
    /// layer back to the first layer.
    ///
    /// Returns the output produced by the forward pass, before any weight
    /// moved.
    pub fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        let order = self.chain_order()?;
        let output_id = *order
            .last()
            .ok_or_else(|| NetworkError::Config("network has no layers".into()))?;
        let expected = self.layer(output_id)?.num_nodes();
        if target.len() != expected {
            return Err(NetworkError::mismatch("target", expected, target.len()));
        }

        let prediction = self.run_forward(&order, input)?;
        for &id in order.iter().rev() {
            match self.layer(id)?.role() {
                LayerRole::Output => self.backpropagate_output(id, target)?,
                LayerRole::Hidden { .. } => self.backpropagate_hidden(id)?,
            }
        }
        Ok(prediction)
    }

    /// Weight, output and error sections for one layer.
    pub fn dump_layer(&self, id: LayerId) -> Result<String> {
        let layer = self.layer(id)?;
        let mut out = format!("Layer {} ({}) weights:\n", id, layer.role().kind());
        match layer.weight() {
            Some(weight) => out.push_str(&format_matrix(weight)),
            None => out.push_str("(no source)\n\n"),
        }
        out.push_str("Output:\n");
        out.push_str(&format_vector(&layer.output()));
        out.push_str("Error:\n");
        out.push_str(&format_vector(layer.error()));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::rng::SimpleRng;

    #[test]
    fn test_chain_roles_by_position() {
        let mut rng = SimpleRng::new(42);
        let network = Network::chain(3, &[4, 2, 1], &mut rng).unwrap();

        let layers = network.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].sink(), Some(LayerId(1)));
        assert_eq!(layers[1].sink(), Some(LayerId(2)));
        assert_eq!(layers[2].role(), LayerRole::Output);
        assert_eq!(layers[0].source(), Some(SourceId::Input));
        assert_eq!(layers[2].source(), Some(SourceId::Layer(LayerId(1))));
        assert_eq!(layers[0].num_inputs(), Some(3));
        assert_eq!(layers[2].num_inputs(), Some(2));
        assert_eq!(network.output_layer(), Some(LayerId(2)));
    }

    #[test]
    fn test_chain_order_ignores_creation_order() {
        let mut rng = SimpleRng::new(42);
        let mut network = Network::new(2);
        let output = network.add_output_layer(1);
        let hidden = network.add_hidden_layer(2);
        network.set_source(hidden, SourceId::Input, &mut rng).unwrap();
        network.set_source(output, hidden.into(), &mut rng).unwrap();
        network.set_sink(hidden, output).unwrap();

        assert_eq!(network.chain_order().unwrap(), vec![hidden, output]);
        assert_eq!(network.forward(&[0.35, 0.9]).unwrap().len(), 1);
    }

    #[test]
    fn test_chain_order_needs_wired_output() {
        let mut network = Network::new(2);
        let output = network.add_output_layer(1);
        assert!(matches!(
            network.chain_order(),
            Err(NetworkError::SourceNotSet(id)) if id == output
        ));
    }

    #[test]
    fn test_chain_order_rejects_second_reader() {
        let mut rng = SimpleRng::new(42);
        let mut network = Network::chain(2, &[2, 1], &mut rng).unwrap();
        let stray = network.add_hidden_layer(3);
        network.set_source(stray, SourceId::Input, &mut rng).unwrap();
        assert!(matches!(
            network.chain_order(),
            Err(NetworkError::InvalidConnection(_))
        ));
    }

    #[test]
    fn test_chain_order_rejects_layer_off_chain() {
        let mut rng = SimpleRng::new(42);
        let mut network = Network::chain(2, &[2, 1], &mut rng).unwrap();
        network.add_hidden_layer(3);
        let err = network.chain_order().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid connection: #2 is not on the chain from the input to the output"
        );
    }

    #[test]
    fn test_chain_needs_a_layer() {
        let mut rng = SimpleRng::new(42);
        assert!(Network::chain(2, &[], &mut rng).is_err());
    }

    #[test]
    fn test_self_source_is_rejected() {
        let mut rng = SimpleRng::new(42);
        let mut network = Network::new(2);
        let a = network.add_hidden_layer(2);
        let err = network.set_source(a, SourceId::Layer(a), &mut rng).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConnection(_)));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut rng = SimpleRng::new(42);
        let mut network = Network::new(2);
        let a = network.add_hidden_layer(2);
        let b = network.add_output_layer(1);
        network.set_source(a, SourceId::Input, &mut rng).unwrap();
        network.set_source(b, a.into(), &mut rng).unwrap();
        let err = network.set_source(a, b.into(), &mut rng).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConnection(_)));
    }

    #[test]
    fn test_upstream_sink_is_rejected() {
        let mut rng = SimpleRng::new(42);
        let mut network = Network::new(2);
        let a = network.add_hidden_layer(2);
        let b = network.add_hidden_layer(2);
        network.set_source(a, SourceId::Input, &mut rng).unwrap();
        network.set_source(b, a.into(), &mut rng).unwrap();
        assert!(network.set_sink(b, a).is_err());
        assert!(network.set_sink(b, b).is_err());
    }

    #[test]
    fn test_unknown_layer() {
        let mut network = Network::new(1);
        let err = network.feedforward(LayerId(3)).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownLayer(LayerId(3))));
    }

    #[test]
    fn test_dump_layer_without_source() {
        let mut network = Network::new(1);
        let id = network.add_output_layer(1);
        let dump = network.dump_layer(id).unwrap();
        assert!(dump.starts_with("Layer #0 (output) weights:\n(no source)\n\n"));
        assert!(dump.contains("Output:\n0.00000\n\n"));
    }
}
