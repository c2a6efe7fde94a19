//! Sigmoid layer with single-sample backpropagation
//!
//! A `Layer` owns its weight matrix, its output vector and its error vector.
//! It does not own its neighbours: the upstream source and, for hidden
//! layers, the downstream sink are stored as handles that the owning
//! [`Network`](crate::network::Network) resolves.

use crate::error::{NetworkError, Result, RoleKind};
use crate::layers::source::Source;
use crate::network::{LayerId, SourceId};
use crate::utils::activations::{sigmoid_derivative, sigmoid_vec};
use crate::utils::matrix::Matrix;
use crate::utils::rng::RandomSource;
use tracing::{debug, trace};

/// Lower bound of the uniform weight initialization range.
pub const INIT_LOW: f64 = -0.5;
/// Upper bound (exclusive) of the uniform weight initialization range.
pub const INIT_HIGH: f64 = 0.5;

/// How a layer computes its error during backpropagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    /// Pulls error back from the downstream `sink` through its weights.
    Hidden { sink: Option<LayerId> },
    /// Computes error from a caller-supplied target vector.
    Output,
}

impl LayerRole {
    pub fn kind(&self) -> RoleKind {
        match self {
            LayerRole::Hidden { .. } => RoleKind::Hidden,
            LayerRole::Output => RoleKind::Output,
        }
    }
}

/// Fully connected sigmoid layer.
///
/// Row `i` of the weight matrix holds the weights feeding node `i`. The
/// matrix only exists once a source has been attached, because its column
/// count is the source's output length.
///
/// # Fields
///
/// * `output` - Sigmoid activations from the last feedforward (num_nodes)
/// * `error` - Error signal from the last backpropagation (num_nodes)
/// * `weight` - num_nodes × num_inputs, `None` until a source is attached
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    role: LayerRole,
    source: Option<SourceId>,
    output: Vec<f64>,
    error: Vec<f64>,
    weight: Option<Matrix>,
}

impl Layer {
    pub(crate) fn new(id: LayerId, num_nodes: usize, role: LayerRole) -> Self {
        Self {
            id,
            role,
            source: None,
            output: vec![0.0; num_nodes],
            error: vec![0.0; num_nodes],
            weight: None,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    pub fn num_nodes(&self) -> usize {
        self.output.len()
    }

    /// Column count of the weight matrix, once a source is attached.
    pub fn num_inputs(&self) -> Option<usize> {
        self.weight.as_ref().map(Matrix::cols)
    }

    pub fn source(&self) -> Option<SourceId> {
        self.source
    }

    /// Downstream layer of a hidden layer, if one has been attached.
    pub fn sink(&self) -> Option<LayerId> {
        match self.role {
            LayerRole::Hidden { sink } => sink,
            LayerRole::Output => None,
        }
    }

    pub fn weight(&self) -> Option<&Matrix> {
        self.weight.as_ref()
    }

    pub fn error(&self) -> &[f64] {
        &self.error
    }

    /// Stores the source handle and draws a fresh weight matrix.
    ///
    /// Every entry is drawn independently from uniform [-0.5, 0.5). Any
    /// previously assigned weights are discarded.
    pub(crate) fn attach_source<R>(&mut self, source: SourceId, num_inputs: usize, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        self.source = Some(source);
        self.weight = Some(Matrix::random_uniform(
            self.num_nodes(),
            num_inputs,
            INIT_LOW,
            INIT_HIGH,
            rng,
        ));
        trace!(layer = %self.id, %source, num_inputs, "initialized weights");
    }

    pub(crate) fn attach_sink(&mut self, sink: LayerId) -> Result<()> {
        match &mut self.role {
            LayerRole::Hidden { sink: slot } => {
                *slot = Some(sink);
                Ok(())
            }
            LayerRole::Output => Err(NetworkError::WrongRole {
                layer: self.id,
                expected: RoleKind::Hidden,
            }),
        }
    }

    /// Replaces the weight matrix with explicit values.
    ///
    /// The replacement must have exactly the current shape, so a source has
    /// to be attached first.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        let current = self
            .weight
            .as_ref()
            .ok_or(NetworkError::SourceNotSet(self.id))?;
        if weights.rows() != current.rows() {
            return Err(NetworkError::mismatch(
                "weight rows",
                current.rows(),
                weights.rows(),
            ));
        }
        if weights.cols() != current.cols() {
            return Err(NetworkError::mismatch(
                "weight columns",
                current.cols(),
                weights.cols(),
            ));
        }
        self.weight = Some(weights);
        Ok(())
    }

    fn weight_checked(&self, input: &[f64]) -> Result<&Matrix> {
        let weight = self
            .weight
            .as_ref()
            .ok_or(NetworkError::SourceNotSet(self.id))?;
        if input.len() != weight.cols() {
            return Err(NetworkError::mismatch("layer input", weight.cols(), input.len()));
        }
        Ok(weight)
    }

    /// `output = sigmoid(weight · input)`, overwriting the output in place.
    pub(crate) fn feedforward(&mut self, input: &[f64]) -> Result<()> {
        let z = self.weight_checked(input)?.mul_vec(input)?;
        self.output.copy_from_slice(&sigmoid_vec(&z));
        debug!(layer = %self.id, output = ?self.output, "feedforward");
        Ok(())
    }

    /// Output-role error: `o * (1 - o) * (target - o)`, then weight update.
    pub(crate) fn backpropagate_target(&mut self, target: &[f64], input: &[f64]) -> Result<()> {
        if self.role != LayerRole::Output {
            return Err(NetworkError::WrongRole {
                layer: self.id,
                expected: RoleKind::Output,
            });
        }
        if target.len() != self.num_nodes() {
            return Err(NetworkError::mismatch("target", self.num_nodes(), target.len()));
        }
        self.weight_checked(input)?;

        for ((e, &o), &t) in self.error.iter_mut().zip(&self.output).zip(target) {
            *e = sigmoid_derivative(o) * (t - o);
        }
        debug!(layer = %self.id, error = ?self.error, "output error");
        self.update_weight(input)
    }

    /// Hidden-role error from the sink's propagated error, then weight update.
    ///
    /// `propagated[i]` is `Σ_k sink.weight[k][i] * sink.error[k]`, computed by
    /// the caller from whatever the sink holds at call time.
    pub(crate) fn backpropagate_propagated(
        &mut self,
        propagated: &[f64],
        input: &[f64],
    ) -> Result<()> {
        if propagated.len() != self.num_nodes() {
            return Err(NetworkError::mismatch(
                "propagated error",
                self.num_nodes(),
                propagated.len(),
            ));
        }
        self.weight_checked(input)?;

        for ((e, &o), &p) in self.error.iter_mut().zip(&self.output).zip(propagated) {
            *e = sigmoid_derivative(o) * p;
        }
        debug!(layer = %self.id, error = ?self.error, "hidden error");
        self.update_weight(input)
    }

    /// `weight[i][j] += error[i] * input[j]` with a unit learning rate.
    fn update_weight(&mut self, input: &[f64]) -> Result<()> {
        let weight = self
            .weight
            .as_mut()
            .ok_or(NetworkError::SourceNotSet(self.id))?;
        weight.add_outer(&self.error, input)
    }
}

impl Source for Layer {
    fn output(&self) -> Vec<f64> {
        self.output.clone()
    }

    fn output_len(&self) -> usize {
        self.output.len()
    }
}
