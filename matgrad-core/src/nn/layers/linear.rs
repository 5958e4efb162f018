use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::nn::init;
use crate::nn::module::Module;
use crate::ops::traits::MatNumeric;
use rand::Rng;

/// Fully connected layer `y = W · x + b` over column-major batches.
///
/// `x` is `[in_features, batch]`, `W` is `[out_features, in_features]` and
/// the bias `[out_features, 1]` is broadcast across the batch.
#[derive(Debug, Clone, Copy)]
pub struct Linear {
    weight: NodeId,
    bias: Option<NodeId>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates the layer's parameters on `graph`: Xavier-normal weights drawn
    /// from `rng` and, if `has_bias`, a zero bias.
    pub fn new<T: MatNumeric, R: Rng + ?Sized>(
        graph: &mut Graph<T>,
        in_features: usize,
        out_features: usize,
        has_bias: bool,
        rng: &mut R,
    ) -> Result<Self, MatGradError> {
        let weight = graph.parameter(init::xavier_normal(out_features, in_features, rng)?, "linear.weight");
        let bias = has_bias.then(|| graph.parameter(init::zeros(out_features, 1), "linear.bias"));
        Ok(Linear {
            weight,
            bias,
            in_features,
            out_features,
        })
    }

    pub fn weight(&self) -> NodeId {
        self.weight
    }

    pub fn bias(&self) -> Option<NodeId> {
        self.bias
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl<T: MatNumeric> Module<T> for Linear {
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId, MatGradError> {
        let (rows, cols) = graph.shape(input)?;
        if rows != self.in_features {
            return Err(MatGradError::ShapeMismatch {
                expected: (self.in_features, cols),
                actual: (rows, cols),
                operation: "Linear::forward".to_string(),
            });
        }
        let output = graph.matmul(self.weight, input)?;
        match self.bias {
            Some(bias) => graph.add(output, bias),
            None => Ok(output),
        }
    }

    fn parameters(&self) -> Vec<NodeId> {
        let mut params = vec![self.weight];
        params.extend(self.bias);
        params
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
