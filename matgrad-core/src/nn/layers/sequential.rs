use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::nn::module::Module;
use crate::ops::traits::MatNumeric;

/// Runs its modules in insertion order, feeding each output to the next.
#[derive(Debug)]
pub struct Sequential<T: MatNumeric> {
    modules: Vec<Box<dyn Module<T>>>,
}

impl<T: MatNumeric> Sequential<T> {
    pub fn new() -> Self {
        Sequential { modules: Vec::new() }
    }

    /// Appends a module, builder style.
    pub fn with(mut self, module: impl Module<T> + 'static) -> Self {
        self.push(module);
        self
    }

    pub fn push(&mut self, module: impl Module<T> + 'static) {
        self.modules.push(Box::new(module));
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<T: MatNumeric> Default for Sequential<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MatNumeric> Module<T> for Sequential<T> {
    /// An empty container returns `input` unchanged.
    fn forward(&self, graph: &mut Graph<T>, input: NodeId) -> Result<NodeId, MatGradError> {
        self.modules
            .iter()
            .try_fold(input, |x, module| module.forward(graph, x))
    }

    fn parameters(&self) -> Vec<NodeId> {
        self.modules.iter().flat_map(|m| m.parameters()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use crate::nn::{Linear, ReLU};
    use crate::utils::testing::seeded_rng;

    #[test]
    fn test_sequential_mlp_forward_and_parameters() -> Result<(), MatGradError> {
        let mut graph = Graph::<f64>::new();
        let mut rng = seeded_rng(1);
        let l1 = Linear::new(&mut graph, 4, 8, true, &mut rng)?;
        let l2 = Linear::new(&mut graph, 8, 3, true, &mut rng)?;
        let model: Sequential<f64> = Sequential::new().with(l1).with(ReLU::new()).with(l2);
        assert_eq!(model.len(), 3);

        let params = model.parameters();
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], l1.weight());
        assert_eq!(params[3], l2.bias().expect("bias"));

        let x = graph.tensor(Matrix::ones(4, 5));
        let y = model.forward(&mut graph, x)?;
        assert_eq!(graph.shape(y)?, (3, 5));
        assert_eq!(graph.op_tag(y)?, "add");
        Ok(())
    }

    #[test]
    fn test_empty_sequential_is_identity() -> Result<(), MatGradError> {
        let mut graph = Graph::<f32>::new();
        let x = graph.tensor(Matrix::ones(2, 2));
        let model = Sequential::<f32>::default();
        assert!(model.is_empty());
        assert_eq!(model.forward(&mut graph, x)?, x);
        Ok(())
    }
}
