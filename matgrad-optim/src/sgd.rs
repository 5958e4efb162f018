// matgrad-optim/src/sgd.rs

use crate::{OptimError, Optimizer};
use log::{debug, warn};
use matgrad_core::{Graph, MatGradError, MatNumeric, NodeId};

/// Stochastic gradient descent.
///
/// Updates each parameter `p` according to `p = p - lr * grad(p)`.
#[derive(Debug, Clone, Copy)]
pub struct Sgd<T: MatNumeric> {
    lr: T,
}

impl<T: MatNumeric> Sgd<T> {
    /// # Errors
    /// `OptimError::InvalidLearningRate` unless `lr` is finite and positive.
    pub fn new(lr: T) -> Result<Self, OptimError> {
        if !lr.is_finite() || lr <= T::zero() {
            return Err(OptimError::InvalidLearningRate(lr.to_f64_lossy()));
        }
        Ok(Sgd { lr })
    }

    pub fn lr(&self) -> T {
        self.lr
    }
}

impl<T: MatNumeric> Optimizer<T> for Sgd<T> {
    fn step(&mut self, graph: &mut Graph<T>, params: &[NodeId]) -> Result<(), OptimError> {
        debug!("Sgd::step: {} parameters, lr {}", params.len(), self.lr);
        // Every handle is checked before the first write so a bad entry leaves
        // all parameters untouched.
        for &param in params {
            let node = graph.node(param)?;
            if node.gradient().is_some() && !node.is_leaf() {
                return Err(MatGradError::NonLeafMutation(param).into());
            }
        }
        for &param in params {
            let update = match graph.gradient(param)? {
                Some(grad) => grad.scale(self.lr),
                None => {
                    warn!("Sgd::step: parameter {:?} does not require grad; skipped", param);
                    continue;
                }
            };
            let value = graph.leaf_value_mut(param)?;
            value
                .as_mut_slice()
                .iter_mut()
                .zip(update.as_slice())
                .for_each(|(p, &u)| *p -= u);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use matgrad_core::Matrix;

    fn create_test_matrix(data: Vec<f32>, rows: usize, cols: usize) -> Matrix<f32> {
        Matrix::new(data, rows, cols).expect("Test matrix creation failed")
    }

    #[test]
    fn test_sgd_rejects_bad_learning_rate() {
        assert_eq!(Sgd::new(0.0_f64).unwrap_err(), OptimError::InvalidLearningRate(0.0));
        assert!(Sgd::new(-0.1_f64).is_err());
        assert!(Sgd::new(f32::NAN).is_err());
        assert!(Sgd::new(f64::INFINITY).is_err());
        assert_relative_eq!(Sgd::new(0.25_f32).expect("valid lr").lr(), 0.25);
    }

    #[test]
    fn test_sgd_step() -> Result<(), OptimError> {
        let mut graph = Graph::new();
        let p1 = graph.parameter(create_test_matrix(vec![1.0, 2.0], 1, 2), "p1");
        let p2 = graph.parameter(create_test_matrix(vec![3.0, 4.0], 2, 1), "p2");
        let frozen = graph.tensor(create_test_matrix(vec![5.0], 1, 1));

        // loss = p1 · p2 = 11; d/dp1 = p2ᵗ, d/dp2 = p1ᵗ
        let loss = graph.matmul(p1, p2)?;
        graph.backward(loss)?;

        let mut optim = Sgd::new(0.1)?;
        optim.step(&mut graph, &[p1, p2, frozen])?;

        let v1 = graph.value(p1)?.as_slice();
        assert_relative_eq!(v1[0], 0.7, epsilon = 1e-6);
        assert_relative_eq!(v1[1], 1.6, epsilon = 1e-6);
        let v2 = graph.value(p2)?.as_slice();
        assert_relative_eq!(v2[0], 2.9, epsilon = 1e-6);
        assert_relative_eq!(v2[1], 3.8, epsilon = 1e-6);
        assert_eq!(graph.value(frozen)?.as_slice(), &[5.0]);
        Ok(())
    }

    #[test]
    fn test_sgd_refuses_op_results() -> Result<(), OptimError> {
        let mut graph = Graph::new();
        let p = graph.parameter(create_test_matrix(vec![2.0], 1, 1), "p");
        let y = graph.relu(p)?;
        graph.backward(y)?;
        let mut optim = Sgd::new(0.1)?;
        assert_eq!(
            optim.step(&mut graph, &[y]),
            Err(OptimError::Graph(MatGradError::NonLeafMutation(y)))
        );
        Ok(())
    }

    #[test]
    fn test_sgd_validates_all_params_before_updating() -> Result<(), OptimError> {
        let mut graph = Graph::new();
        let p = graph.parameter(create_test_matrix(vec![2.0], 1, 1), "p");
        let y = graph.relu(p)?;
        graph.backward(y)?;
        let checkpoint = graph.checkpoint();
        let released = graph.parameter(create_test_matrix(vec![1.0], 1, 1), "released");
        graph.release(checkpoint)?;

        let mut optim = Sgd::new(0.1)?;
        assert_eq!(
            optim.step(&mut graph, &[p, y]),
            Err(OptimError::Graph(MatGradError::NonLeafMutation(y)))
        );
        assert_eq!(graph.value(p)?.as_slice(), &[2.0]);

        assert!(matches!(
            optim.step(&mut graph, &[p, released]),
            Err(OptimError::Graph(MatGradError::StaleNode(_)))
        ));
        assert_eq!(graph.value(p)?.as_slice(), &[2.0]);
        Ok(())
    }

    #[test]
    fn test_sgd_zero_grad() -> Result<(), OptimError> {
        let mut graph = Graph::new();
        let p = graph.parameter(create_test_matrix(vec![1.0, 2.0], 1, 2), "p");
        let ones = graph.tensor(create_test_matrix(vec![1.0, 1.0], 2, 1));
        let loss = graph.matmul(p, ones)?;
        graph.backward(loss)?;
        assert_eq!(graph.gradient(p)?.expect("grad").as_slice(), &[1.0, 1.0]);

        let optim = Sgd::new(0.5)?;
        optim.zero_grad(&mut graph, &[p, ones])?;
        assert_eq!(graph.gradient(p)?.expect("grad").as_slice(), &[0.0, 0.0]);
        Ok(())
    }
}
