use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::utils::one_hot;

/// Plain gradient descent with a fixed learning rate
#[derive(Debug, Clone)]
pub struct Optimizer {
    pub learning_rate: f32,
}

impl Optimizer {
    pub fn new(learning_rate: f32) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {learning_rate}"
            )));
        }
        Ok(Self { learning_rate })
    }

    /// One update of `classifier` on a minibatch.
    ///
    /// Uses the closed-form gradient of the mean negative log-likelihood
    /// through the softmax:
    ///
    /// ```text
    /// dZ = (P - Y_onehot) / m
    /// dW = Xᵀ · dZ
    /// db = Σ_rows dZ
    /// ```
    ///
    /// # Returns
    ///
    /// The minibatch cost measured before the parameters are updated
    pub fn step(
        &self,
        classifier: &mut Classifier,
        input: ArrayView2<'_, f32>,
        labels: ArrayView1<'_, usize>,
    ) -> Result<f32> {
        let probabilities = classifier.forward(input)?;
        // also validates label count and range before one_hot indexes with them
        let cost = classifier.loss.calculate(probabilities.view(), labels)?;

        let m = labels.len() as f32;
        let dscores = (probabilities - one_hot(labels, classifier.n_classes)) / m;
        let weight_grads = input.t().dot(&dscores);
        let bias_grads = dscores.sum_axis(Axis(0));

        classifier
            .weights
            .scaled_add(-self.learning_rate, &weight_grads);
        classifier.bias.scaled_add(-self.learning_rate, &bias_grads);

        Ok(cost)
    }
}
