use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::activation::{argmax_rows, softmax};
use crate::error::{Error, Result};
use crate::loss::{zero_one_loss, Loss};

/// Multi-class logistic regression: `P(y = j | x) = softmax(x·W + b)_j`
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    pub n_features: usize,
    pub n_classes: usize,
    /// `[n_features, n_classes]`
    pub weights: Array2<f32>,
    /// `[n_classes]`
    pub bias: Array1<f32>,
    pub loss: Loss,
}

impl Classifier {
    /// Creates a classifier with all-zero parameters
    ///
    /// # Arguments
    ///
    /// * `n_features` - Dimension of the space the samples lie in
    /// * `n_classes` - Number of labels
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        Classifier {
            n_features,
            n_classes,
            weights: Array2::zeros((n_features, n_classes)),
            bias: Array1::zeros(n_classes),
            loss: Loss::NegativeLogLikelihood,
        }
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.bias.len()
    }

    /// Class probabilities for every row of `input`
    ///
    /// # Arguments
    ///
    /// * `input` - `[m, n_features]` batch
    ///
    /// # Returns
    ///
    /// `[m, n_classes]` matrix whose rows sum to one
    pub fn forward(&self, input: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        if input.ncols() != self.n_features {
            return Err(Error::ShapeMismatch {
                what: "input features",
                expected: self.n_features,
                got: input.ncols(),
            });
        }

        let scores = input.dot(&self.weights) + &self.bias;
        Ok(softmax(scores))
    }

    /// Most probable class for every row of `input`
    pub fn predict(&self, input: ArrayView2<'_, f32>) -> Result<Array1<usize>> {
        let probabilities = self.forward(input)?;
        Ok(argmax_rows(probabilities.view()))
    }

    /// Mean negative log-likelihood of `labels` under the model
    pub fn loss(&self, input: ArrayView2<'_, f32>, labels: ArrayView1<'_, usize>) -> Result<f32> {
        let probabilities = self.forward(input)?;
        self.loss.calculate(probabilities.view(), labels)
    }

    /// Fraction of rows of `input` whose predicted class differs from `labels`
    pub fn error_rate(
        &self,
        input: ArrayView2<'_, f32>,
        labels: ArrayView1<'_, usize>,
    ) -> Result<f32> {
        let predictions = self.predict(input)?;
        zero_one_loss(predictions.view(), labels)
    }
}
