use ndarray::{ArrayView1, ArrayView2};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loss {
    NegativeLogLikelihood,
}

impl Loss {
    /// Mean loss of `probabilities` (`[m, n_classes]`) against class ids `labels` (`[m]`).
    pub fn calculate(
        &self,
        probabilities: ArrayView2<'_, f32>,
        labels: ArrayView1<'_, usize>,
    ) -> Result<f32> {
        check_len(probabilities.nrows(), labels.len())?;
        let n_classes = probabilities.ncols();

        match self {
            Loss::NegativeLogLikelihood => {
                // -mean(log P[i, y[i]]), no clamping: log(0) is reported
                let mut total = 0.0f32;
                for (i, &label) in labels.iter().enumerate() {
                    if label >= n_classes {
                        return Err(Error::LabelOutOfRange { label, n_classes });
                    }
                    let p = probabilities[[i, label]];
                    if p <= 0.0 {
                        return Err(Error::Numeric(format!(
                            "probability of the target class underflowed to {p} for sample {i}"
                        )));
                    }
                    total += p.ln();
                }

                let loss = -total / labels.len() as f32;
                if !loss.is_finite() {
                    return Err(Error::Numeric(format!("loss is not finite: {loss}")));
                }
                Ok(loss)
            }
        }
    }
}

/// Fraction of `predictions` that differ from `labels`.
pub fn zero_one_loss(
    predictions: ArrayView1<'_, usize>,
    labels: ArrayView1<'_, usize>,
) -> Result<f32> {
    check_len(predictions.len(), labels.len())?;
    let errors = predictions
        .iter()
        .zip(labels.iter())
        .filter(|(p, y)| p != y)
        .count();
    Ok(errors as f32 / labels.len() as f32)
}

fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::ShapeMismatch {
            what: "labels",
            expected,
            got,
        });
    }
    if got == 0 {
        return Err(Error::ShapeMismatch {
            what: "samples",
            expected: 1,
            got: 0,
        });
    }
    Ok(())
}
