use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewD};

use crate::error::{Error, Result};

/// Features and integer class labels for one split of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub features: Array2<f32>,
    pub labels: Array1<usize>,
}

impl Split {
    /// Pairs a feature matrix with its labels.
    ///
    /// # Arguments
    ///
    /// * `features` - `[n_samples, n_features]`, already normalized
    /// * `labels` - `[n_samples]` zero-based class ids
    pub fn new(features: Array2<f32>, labels: Array1<usize>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::ShapeMismatch {
                what: "labels",
                expected: features.nrows(),
                got: labels.len(),
            });
        }
        Ok(Split { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.labels.view()
    }

    /// Checks every label against the number of classes.
    pub fn check_labels(&self, n_classes: usize) -> Result<()> {
        match self.labels.iter().find(|&&label| label >= n_classes) {
            Some(&label) => Err(Error::LabelOutOfRange { label, n_classes }),
            None => Ok(()),
        }
    }
}

/// The train / validation / test splits consumed by the trainer
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: Split,
    pub valid: Split,
    pub test: Split,
}

impl Dataset {
    pub fn new(train: Split, valid: Split, test: Split) -> Result<Self> {
        let n_features = train.n_features();
        for split in [&valid, &test] {
            if split.n_features() != n_features {
                return Err(Error::ShapeMismatch {
                    what: "split features",
                    expected: n_features,
                    got: split.n_features(),
                });
            }
        }
        Ok(Dataset { train, valid, test })
    }

    pub fn n_features(&self) -> usize {
        self.train.n_features()
    }

    /// Number of classes implied by the largest label across all splits
    pub fn n_classes(&self) -> usize {
        [&self.train, &self.valid, &self.test]
            .iter()
            .flat_map(|split| split.labels.iter())
            .max()
            .map_or(0, |&max| max + 1)
    }
}

/// Converts float label storage into class ids.
///
/// Fails with [`Error::ShapeMismatch`] when `labels` is not one-dimensional and
/// with [`Error::LabelType`] when a value is not a non-negative integer.
pub fn labels_from_float(labels: ArrayViewD<'_, f32>) -> Result<Array1<usize>> {
    if labels.ndim() != 1 {
        return Err(Error::ShapeMismatch {
            what: "label dimensions",
            expected: 1,
            got: labels.ndim(),
        });
    }

    labels
        .iter()
        .map(|&value| {
            if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
                Ok(value as usize)
            } else {
                Err(Error::LabelType(format!("{value} is not a class id")))
            }
        })
        .collect()
}
