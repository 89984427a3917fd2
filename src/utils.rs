use ndarray::{Array2, ArrayView1};

/// `[m, n_classes]` indicator matrix with a single 1.0 per row at the label's column.
///
/// Labels must already be known to be `< n_classes`.
pub fn one_hot(labels: ArrayView1<'_, usize>, n_classes: usize) -> Array2<f32> {
    let mut encoded = Array2::zeros((labels.len(), n_classes));
    for (i, &label) in labels.iter().enumerate() {
        encoded[[i, label]] = 1.0;
    }
    encoded
}
