use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Row-wise softmax, computed in place.
///
/// Each row is shifted by its maximum before exponentiating so large scores
/// cannot overflow `exp`. The shift does not change the result.
pub fn softmax(mut scores: Array2<f32>) -> Array2<f32> {
    for mut row in scores.axis_iter_mut(Axis(0)) {
        let max = row.fold(f32::NEG_INFINITY, |acc, &x| acc.max(x));
        row.mapv_inplace(|x| (x - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|x| x / sum);
    }
    scores
}

/// Index of the largest entry of every row. Ties go to the lowest index.
pub fn argmax_rows(values: ArrayView2<'_, f32>) -> Array1<usize> {
    values
        .axis_iter(Axis(0))
        .map(|row| {
            let mut best = 0;
            for (j, &x) in row.iter().enumerate() {
                if x > row[best] {
                    best = j;
                }
            }
            best
        })
        .collect()
}
