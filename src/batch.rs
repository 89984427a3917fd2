use std::ops::Range;

use ndarray::{s, ArrayView1, ArrayView2};

use crate::dataset::Split;
use crate::error::{Error, Result};

/// Number of full batches in `n_samples` rows. Trailing rows are not used.
pub fn num_batches(n_samples: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    n_samples / batch_size
}

/// Rows `[index * batch_size, (index + 1) * batch_size)` of `split`, without copying.
pub fn batch(
    split: &Split,
    batch_size: usize,
    index: usize,
) -> Result<(ArrayView2<'_, f32>, ArrayView1<'_, usize>)> {
    let available = num_batches(split.len(), batch_size);
    if index >= available {
        return Err(Error::BatchOutOfBounds {
            index,
            num_batches: available,
        });
    }

    let rows = index * batch_size..(index + 1) * batch_size;
    Ok((
        split.features.slice(s![rows.clone(), ..]),
        split.labels.slice(s![rows]),
    ))
}

/// Fixed-order pass over the full batches of a split.
///
/// Cloning it, or calling [`Minibatches::new`] again, restarts from the first batch.
#[derive(Debug, Clone)]
pub struct Minibatches<'a> {
    split: &'a Split,
    batch_size: usize,
    indices: Range<usize>,
}

impl<'a> Minibatches<'a> {
    pub fn new(split: &'a Split, batch_size: usize) -> Self {
        Minibatches {
            split,
            batch_size,
            indices: 0..num_batches(split.len(), batch_size),
        }
    }
}

impl<'a> Iterator for Minibatches<'a> {
    type Item = (usize, ArrayView2<'a, f32>, ArrayView1<'a, usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        let split = self.split;
        let start = index * self.batch_size;
        let rows = start..start + self.batch_size;
        Some((
            index,
            split.features.slice(s![rows.clone(), ..]),
            split.labels.slice(s![rows]),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Minibatches<'_> {}
