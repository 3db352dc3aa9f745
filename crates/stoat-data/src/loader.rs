use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use stoat_core::{Result, Tensor};

use crate::dataset::Dataset;

// DataLoader — mini-batch iteration with optional per-epoch shuffling

/// Walks a [`Dataset`] in mini-batches, stacking sample rows into
/// `[batch, n_features]` / `[batch, n_targets]` matrices.
///
/// Call [`reset`](DataLoader::reset) at the top of each epoch, then pull
/// batches with [`next_batch`](DataLoader::next_batch) until it returns
/// `None`. The final batch may be shorter than `batch_size`.
pub struct DataLoader<D: Dataset> {
    dataset: D,
    batch_size: usize,
    shuffle: bool,
    indices: Vec<usize>,
    cursor: usize,
    rng: StdRng,
}

impl<D: Dataset> DataLoader<D> {
    /// Create a loader over `dataset`, ready for its first epoch: with
    /// shuffling enabled the index permutation is drawn immediately, so
    /// `next_batch` yields shuffled data even before any `reset`. A
    /// `batch_size` of zero is clamped to 1.
    pub fn new(dataset: D, batch_size: usize, shuffle: bool, seed: u64) -> Self {
        let indices: Vec<usize> = (0..dataset.len()).collect();
        let mut loader = DataLoader {
            dataset,
            batch_size: batch_size.max(1),
            shuffle,
            indices,
            cursor: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        loader.reset();
        loader
    }

    /// Number of batches per epoch, counting a short final batch.
    pub fn num_batches(&self) -> usize {
        (self.dataset.len() + self.batch_size - 1) / self.batch_size
    }

    /// Rewind to the start of an epoch, reshuffling if enabled.
    pub fn reset(&mut self) {
        if self.shuffle {
            self.indices.shuffle(&mut self.rng);
        }
        self.cursor = 0;
    }

    /// The next `(x, y)` batch, or `None` once the epoch is exhausted.
    pub fn next_batch(&mut self) -> Result<Option<(Tensor, Tensor)>> {
        if self.cursor >= self.indices.len() {
            return Ok(None);
        }
        let end = (self.cursor + self.batch_size).min(self.indices.len());
        let batch = &self.indices[self.cursor..end];

        let first = self.dataset.get(batch[0]);
        let (x_cols, y_cols) = (first.x.cols(), first.y.cols());

        let mut x = Tensor::zeros(batch.len(), x_cols);
        let mut y = Tensor::zeros(batch.len(), y_cols);
        for (r, &idx) in batch.iter().enumerate() {
            let sample = self.dataset.get(idx);
            for c in 0..x_cols {
                x[(r, c)] = sample.x[(0, c)];
            }
            for c in 0..y_cols {
                y[(r, c)] = sample.y[(0, c)];
            }
        }

        self.cursor = end;
        Ok(Some((x, y)))
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &D {
        &self.dataset
    }
}
