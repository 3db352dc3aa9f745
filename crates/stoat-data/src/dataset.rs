use stoat_core::{Error, Result, Tensor};

// Dataset trait — unified interface for any data source

/// A single sample: one row of features paired with one row of targets.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Features as a `[1, n_features]` tensor.
    pub x: Tensor,
    /// Target as a `[1, n_targets]` tensor (one-hot row for classification).
    pub y: Tensor,
}

/// An indexed collection of samples.
pub trait Dataset {
    /// Total number of samples.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the sample at position `index`.
    ///
    /// # Panics
    /// May panic if `index >= self.len()`.
    fn get(&self, index: usize) -> Sample;
}

/// A dataset backed by two in-memory matrices: one row per sample.
pub struct TensorDataset {
    x: Tensor,
    y: Tensor,
}

impl TensorDataset {
    /// Wrap feature and target matrices. Their row counts must agree.
    pub fn new(x: Tensor, y: Tensor) -> Result<Self> {
        if x.rows() != y.rows() {
            return Err(Error::ShapeMismatch {
                op: "TensorDataset (row counts must match)",
                lhs: x.shape(),
                rhs: y.shape(),
            });
        }
        Ok(TensorDataset { x, y })
    }

    /// The full feature matrix.
    pub fn features(&self) -> &Tensor {
        &self.x
    }

    /// The full target matrix.
    pub fn targets(&self) -> &Tensor {
        &self.y
    }
}

impl Dataset for TensorDataset {
    fn len(&self) -> usize {
        self.x.rows()
    }

    fn get(&self, index: usize) -> Sample {
        assert!(index < self.len(), "sample index {index} out of bounds");
        let x = Tensor::from_vec(1, self.x.cols(), self.x.row(index).to_vec())
            .expect("row length matches cols");
        let y = Tensor::from_vec(1, self.y.cols(), self.y.row(index).to_vec())
            .expect("row length matches cols");
        Sample { x, y }
    }
}
