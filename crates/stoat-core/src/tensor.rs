use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

// Tensor — The fundamental data structure
//
// A Tensor is a dense 2-D array of f32 with a fixed (rows, cols) shape and a
// contiguous row-major buffer. Unlike frameworks built around shared views,
// a stoat Tensor exclusively owns its buffer: moves transfer ownership
// without copying, and Clone produces a deep, independent copy. That keeps
// the manual backprop protocol easy to reason about — a layer's weight,
// gradient accumulator, and forward cache are all plainly owned fields.
//
// INVARIANT: data.len() == rows * cols, always. Every constructor enforces
// it and no public method can break it (data_mut hands out a slice, whose
// length is fixed).

/// A dense row-major `rows × cols` matrix of `f32`.
///
/// # Example
/// ```
/// use stoat_core::Tensor;
///
/// let mut t = Tensor::zeros(2, 3);
/// t[(0, 1)] = 5.0;
/// assert_eq!(t.get(0, 1), 5.0);
/// assert_eq!(t.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Tensor {
    /// Create a tensor filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, 0.0)
    }

    /// Create a tensor filled with ones.
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, 1.0)
    }

    /// Create a tensor filled with a constant value.
    pub fn full(rows: usize, cols: usize, fill: f32) -> Self {
        Tensor {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }

    /// Create a tensor from an existing flat row-major buffer.
    ///
    /// Fails if the buffer length does not equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ElementCountMismatch {
                rows,
                cols,
                got: data.len(),
            });
        }
        Ok(Tensor { rows, cols, data })
    }

    /// Create a tensor of zeros with the same shape as `other`.
    pub fn zeros_like(other: &Tensor) -> Self {
        Self::zeros(other.rows, other.cols)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The shape as a `(rows, cols)` pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether `self` and `other` have identical shapes.
    pub fn same_shape(&self, other: &Tensor) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Total number of elements (`rows * cols`).
    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    /// Element at `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r >= rows` or `c >= cols`.
    pub fn get(&self, r: usize, c: usize) -> f32 {
        self[(r, c)]
    }

    /// Set the element at `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r >= rows` or `c >= cols`.
    pub fn set(&mut self, r: usize, c: usize, v: f32) {
        self[(r, c)] = v;
    }

    /// The flat row-major buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the flat row-major buffer.
    ///
    /// The slice has fixed length, so the shape invariant cannot be broken.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Row `r` as a contiguous slice.
    ///
    /// # Panics
    /// Panics if `r >= rows`.
    pub fn row(&self, r: usize) -> &[f32] {
        assert!(r < self.rows, "row {} out of bounds for {} rows", r, self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Overwrite every element with `v`.
    pub fn fill_(&mut self, v: f32) {
        self.data.fill(v);
    }

    /// Copy the contents of `src` into this tensor's buffer.
    ///
    /// Fails if shapes differ. Used by the checkpoint loader to overwrite
    /// parameter values in place.
    pub fn copy_from(&mut self, src: &Tensor) -> Result<()> {
        if !self.same_shape(src) {
            return Err(Error::ShapeMismatch {
                op: "copy_from",
                lhs: self.shape(),
                rhs: src.shape(),
            });
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Human-readable shape, e.g. `"(3, 4)"`, for error messages and logs.
    pub fn shape_str(&self) -> String {
        format!("({}, {})", self.rows, self.cols)
    }
}

impl Index<(usize, usize)> for Tensor {
    type Output = f32;

    fn index(&self, (r, c): (usize, usize)) -> &f32 {
        assert!(r < self.rows && c < self.cols, "index ({r}, {c}) out of bounds");
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Tensor {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f32 {
        assert!(r < self.rows && c < self.cols, "index ({r}, {c}) out of bounds");
        &mut self.data[r * self.cols + c]
    }
}
