//! # stoat-core
//!
//! The numeric foundation of stoat: a dense row-major 2-D tensor and the
//! pure math kernels every higher layer builds on.
//!
//! This crate provides:
//! - [`Tensor`] — an exclusively-owned `rows × cols` buffer of `f32`
//! - [`math`] — shape-checked kernels (matmul, elementwise ops, reductions,
//!   activations and their hand-written derivatives)
//! - [`Error`] / [`Result`] — the single error type used across the workspace
//!
//! Everything here is synchronous and allocation-per-result: kernels read
//! their operands and write a freshly allocated output. The one exception to
//! single-threaded execution is [`math::matmul`], which parallelizes over
//! disjoint output rows with rayon.

pub mod error;
pub mod math;
pub mod tensor;

pub use error::{Error, Result};
pub use tensor::Tensor;
