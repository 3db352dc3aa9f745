use stoat_core::{Result, Tensor};

// Module trait — the interface every layer implements
//
// The contract is three capabilities: forward, backward, and parameter
// listing. Backward is manual — each layer hand-writes its own derivative
// and ACCUMULATES into its gradient buffers (`dw += ...`), never
// overwrites. That is what lets a caller run several forward/backward
// cycles to build up a combined gradient before one optimizer step; the
// optimizer's `zero_grad` is the explicit reset between logical steps.
//
// Parameters are exposed as borrowed handles, never owned: `Param` holds
// `&mut` references into the layer's own tensors, so a handle cannot
// outlive its layer and the optimizer's in-place updates are immediately
// visible to the next forward pass.

/// A mutable, non-owning handle to one trainable parameter: its value
/// tensor paired with its gradient accumulator.
///
/// Invariant: `value` and `grad` always share a shape.
pub struct Param<'a> {
    /// Name of the parameter within its layer (e.g. `"W"`, or `"0.W"` once
    /// a Sequential has prefixed the child index).
    pub name: String,
    /// The trainable value, updated in place by optimizers.
    pub value: &'a mut Tensor,
    /// The gradient accumulator, zeroed by `zero_grad` and added into by
    /// `backward`.
    pub grad: &'a mut Tensor,
}

/// A read-only view of a named parameter, used for checkpoint save and
/// parameter counting.
pub struct NamedParam<'a> {
    pub name: String,
    pub value: &'a Tensor,
    pub grad: &'a Tensor,
}

/// The capability contract implemented by every layer and by [`Sequential`].
///
/// [`Sequential`]: crate::Sequential
///
/// # State model
/// A module alternates between "awaiting backward" (after a forward
/// populated its cache) and "awaiting forward". Backward consumes the
/// cache; calling it again without a fresh forward is an
/// [`Error::BackwardBeforeForward`](stoat_core::Error::BackwardBeforeForward).
pub trait Module {
    /// Compute the output for `x`, caching whatever the next `backward`
    /// will need.
    fn forward(&mut self, x: &Tensor) -> Result<Tensor>;

    /// Given the loss gradient with respect to this module's output,
    /// accumulate parameter gradients and return the gradient with respect
    /// to the module's input.
    fn backward(&mut self, grad_out: &Tensor) -> Result<Tensor>;

    /// Read-only views of the trainable parameters, in a fixed traversal
    /// order. Empty for parameter-free layers.
    fn named_parameters(&self) -> Vec<NamedParam<'_>> {
        Vec::new()
    }

    /// Mutable handles to the trainable parameters, in the same order as
    /// [`named_parameters`](Module::named_parameters).
    fn named_parameters_mut(&mut self) -> Vec<Param<'_>> {
        Vec::new()
    }

    /// Total number of scalar parameters in this module.
    fn num_parameters(&self) -> usize {
        self.named_parameters()
            .iter()
            .map(|p| p.value.elem_count())
            .sum()
    }
}
