use stoat_core::{Result, Tensor};

use crate::module::{Module, NamedParam, Param};

// Sequential — a chain of modules applied one after another
//
// Owns its children exclusively (boxed, dropped with the container).
// Forward threads the input through children in order; backward threads
// the gradient through them in reverse. Parameter names get the child's
// list index prepended ("0.W", "0.b", "1.W", ...) so a checkpoint written
// from one Sequential maps unambiguously onto another with the same
// architecture.

/// A container that chains modules sequentially.
///
/// # Example
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use stoat_nn::{Dense, Module, ReLU, Sequential};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let model = Sequential::new()
///     .add(Dense::new(2, 8, &mut rng))
///     .add(ReLU::new())
///     .add(Dense::new(8, 1, &mut rng));
/// assert_eq!(model.len(), 3);
/// ```
#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Module>>,
}

impl Sequential {
    /// Create an empty Sequential.
    pub fn new() -> Self {
        Sequential { layers: Vec::new() }
    }

    /// Add a layer to the end of the chain. Returns self for chaining.
    #[allow(clippy::should_implement_trait)]
    pub fn add<M: Module + 'static>(mut self, module: M) -> Self {
        self.layers.push(Box::new(module));
        self
    }

    /// Number of child layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Module for Sequential {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        let mut out = x.clone();
        for layer in &mut self.layers {
            out = layer.forward(&out)?;
        }
        Ok(out)
    }

    fn backward(&mut self, grad_out: &Tensor) -> Result<Tensor> {
        let mut grad = grad_out.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
        }
        Ok(grad)
    }

    fn named_parameters(&self) -> Vec<NamedParam<'_>> {
        let mut named = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            for p in layer.named_parameters() {
                named.push(NamedParam {
                    name: format!("{i}.{}", p.name),
                    value: p.value,
                    grad: p.grad,
                });
            }
        }
        named
    }

    fn named_parameters_mut(&mut self) -> Vec<Param<'_>> {
        let mut named = Vec::new();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            for p in layer.named_parameters_mut() {
                named.push(Param {
                    name: format!("{i}.{}", p.name),
                    value: p.value,
                    grad: p.grad,
                });
            }
        }
        named
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dense, ReLU};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mlp() -> Sequential {
        let mut rng = StdRng::seed_from_u64(3);
        Sequential::new()
            .add(Dense::new(4, 8, &mut rng))
            .add(ReLU::new())
            .add(Dense::new(8, 2, &mut rng))
    }

    #[test]
    fn test_forward_backward_shapes() {
        let mut model = mlp();
        let x = Tensor::ones(5, 4);
        let y = model.forward(&x).unwrap();
        assert_eq!(y.shape(), (5, 2));

        let dx = model.backward(&Tensor::ones(5, 2)).unwrap();
        assert_eq!(dx.shape(), (5, 4));
    }

    #[test]
    fn test_named_parameters_are_index_prefixed() {
        let model = mlp();
        let names: Vec<String> = model
            .named_parameters()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["0.W", "0.b", "2.W", "2.b"]);
    }

    #[test]
    fn test_mut_order_matches_shared_order() {
        let mut model = mlp();
        let shared: Vec<String> = model
            .named_parameters()
            .into_iter()
            .map(|p| p.name)
            .collect();
        let muts: Vec<String> = model
            .named_parameters_mut()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(shared, muts);
    }

    #[test]
    fn test_backward_error_propagates() {
        let mut model = mlp();
        // No forward yet: innermost layer reports the stale cache.
        assert!(model.backward(&Tensor::ones(5, 2)).is_err());
    }
}
