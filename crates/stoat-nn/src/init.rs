use rand::Rng;

use stoat_core::Tensor;

// Weight initialization
//
// Both schemes draw from a uniform distribution whose limit is sized to keep
// activation variance roughly constant across layers. He is the default
// (matched to ReLU); Xavier balances fan-in and fan-out for symmetric
// activations like sigmoid.

/// Weight initialization scheme for [`Dense`](crate::Dense) layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    /// He (Kaiming) uniform: `U(-limit, limit)` with `limit = sqrt(6 / fan_in)`.
    #[default]
    HeUniform,
    /// Xavier (Glorot) uniform: `limit = sqrt(6 / (fan_in + fan_out))`.
    XavierUniform,
}

/// Build an `[fan_in, fan_out]` weight matrix from He-uniform draws.
pub fn he_uniform(fan_in: usize, fan_out: usize, rng: &mut impl Rng) -> Tensor {
    let limit = (6.0 / fan_in as f32).sqrt();
    uniform(fan_in, fan_out, limit, rng)
}

/// Build an `[fan_in, fan_out]` weight matrix from Xavier-uniform draws.
pub fn xavier_uniform(fan_in: usize, fan_out: usize, rng: &mut impl Rng) -> Tensor {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    uniform(fan_in, fan_out, limit, rng)
}

fn uniform(rows: usize, cols: usize, limit: f32, rng: &mut impl Rng) -> Tensor {
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(-limit..limit))
        .collect();
    Tensor::from_vec(rows, cols, data).expect("one draw per element")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_he_uniform_within_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = he_uniform(24, 8, &mut rng);
        let limit = (6.0f32 / 24.0).sqrt();
        assert_eq!(w.shape(), (24, 8));
        assert!(w.data().iter().all(|&v| v.abs() <= limit));
        // Not degenerate
        assert!(w.data().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_xavier_uniform_within_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = xavier_uniform(10, 14, &mut rng);
        let limit = (6.0f32 / 24.0).sqrt();
        assert!(w.data().iter().all(|&v| v.abs() <= limit));
    }

    #[test]
    fn test_seed_reproducibility() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(he_uniform(4, 4, &mut a), he_uniform(4, 4, &mut b));
    }
}
