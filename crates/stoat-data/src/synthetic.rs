use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use stoat_core::Tensor;

// Synthetic datasets for demos and smoke tests

/// Isotropic Gaussian blobs for multi-class classification.
///
/// Returns `(x, y)` where `x` is `[samples, features]` and `y` is a one-hot
/// `[samples, centers]` matrix. Cluster centers are drawn uniformly from
/// `[-10, 10]` per coordinate; each sample picks a class uniformly and adds
/// Gaussian noise with standard deviation `cluster_std` around its center.
///
/// # Example
/// ```
/// use stoat_data::make_blobs;
///
/// let (x, y) = make_blobs(100, 2, 3, 1.0, 42);
/// assert_eq!(x.shape(), (100, 2));
/// assert_eq!(y.shape(), (100, 3));
/// ```
pub fn make_blobs(
    samples: usize,
    features: usize,
    centers: usize,
    cluster_std: f32,
    seed: u64,
) -> (Tensor, Tensor) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut center_coords = vec![0.0f32; centers * features];
    for c in center_coords.iter_mut() {
        *c = rng.gen_range(-10.0..10.0);
    }

    let mut x = Tensor::zeros(samples, features);
    let mut y = Tensor::zeros(samples, centers);
    for i in 0..samples {
        let class = rng.gen_range(0..centers);
        for f in 0..features {
            let center = center_coords[class * features + f];
            let noise: f32 = rng.sample(StandardNormal);
            x[(i, f)] = center + cluster_std * noise;
        }
        y[(i, class)] = 1.0;
    }
    (x, y)
}

/// The four XOR input rows with one-column targets.
///
/// Handy for checking that a network with a hidden layer can learn a
/// non-linearly-separable function.
pub fn xor_dataset() -> (Tensor, Tensor) {
    let x = Tensor::from_vec(4, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0])
        .expect("4x2 literal");
    let y = Tensor::from_vec(4, 1, vec![0.0, 1.0, 1.0, 0.0]).expect("4x1 literal");
    (x, y)
}
