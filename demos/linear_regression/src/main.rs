// Linear Regression Demo — recovering y = 2x + 1 with a single Dense layer.
//
// No hidden layer, no activation: Dense(1,1) IS the affine function
// w*x + b, so after training the layer's weight and bias should land on
// the true slope and intercept. This is the smallest possible end-to-end
// check of the mse_loss / backward / SGD loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use stoat::prelude::*;

const TRUE_W: f32 = 2.0;
const TRUE_B: f32 = 1.0;

fn main() -> stoat::Result<()> {
    println!("=== Stoat — Linear Regression Demo ===");
    println!();

    // 1. Synthetic data: y = 2x + 1 plus a little Gaussian noise.
    let mut rng = StdRng::seed_from_u64(7);
    let n = 64;
    let mut x = Tensor::zeros(n, 1);
    let mut y = Tensor::zeros(n, 1);
    for i in 0..n {
        let xv: f32 = rng.gen_range(-2.0..2.0);
        let noise: f32 = rng.sample(StandardNormal);
        x[(i, 0)] = xv;
        y[(i, 0)] = TRUE_W * xv + TRUE_B + 0.05 * noise;
    }
    println!("Data: {n} samples of y = {TRUE_W}x + {TRUE_B} (+ noise)");
    println!();

    // 2. Model: one Dense(1,1), i.e. exactly w*x + b.
    let mut model = Sequential::new().add(Dense::new(1, 1, &mut rng));
    let mut optimizer = Sgd::new(0.1);
    println!("Network: Dense(1→1)");
    println!("Optimizer: SGD (lr=0.1)");
    println!();

    // 3. Training loop.
    let epochs = 200;
    println!("Training for {epochs} epochs...");
    println!("{:-<50}", "");

    for epoch in 0..epochs {
        let pred = model.forward(&x)?;
        let (loss, grad) = mse_loss(&pred, &y)?;

        optimizer.zero_grad(&mut model.named_parameters_mut());
        model.backward(&grad)?;
        optimizer.step(&mut model.named_parameters_mut());

        if epoch % 20 == 0 || epoch == epochs - 1 {
            println!("  Epoch {:>3} | Loss: {:.6}", epoch, loss);
        }
    }

    println!("{:-<50}", "");
    println!();

    // 4. The learned parameters should match the true line.
    let params = model.named_parameters();
    let w = params[0].value[(0, 0)];
    let b = params[1].value[(0, 0)];
    println!("Learned: w = {w:.4} (expected {TRUE_W}), b = {b:.4} (expected {TRUE_B})");

    println!();
    println!("=== Done! ===");
    Ok(())
}
