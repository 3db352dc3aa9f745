// Blob Classification Demo — mini-batch training on synthetic Gaussian
// clusters.
//
// Architecture: Input(2) → Dense(2,32) → ReLU → Dense(32,3) → logits
//
// This demo exercises the full pipeline: synthetic data generation, the
// shuffling DataLoader, softmax cross-entropy on logits, and SGD.

use rand::rngs::StdRng;
use rand::SeedableRng;

use stoat::prelude::*;

const CLASSES: usize = 3;

fn main() -> stoat::Result<()> {
    println!("=== Stoat — Blob Classification Demo ===");
    println!();

    // 1. Data: three well-separated Gaussian blobs in 2-D.
    let (x, y) = make_blobs(600, 2, CLASSES, 1.0, 7);
    let (x_test, y_test) = make_blobs(150, 2, CLASSES, 1.0, 7);
    let dataset = TensorDataset::new(x, y)?;
    let mut loader = DataLoader::new(dataset, 32, true, 123);
    println!("Data: 600 train / 150 test samples, {CLASSES} classes");
    println!("Batches per epoch: {}", loader.num_batches());
    println!();

    // 2. Model and optimizer.
    let mut rng = StdRng::seed_from_u64(42);
    let mut model = Sequential::new()
        .add(Dense::new(2, 32, &mut rng))
        .add(ReLU::new())
        .add(Dense::new(32, CLASSES, &mut rng));
    let mut optimizer = Sgd::new(0.05);
    println!("Network: Dense(2→32) → ReLU → Dense(32→{CLASSES})");
    println!("  Total parameters: {}", model.num_parameters());
    println!("Optimizer: SGD (lr=0.05)");
    println!();

    // 3. Training loop.
    let epochs = 30;
    println!("Training for {epochs} epochs...");
    println!("{:-<50}", "");

    for epoch in 0..epochs {
        loader.reset();
        let mut epoch_loss = 0.0;
        let mut batches = 0;

        while let Some((xb, yb)) = loader.next_batch()? {
            let logits = model.forward(&xb)?;
            let (loss, grad) = softmax_cross_entropy_with_logits(&logits, &yb)?;

            optimizer.zero_grad(&mut model.named_parameters_mut());
            model.backward(&grad)?;
            optimizer.step(&mut model.named_parameters_mut());

            epoch_loss += loss;
            batches += 1;
        }

        if epoch % 5 == 0 || epoch == epochs - 1 {
            println!(
                "  Epoch {:>3} | Avg loss: {:.6}",
                epoch,
                epoch_loss / batches as f32
            );
        }
    }

    println!("{:-<50}", "");
    println!();

    // 4. Evaluate on held-out samples.
    let logits = model.forward(&x_test)?;
    let mut correct = 0;
    for i in 0..x_test.rows() {
        if argmax_row(&logits, i) == argmax_row(&y_test, i) {
            correct += 1;
        }
    }
    println!(
        "Test accuracy: {}/{} ({:.1}%)",
        correct,
        x_test.rows(),
        100.0 * correct as f32 / x_test.rows() as f32
    );

    println!();
    println!("=== Done! ===");
    Ok(())
}

fn argmax_row(t: &Tensor, row: usize) -> usize {
    let mut best = 0;
    for c in 1..t.cols() {
        if t[(row, c)] > t[(row, best)] {
            best = c;
        }
    }
    best
}
