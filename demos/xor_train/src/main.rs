// XOR Training Demo — a two-layer MLP learns the classic non-linearly
// separable function.
//
// Architecture: Input(2) → Dense(2,16) → ReLU → Dense(16,1) → logit
//
// The loss is binary cross-entropy on the raw logit, so no Sigmoid layer is
// needed at the end of the network; we apply sigmoid only when printing
// predictions.

use rand::rngs::StdRng;
use rand::SeedableRng;

use stoat::prelude::*;

fn main() -> stoat::Result<()> {
    println!("=== Stoat — XOR Training Demo ===");
    println!();

    // 1. Training data: the four XOR rows.
    let (x, y) = xor_dataset();
    println!("Training data (XOR):");
    for i in 0..4 {
        println!("  ({},{}) → {}", x[(i, 0)], x[(i, 1)], y[(i, 0)]);
    }
    println!();

    // 2. Model.
    let mut rng = StdRng::seed_from_u64(42);
    let mut model = Sequential::new()
        .add(Dense::new(2, 16, &mut rng))
        .add(ReLU::new())
        .add(Dense::new(16, 1, &mut rng));
    println!("Network: Dense(2→16) → ReLU → Dense(16→1)");
    println!("  Total parameters: {}", model.num_parameters());
    println!();

    // 3. Optimizer.
    let mut optimizer = Adam::with_defaults(0.01);
    println!("Optimizer: Adam (lr=0.01, β1=0.9, β2=0.999)");
    println!();

    // 4. Training loop: full-batch, 500 epochs.
    let epochs = 500;
    println!("Training for {epochs} epochs...");
    println!("{:-<50}", "");

    for epoch in 0..epochs {
        let logits = model.forward(&x)?;
        let (loss, grad) = bce_with_logits(&logits, &y)?;

        optimizer.zero_grad(&mut model.named_parameters_mut());
        model.backward(&grad)?;
        optimizer.step(&mut model.named_parameters_mut());

        if epoch % 50 == 0 || epoch == epochs - 1 {
            println!("  Epoch {:>4} | Loss: {:.6}", epoch, loss);
        }
    }

    println!("{:-<50}", "");
    println!();

    // 5. Evaluate.
    println!("Predictions after training:");
    let logits = model.forward(&x)?;
    for i in 0..4 {
        let p = math::sigmoid_scalar(logits[(i, 0)]);
        let rounded = if p > 0.5 { 1.0 } else { 0.0 };
        let mark = if rounded == y[(i, 0)] { "✓" } else { "✗" };
        println!(
            "  ({},{}) → {:.4}  (rounded: {})  target: {}  {}",
            x[(i, 0)],
            x[(i, 1)],
            p,
            rounded as i32,
            y[(i, 0)] as i32,
            mark
        );
    }

    println!();
    println!("=== Done! ===");
    Ok(())
}
