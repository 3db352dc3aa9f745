// Train / Save / Resume Demo — checkpoint a half-trained model, rebuild it
// from scratch, and continue training from the saved weights.
//
// Only parameter values live in the checkpoint. Optimizer moments restart
// fresh after a resume, which is visible as a small loss bump right after
// loading when the optimizer is Adam; with SGD the two halves line up
// exactly.

use rand::rngs::StdRng;
use rand::SeedableRng;

use stoat::prelude::*;

fn build_model(seed: u64) -> Sequential {
    let mut rng = StdRng::seed_from_u64(seed);
    Sequential::new()
        .add(Dense::new(2, 16, &mut rng))
        .add(ReLU::new())
        .add(Dense::new(16, 1, &mut rng))
}

fn train(
    model: &mut Sequential,
    optimizer: &mut Sgd,
    x: &Tensor,
    y: &Tensor,
    epochs: usize,
) -> stoat::Result<f32> {
    let mut last = 0.0;
    for epoch in 0..epochs {
        let logits = model.forward(x)?;
        let (loss, grad) = bce_with_logits(&logits, y)?;

        optimizer.zero_grad(&mut model.named_parameters_mut());
        model.backward(&grad)?;
        optimizer.step(&mut model.named_parameters_mut());

        last = loss;
        if epoch % 50 == 0 || epoch == epochs - 1 {
            println!("  Epoch {:>4} | Loss: {:.6}", epoch, loss);
        }
    }
    Ok(last)
}

fn main() -> stoat::Result<()> {
    println!("=== Stoat — Train / Save / Resume Demo ===");
    println!();

    let (x, y) = xor_dataset();
    let path = std::env::temp_dir().join("stoat_resume_demo.tnn");

    // 1. First half of training.
    println!("Phase 1: train 250 epochs, then save");
    println!("{:-<50}", "");
    let mut model = build_model(42);
    let mut optimizer = Sgd::new(0.5);
    let loss_at_save = train(&mut model, &mut optimizer, &x, &y, 250)?;
    println!("{:-<50}", "");

    model.save(&path)?;
    println!("Saved checkpoint to {}", path.display());
    println!();

    // 2. Fresh model, same architecture, different seed. Loading replaces
    //    its random weights with the saved ones.
    println!("Phase 2: rebuild, load, train 250 more epochs");
    println!("{:-<50}", "");
    let mut resumed = build_model(99);
    let loaded = resumed.load(&path)?;
    println!("  Loaded {loaded} parameters (loss was {loss_at_save:.6})");

    let mut optimizer = Sgd::new(0.5);
    let final_loss = train(&mut resumed, &mut optimizer, &x, &y, 250)?;
    println!("{:-<50}", "");
    println!();

    println!("Final loss after resume: {final_loss:.6}");
    std::fs::remove_file(&path).ok();

    println!();
    println!("=== Done! ===");
    Ok(())
}
