//! Trains a 784-128-10 MLP on MNIST-style IDX files.
//!
//! ```text
//! RUST_LOG=info cargo run -p matgrad-data --example train_idx -- \
//!     train-images.idx3-ubyte train-labels.idx1-ubyte [t10k-images.idx3-ubyte t10k-labels.idx1-ubyte]
//! ```

use log::info;
use matgrad_core::nn::{Linear, Module, ReLU, Sequential};
use matgrad_core::{Graph, Matrix};
use matgrad_data::{Dataset, IdxDataset, RandomSampler, Sampler};
use matgrad_optim::{Optimizer, Sgd};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;

const EPOCHS: usize = 5;
const BATCH_SIZE: usize = 64;
const LEARNING_RATE: f32 = 0.01;
const TRAIN_SAMPLES: usize = 10_000;
const TEST_SAMPLES: usize = 1_000;

/// Number of columns whose largest entry sits at the target row.
fn count_correct(logits: &Matrix<f32>, targets: &[usize]) -> usize {
    targets
        .iter()
        .enumerate()
        .filter(|&(sample, &target)| {
            let column = logits.column(sample);
            let predicted = column
                .iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |best, (row, &v)| if v > best.1 { (row, v) } else { best })
                .0;
            predicted == target
        })
        .count()
}

fn evaluate(graph: &mut Graph<f32>, model: &Sequential<f32>, dataset: &IdxDataset) -> Result<f32, Box<dyn Error>> {
    let checkpoint = graph.checkpoint();
    let mut correct = 0;
    let mut offset = 0;
    while offset < dataset.len() {
        let (images, labels) = dataset.get_batch::<f32>(100, offset)?;
        let x = graph.tensor(images);
        let logits = model.forward(graph, x)?;
        correct += count_correct(graph.value(logits)?, &labels);
        offset += labels.len();
        graph.release(checkpoint)?;
    }
    Ok(100.0 * correct as f32 / dataset.len() as f32)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 2 && args.len() != 4 {
        eprintln!("usage: train_idx <train-images> <train-labels> [<test-images> <test-labels>]");
        std::process::exit(2);
    }

    let train = IdxDataset::open(&args[0], &args[1], Some(TRAIN_SAMPLES))?;
    let test = match args.get(2..4) {
        Some([images, labels]) => Some(IdxDataset::open(images, labels, Some(TEST_SAMPLES))?),
        _ => None,
    };

    let mut rng = StdRng::seed_from_u64(0);
    let mut graph = Graph::<f32>::new();
    let fc1 = Linear::new(&mut graph, train.image_size(), 128, true, &mut rng)?;
    let fc2 = Linear::new(&mut graph, 128, 10, true, &mut rng)?;
    let model: Sequential<f32> = Sequential::new().with(fc1).with(ReLU::new()).with(fc2);
    let params = model.parameters();
    let mut optimizer = Sgd::new(LEARNING_RATE)?;
    let sampler = RandomSampler::seeded(false, None, 0);
    let checkpoint = graph.checkpoint();

    for epoch in 1..=EPOCHS {
        let order: Vec<usize> = sampler.iter(train.len()).collect();
        let mut epoch_loss = 0.0;
        let mut correct = 0;
        let mut batches = 0;
        for chunk in order.chunks(BATCH_SIZE) {
            let (images, labels) = train.gather::<f32>(chunk)?;
            optimizer.zero_grad(&mut graph, &params)?;
            let x = graph.tensor(images);
            let logits = model.forward(&mut graph, x)?;
            let log_probs = graph.log_softmax(logits)?;
            let loss = graph.nll_loss(log_probs, &labels)?;
            graph.backward(loss)?;
            optimizer.step(&mut graph, &params)?;

            epoch_loss += graph.item(loss)?;
            correct += count_correct(graph.value(logits)?, &labels);
            batches += 1;
            graph.release(checkpoint)?;
        }
        info!(
            "Epoch {}/{}, Loss: {:.4}, Train Accuracy: {:.2}%",
            epoch,
            EPOCHS,
            epoch_loss / batches as f32,
            100.0 * correct as f32 / train.len() as f32
        );
        if let Some(test) = &test {
            info!("Test Accuracy: {:.2}%", evaluate(&mut graph, &model, test)?);
        }
    }
    Ok(())
}
