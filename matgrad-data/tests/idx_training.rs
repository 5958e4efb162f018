use matgrad_core::nn::{Linear, Module, ReLU, Sequential};
use matgrad_core::utils::testing::seeded_rng;
use matgrad_core::Graph;
use matgrad_data::{DataError, Dataset, IdxDataset, RandomSampler, Sampler};
use matgrad_optim::{Optimizer, Sgd};
use std::fs;
use std::path::PathBuf;

/// Two classes of 3x3 images: a bright top row (class 0) or a bright bottom
/// row (class 1).
fn write_idx_files(dir: &PathBuf, n: usize) -> (PathBuf, PathBuf) {
    let mut images = Vec::new();
    for v in [0x0803u32, n as u32, 3, 3] {
        images.extend_from_slice(&v.to_be_bytes());
    }
    let mut labels = Vec::new();
    for v in [0x0801u32, n as u32] {
        labels.extend_from_slice(&v.to_be_bytes());
    }
    for i in 0..n {
        let class = (i % 2) as u8;
        for row in 0..3 {
            let bright = (class == 0 && row == 0) || (class == 1 && row == 2);
            for _ in 0..3 {
                images.push(if bright { 255 } else { 20 });
            }
        }
        labels.push(class);
    }
    let images_path = dir.join("images.idx3-ubyte");
    let labels_path = dir.join("labels.idx1-ubyte");
    fs::write(&images_path, images).expect("write images");
    fs::write(&labels_path, labels).expect("write labels");
    (images_path, labels_path)
}

#[test]
fn open_missing_file_reports_io_error() {
    let err = IdxDataset::open("/nonexistent/images", "/nonexistent/labels", None).unwrap_err();
    assert!(matches!(err, DataError::Io { stream: "images", .. }));
}

#[test]
fn train_on_idx_files() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = std::env::temp_dir().join(format!("matgrad-data-test-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let (images_path, labels_path) = write_idx_files(&dir, 40);

    let dataset = IdxDataset::open(&images_path, &labels_path, Some(32))?;
    assert_eq!(dataset.len(), 32);
    assert_eq!(dataset.image_size(), 9);

    let mut rng = seeded_rng(5);
    let mut graph = Graph::<f64>::new();
    let l1 = Linear::new(&mut graph, 9, 6, true, &mut rng)?;
    let l2 = Linear::new(&mut graph, 6, 2, true, &mut rng)?;
    let model: Sequential<f64> = Sequential::new().with(l1).with(ReLU::new()).with(l2);
    let params = model.parameters();
    let mut optim = Sgd::new(0.5)?;
    let sampler = RandomSampler::seeded(false, None, 9);
    let checkpoint = graph.checkpoint();

    let mut epoch_losses = Vec::new();
    for _ in 0..30 {
        let order: Vec<usize> = sampler.iter(dataset.len()).collect();
        let mut total = 0.0;
        for chunk in order.chunks(8) {
            let (images, labels) = dataset.gather::<f64>(chunk)?;
            optim.zero_grad(&mut graph, &params)?;
            let x = graph.tensor(images);
            let logits = model.forward(&mut graph, x)?;
            let lp = graph.log_softmax(logits)?;
            let loss = graph.nll_loss(lp, &labels)?;
            graph.backward(loss)?;
            total += graph.item(loss)?;
            optim.step(&mut graph, &params)?;
            graph.release(checkpoint)?;
        }
        epoch_losses.push(total / 4.0);
    }
    fs::remove_dir_all(&dir)?;

    let first = epoch_losses[0];
    let last = epoch_losses[epoch_losses.len() - 1];
    assert!(last < first * 0.5, "loss {} -> {}", first, last);
    Ok(())
}
