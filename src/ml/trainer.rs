// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop with Adam, per-epoch validation F1 and patience
// based early stopping.
//
//   - Training uses TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() gives the same model on the inner backend,
//     where batch norm uses its running statistics
//   - One fresh permutation of the training store per epoch
//   - Parameter updates are strictly sequential, one mini-batch
//     at a time
//
// Backend errors and NaN losses are not intercepted.

use anyhow::{ensure, Result};
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::EegBatcher, store::SampleStore};
use crate::domain::{error::DataResult, sample::SampleRef, traits::SampleSource};
use crate::infra::{
    checkpoint::{CheckpointInfo, CheckpointManager, BEST_MODEL, BEST_OPTIMIZER},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{early_stopping::EarlyStopping, evaluator, model::SeizureNet};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// What a training run leaves behind
#[derive(Debug)]
pub struct TrainOutcome<B: Backend> {
    /// Parameters of the last checkpoint, or the final running
    /// model when no epoch was ever checkpointed
    pub model:   SeizureNet<B>,
    pub best:    Option<CheckpointInfo>,
    pub history: Vec<EpochMetrics>,
}

/// The classifier has two outputs, so every label must be 0 or 1.
pub fn ensure_binary_labels(store: &SampleStore) -> Result<()> {
    let bad: Vec<i32> = store
        .label_counts()
        .into_iter()
        .map(|(label, _)| label)
        .filter(|label| !(0..=1).contains(label))
        .collect();
    ensure!(bad.is_empty(), "labels must be 0 or 1 for training, found {:?}", bad);
    Ok(())
}

/// Build the model (optionally warm-started) and train on the GPU backend.
pub fn run_training(
    cfg:   &TrainConfig,
    train: &SampleStore,
    val:   &SampleStore,
    ckpt:  &CheckpointManager,
) -> Result<TrainOutcome<TrainBackend>> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    let model: SeizureNet<TrainBackend> = cfg.model_config().init(&device);
    let model = match &cfg.init_from {
        Some(dir) => {
            tracing::info!("Warm start from '{}'", dir);
            CheckpointManager::new(dir)?.load_model(model, BEST_MODEL, &device)?
        }
        None => model,
    };

    let logger = MetricsLogger::new(ckpt.dir())?;
    let outcome = train_loop(cfg, model, train, val, ckpt, Some(&logger), device)?;
    tracing::info!("Per-epoch metrics in '{}'", logger.csv_path().display());
    Ok(outcome)
}

/// Train `model` until patience runs out or `cfg.epochs` is reached.
pub fn train_loop<B: AutodiffBackend>(
    cfg:    &TrainConfig,
    model:  SeizureNet<B>,
    train:  &SampleStore,
    val:    &SampleStore,
    ckpt:   &CheckpointManager,
    logger: Option<&MetricsLogger>,
    device: B::Device,
) -> Result<TrainOutcome<B>> {
    ensure!(cfg.batch_size > 0, "batch size must be positive");
    ensure_binary_labels(train)?;
    ensure_binary_labels(val)?;
    ensure!(
        train.channel_dim() == cfg.in_channels,
        "training archive has {} channels, config expects {}",
        train.channel_dim(),
        cfg.in_channels
    );
    let positions = cfg.model_config().positions_per_sample(train.time_dim());
    ensure!(positions > 0, "samples of length {} are too short for the model", train.time_dim());

    let mut model = model;
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init::<B, SeizureNet<B>>();
    let batcher = EegBatcher::<B>::new(device.clone()).with_positions(positions);

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut stopper = EarlyStopping::new(cfg.patience);
    let mut best: Option<(SeizureNet<B>, CheckpointInfo)> = None;
    let mut history = Vec::new();

    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut order: Vec<usize> = (0..train.len()).collect();
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for chunk in order.chunks(cfg.batch_size) {
            let items = train.permuted(chunk).collect::<DataResult<Vec<SampleRef<'_>>>>()?;
            let batch = batcher.batch(&items);

            let (loss, _) = model.forward_loss(batch.inputs, batch.targets);
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        let metrics = evaluator::evaluate(&model.valid(), val, cfg.batch_size, positions, &device)?;

        let decision = stopper.observe(metrics.f1);
        if decision.improved {
            tracing::debug!("New best validation F1 {:.4}", metrics.f1);
        }
        tracing::info!(
            "Epoch {}, Train Loss = {:.6}, Validation F1 = {:.4}, Precision = {:.4}, Recall = {:.4}, FPR = {:.4}",
            epoch, train_loss, metrics.f1, metrics.precision, metrics.recall, metrics.fpr,
        );

        if decision.checkpoint {
            let info = CheckpointInfo { epoch, f1: metrics.f1 };
            ckpt.save_model(&model, BEST_MODEL)?;
            ckpt.save_record::<B, _>(optim.to_record(), BEST_OPTIMIZER)?;
            ckpt.write_info(&info)?;
            tracing::info!("Checkpoint saved for epoch {} (patience left {})", epoch, stopper.remaining());
            best = Some((model.clone(), info));
        }

        let row = EpochMetrics::new(epoch, train_loss, metrics, decision.checkpoint);
        if let Some(logger) = logger {
            logger.log(&row)?;
        }
        history.push(row);

        if decision.stop {
            tracing::info!("Early stopping after epoch {} (best F1 {:.4})", epoch, stopper.best_f1());
            break;
        }
    }

    tracing::info!("Training complete!");
    Ok(match best {
        Some((model, info)) => TrainOutcome { model, best: Some(info), history },
        None => TrainOutcome { model, best: None, history },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archive::Archive;
    use crate::domain::sample::Matrix;
    use crate::ml::model::tests::tiny_config;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    /// Class 1 samples are a constant +1 signal, class 0 are −1.
    fn separable_store(labels: &[i32]) -> SampleStore {
        let samples = labels
            .iter()
            .map(|&l| {
                let v = if l == 1 { 1.0 } else { -1.0 };
                Matrix::new(2, 64, vec![v; 128]).unwrap()
            })
            .collect();
        SampleStore::from_archive(Archive::new(samples, Some(labels.to_vec())).unwrap())
    }

    fn tiny_train_config(epochs: usize, patience: usize) -> TrainConfig {
        let model = tiny_config(2);
        TrainConfig {
            in_channels: 2,
            time_dim:    64,
            n_filters:   model.n_filters,
            head_hidden: model.head_hidden,
            head_kernel: model.head_kernel,
            batch_size:  4,
            epochs,
            patience,
            lr:          1e-3,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_runs_and_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let device = Default::default();

        let cfg = tiny_train_config(3, 5);
        let train = separable_store(&[0, 1, 0, 1, 0, 1, 0, 1]);
        let val = separable_store(&[0, 1, 1, 0]);
        let model: SeizureNet<TestBackend> = cfg.model_config().init(&device);

        let outcome = train_loop(&cfg, model, &train, &val, &ckpt, Some(&logger), device).unwrap();

        assert!(!outcome.history.is_empty() && outcome.history.len() <= 3);
        // epoch 1 always checkpoints: its F1 either beats 0 or equals it
        assert!(outcome.history[0].checkpointed);
        assert!(outcome.best.is_some());
        assert!(dir.path().join("best_model.mpk").exists());
        assert!(dir.path().join("best_optimizer.mpk").exists());
        assert_eq!(ckpt.read_info().unwrap(), outcome.best.unwrap());

        let csv = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 1 + outcome.history.len());
    }

    #[test]
    fn test_patience_one_stops_after_first_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let cfg = tiny_train_config(10, 1);
        let train = separable_store(&[0, 1, 0, 1]);
        let val = separable_store(&[0, 1]);
        let model: SeizureNet<TestBackend> = cfg.model_config().init(&device);

        let outcome = train_loop(&cfg, model, &train, &val, &ckpt, None, device).unwrap();
        assert_eq!(outcome.history.len(), 1);
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let cfg = tiny_train_config(1, 1);
        let train = separable_store(&[0, 2]);
        let val = separable_store(&[0, 1]);
        let model: SeizureNet<TestBackend> = cfg.model_config().init(&device);

        let err = train_loop(&cfg, model, &train, &val, &ckpt, None, device).unwrap_err();
        assert!(err.to_string().contains("0 or 1"));
        assert!(ensure_binary_labels(&separable_store(&[-1, 0])).is_err());
        assert!(ensure_binary_labels(&separable_store(&[1, 0])).is_ok());
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let cfg = TrainConfig { in_channels: 3, ..tiny_train_config(1, 1) };
        let store = separable_store(&[0, 1]);
        let model: SeizureNet<TestBackend> = tiny_config(3).init(&device);
        assert!(train_loop(&cfg, model, &store, &store, &ckpt, None, device).is_err());
    }
}
