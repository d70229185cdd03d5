//! Demo training pass over synthetic random data
//!
//! Generates a fixed number of random image tensors with random labels, runs
//! a few epochs of Adam on cross-entropy, persists the resulting artifact
//! and swaps the trained model into the cached handle. The resulting weights
//! have no relation to real pest classification accuracy.

use std::path::Path;

use burn::{
    module::Module,
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    record::CompactRecorder,
    tensor::{Distribution, ElementConversion, Int, Tensor, TensorData},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{default_device, TrainingBackend};
use crate::model::artifact::ArtifactPaths;
use crate::provider::ClassifierHandle;
use crate::utils::error::{PestVisionError, Result};
use crate::{DEMO_EPOCHS, DEMO_SAMPLES, NUM_CLASSES};

/// Learning rate for the demo optimizer
const DEMO_LEARNING_RATE: f64 = 1e-3;

/// Diagnostics from one demo training pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoTrainingReport {
    /// Number of epochs run
    pub epochs: usize,

    /// Number of synthetic samples used
    pub samples: usize,

    /// Average cross-entropy loss per epoch
    pub epoch_losses: Vec<f64>,

    /// Training accuracy per epoch (diagnostic only, data is random)
    pub epoch_accuracies: Vec<f64>,

    /// Reminder that this run proves nothing about real accuracy
    pub note: String,
}

/// Run the demo training pass on the cached classifier.
///
/// Trains on `DEMO_SAMPLES` random tensors for `DEMO_EPOCHS` epochs, saves
/// the artifact (weights + metadata) to `model_dir`, overwriting any prior
/// one, and replaces the model inside the handle so the predictor serves the
/// updated weights immediately. A `seed` can be supplied to make the random
/// labels reproducible.
pub fn train_demo(
    handle: &ClassifierHandle,
    model_dir: &Path,
    seed: Option<u64>,
) -> Result<DemoTrainingReport> {
    let device = default_device();
    let image_size = handle.metadata.image_size;

    info!(
        "Starting demo training: {} random samples, {} epochs (illustrative only)",
        DEMO_SAMPLES, DEMO_EPOCHS
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Synthetic dataset: uniform random pixels, uniform random labels
    let images = Tensor::<TrainingBackend, 4>::random(
        [DEMO_SAMPLES, 3, image_size, image_size],
        Distribution::Uniform(0.0, 1.0),
        &device,
    );
    let labels: Vec<i64> = (0..DEMO_SAMPLES)
        .map(|_| rng.gen_range(0..NUM_CLASSES) as i64)
        .collect();
    let targets =
        Tensor::<TrainingBackend, 1, Int>::from_data(TensorData::new(labels, [DEMO_SAMPLES]), &device);

    let mut model = handle.model();
    let mut optimizer = AdamConfig::new().init();

    let mut epoch_losses = Vec::with_capacity(DEMO_EPOCHS);
    let mut epoch_accuracies = Vec::with_capacity(DEMO_EPOCHS);

    for epoch in 0..DEMO_EPOCHS {
        // Forward pass over the full synthetic batch
        let logits = model.forward(images.clone());

        let loss = CrossEntropyLossConfig::new()
            .init(&device)
            .forward(logits.clone(), targets.clone());
        let loss_value: f64 = loss.clone().into_scalar().elem();

        // Accuracy is a diagnostic only; the labels are random
        let predictions = logits.argmax(1).squeeze::<1>(1);
        let correct: i64 = predictions
            .equal(targets.clone())
            .int()
            .sum()
            .into_scalar()
            .elem();
        let accuracy = correct as f64 / DEMO_SAMPLES as f64;

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optimizer.step(DEMO_LEARNING_RATE, model, grads);

        info!(
            "Demo epoch {}/{}: loss = {:.4}, accuracy = {:.2}%",
            epoch + 1,
            DEMO_EPOCHS,
            loss_value,
            accuracy * 100.0
        );

        epoch_losses.push(loss_value);
        epoch_accuracies.push(accuracy);
    }

    // Persist the artifact, overwriting any prior one
    std::fs::create_dir_all(model_dir)?;
    let paths = ArtifactPaths::new(model_dir);
    model
        .clone()
        .save_file(paths.stem().to_path_buf(), &CompactRecorder::new())
        .map_err(|e| PestVisionError::Training(format!("failed to save artifact: {:?}", e)))?;
    handle.metadata.save(&paths.metadata)?;

    // Make the trained weights visible to the predictor
    handle.replace(model);

    info!("Demo model trained and saved to {:?}", paths.weights);

    Ok(DemoTrainingReport {
        epochs: DEMO_EPOCHS,
        samples: DEMO_SAMPLES,
        epoch_losses,
        epoch_accuracies,
        note: "Trained on random demo data; predictions carry no real-world meaning".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::{ArtifactMetadata, NormalizationPolicy};
    use crate::model::cnn::{PestClassifier, PestClassifierConfig};
    use crate::provider::ModelProvider;
    use std::sync::Arc;

    /// Small input size keeps the synthetic forward/backward passes fast
    fn small_handle() -> ClassifierHandle {
        let device = default_device();
        let config = PestClassifierConfig::new().with_input_size(32);
        let metadata = ArtifactMetadata {
            image_size: 32,
            ..Default::default()
        };
        ClassifierHandle::new(PestClassifier::new(&config, &device), metadata)
    }

    #[test]
    fn test_demo_training_reports_fixed_counts() {
        let dir = tempfile::tempdir().unwrap();
        let handle = small_handle();

        let report = train_demo(&handle, dir.path(), Some(42)).unwrap();

        assert_eq!(report.epochs, DEMO_EPOCHS);
        assert_eq!(report.samples, DEMO_SAMPLES);
        assert_eq!(report.epoch_losses.len(), DEMO_EPOCHS);
        assert_eq!(report.epoch_accuracies.len(), DEMO_EPOCHS);
        assert!(report
            .epoch_accuracies
            .iter()
            .all(|&a| (0.0..=1.0).contains(&a)));
    }

    #[test]
    fn test_demo_training_persists_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let handle = small_handle();
        let paths = ArtifactPaths::new(dir.path());
        assert!(!paths.weights_exist());

        train_demo(&handle, dir.path(), Some(7)).unwrap();

        assert!(paths.weights_exist());
        assert!(paths.metadata.exists());
    }

    #[test]
    fn test_provider_loads_trained_artifact_on_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        let handle = small_handle();
        train_demo(&handle, dir.path(), Some(7)).unwrap();

        // Simulates a fresh process pointing at the same model directory
        let provider = ModelProvider::new(dir.path());
        let loaded = provider.get_or_init(&default_device()).unwrap();

        assert_eq!(loaded.metadata.image_size, 32);
        assert_eq!(
            loaded.metadata.normalization,
            NormalizationPolicy::ZeroToOne
        );
        assert_eq!(loaded.model().num_classes(), NUM_CLASSES);
        // The cached handle is still per-provider
        let again = provider.get_or_init(&default_device()).unwrap();
        assert!(Arc::ptr_eq(&loaded, &again));
    }
}
