//! Model Provider
//!
//! Produces a ready-to-use classifier and caches it for the lifetime of the
//! process. The cache is an explicit, mutex-guarded holder object owned by
//! whoever constructs the provider; there is no ambient global state.
//!
//! Load rules:
//! - weights file absent: construct a fresh, randomly initialized classifier
//!   (expected on first run, logged at warn level)
//! - weights file present: the metadata sidecar must exist, parse, and match
//!   the compiled-in label list, and the weights must deserialize; any
//!   failure here is a fatal `ArtifactCorrupt`-class error, never a silent
//!   fall back to a fresh model

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use burn::backend::ndarray::NdArrayDevice;
use burn::module::Module;
use burn::record::CompactRecorder;
use tracing::{info, warn};

use crate::backend::TrainingBackend;
use crate::model::artifact::{ArtifactMetadata, ArtifactPaths};
use crate::model::cnn::{PestClassifier, PestClassifierConfig};
use crate::utils::error::{PestVisionError, Result};
use crate::CLASS_NAMES;

/// The process-wide classifier handle.
///
/// The predictor only reads the model; the demo trainer is the sole writer.
pub struct ClassifierHandle {
    model: Mutex<PestClassifier<TrainingBackend>>,
    /// Metadata the artifact was persisted with (or defaults for a fresh model)
    pub metadata: ArtifactMetadata,
}

impl ClassifierHandle {
    pub fn new(model: PestClassifier<TrainingBackend>, metadata: ArtifactMetadata) -> Self {
        Self {
            model: Mutex::new(model),
            metadata,
        }
    }

    /// Clone out the current model. Burn modules share parameter storage,
    /// so this is cheap.
    pub fn model(&self) -> PestClassifier<TrainingBackend> {
        self.model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Swap in an updated model (called by the demo trainer after an
    /// optimization pass).
    pub fn replace(&self, model: PestClassifier<TrainingBackend>) {
        let mut guard = self
            .model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = model;
    }
}

/// Lazily initialized provider for the cached classifier handle
pub struct ModelProvider {
    paths: ArtifactPaths,
    model_dir: PathBuf,
    handle: Mutex<Option<Arc<ClassifierHandle>>>,
}

impl ModelProvider {
    /// Create a provider rooted at the given model directory.
    ///
    /// Nothing is loaded or constructed until `get_or_init` is called.
    pub fn new(model_dir: &Path) -> Self {
        Self {
            paths: ArtifactPaths::new(model_dir),
            model_dir: model_dir.to_path_buf(),
            handle: Mutex::new(None),
        }
    }

    /// Directory the artifact is persisted in
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Resolved artifact file locations
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Return the cached classifier handle, loading or constructing it on
    /// first use. Subsequent calls return the identical `Arc`.
    pub fn get_or_init(&self, device: &NdArrayDevice) -> Result<Arc<ClassifierHandle>> {
        let mut guard = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(handle) = guard.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(self.load_or_build(device)?);
        *guard = Some(Arc::clone(&handle));
        Ok(handle)
    }

    fn load_or_build(&self, device: &NdArrayDevice) -> Result<ClassifierHandle> {
        if self.paths.weights_exist() {
            self.load_artifact(device)
        } else {
            warn!(
                "No classifier artifact at {:?}; constructing a fresh randomly initialized model",
                self.paths.weights
            );
            let metadata = ArtifactMetadata::default();
            let config = PestClassifierConfig::new().with_input_size(metadata.image_size);
            check_output_width(&config, &metadata.labels)?;
            let model = PestClassifier::new(&config, device);
            Ok(ClassifierHandle::new(model, metadata))
        }
    }

    fn load_artifact(&self, device: &NdArrayDevice) -> Result<ClassifierHandle> {
        if !self.paths.metadata.exists() {
            return Err(PestVisionError::ArtifactCorrupt {
                path: self.paths.weights.clone(),
                reason: format!(
                    "weights present but metadata sidecar {:?} is missing",
                    self.paths.metadata
                ),
            });
        }

        let metadata = ArtifactMetadata::load(&self.paths.metadata).map_err(|e| {
            PestVisionError::ArtifactCorrupt {
                path: self.paths.metadata.clone(),
                reason: e.to_string(),
            }
        })?;
        metadata.validate_labels()?;

        let config = PestClassifierConfig::new()
            .with_input_size(metadata.image_size)
            .with_num_classes(metadata.labels.len());
        check_output_width(&config, &metadata.labels)?;

        let model = PestClassifier::new(&config, device)
            .load_file(self.paths.stem().to_path_buf(), &CompactRecorder::new(), device)
            .map_err(|e| PestVisionError::ArtifactCorrupt {
                path: self.paths.weights.clone(),
                reason: format!("{:?}", e),
            })?;

        info!(
            "Loaded existing classifier artifact from {:?} ({:?} normalization)",
            self.paths.weights, metadata.normalization
        );
        Ok(ClassifierHandle::new(model, metadata))
    }
}

/// Fail fast if the classifier output width and label list length disagree.
fn check_output_width(config: &PestClassifierConfig, labels: &[String]) -> Result<()> {
    if config.num_classes != labels.len() || config.num_classes != CLASS_NAMES.len() {
        return Err(PestVisionError::LabelCountMismatch {
            output_width: config.num_classes,
            label_count: labels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::default_device;
    use crate::model::artifact::NormalizationPolicy;

    #[test]
    fn test_fresh_construction_when_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ModelProvider::new(dir.path());
        let device = default_device();

        let handle = provider.get_or_init(&device).unwrap();
        assert_eq!(handle.model().num_classes(), CLASS_NAMES.len());
        assert_eq!(handle.metadata.normalization, NormalizationPolicy::ZeroToOne);
        // Nothing is written to disk until training runs
        assert!(!provider.paths().weights_exist());
    }

    #[test]
    fn test_handle_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ModelProvider::new(dir.path());
        let device = default_device();

        let first = provider.get_or_init(&device).unwrap();
        let second = provider.get_or_init(&device).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_corrupt_weights_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());
        std::fs::write(&paths.weights, b"not a burn record").unwrap();
        ArtifactMetadata::default().save(&paths.metadata).unwrap();

        let provider = ModelProvider::new(dir.path());
        let result = provider.get_or_init(&default_device());
        assert!(matches!(
            result,
            Err(PestVisionError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn test_missing_metadata_sidecar_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());
        std::fs::write(&paths.weights, b"not a burn record").unwrap();

        let provider = ModelProvider::new(dir.path());
        let result = provider.get_or_init(&default_device());
        assert!(matches!(
            result,
            Err(PestVisionError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn test_label_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());
        std::fs::write(&paths.weights, b"irrelevant").unwrap();
        let metadata = ArtifactMetadata {
            labels: vec!["Aphid".to_string(), "Mites".to_string()],
            ..Default::default()
        };
        metadata.save(&paths.metadata).unwrap();

        let provider = ModelProvider::new(dir.path());
        let result = provider.get_or_init(&default_device());
        assert!(matches!(
            result,
            Err(PestVisionError::LabelCountMismatch { .. })
        ));
    }
}
