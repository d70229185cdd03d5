//! Persisted model artifact handling
//!
//! An artifact is a pair of files in the model directory: the serialized
//! weights (Burn `CompactRecorder`, `.mpk`) and a JSON metadata sidecar.
//! The sidecar binds the normalization policy and label list to the weights,
//! so a model trained under one preprocessing scheme can never be served
//! under another.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::error::{PestVisionError, Result};
use crate::{CLASS_NAMES, IMAGE_SIZE};

/// File stem shared by the weights and metadata files
pub const ARTIFACT_STEM: &str = "pest_classifier";

/// Pixel normalization policy applied before inference.
///
/// This is a property of how the classifier's parameters were fitted, not a
/// free choice at inference time, which is why it lives in the artifact
/// metadata rather than in serving code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationPolicy {
    /// Divide every channel value by 255, mapping to [0, 1]
    ZeroToOne,
    /// MobileNetV2 `preprocess_input` scheme: v / 127.5 - 1, mapping to [-1, 1]
    MobileNet,
}

impl NormalizationPolicy {
    /// Normalize a single channel value
    pub fn normalize(&self, value: u8) -> f32 {
        match self {
            NormalizationPolicy::ZeroToOne => value as f32 / 255.0,
            NormalizationPolicy::MobileNet => value as f32 / 127.5 - 1.0,
        }
    }
}

/// Metadata stored next to the serialized weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Ordered class labels the model was defined with
    pub labels: Vec<String>,

    /// Input image size (width and height) the model expects
    pub image_size: usize,

    /// Normalization policy the weights were fitted under
    pub normalization: NormalizationPolicy,
}

impl Default for ArtifactMetadata {
    fn default() -> Self {
        Self {
            labels: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            image_size: IMAGE_SIZE,
            normalization: NormalizationPolicy::ZeroToOne,
        }
    }
}

impl ArtifactMetadata {
    /// Load metadata from a JSON sidecar file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PestVisionError::Serialization(format!("{}: {}", path.display(), e)))
    }

    /// Save metadata as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PestVisionError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Verify that the stored label list matches the compiled-in class list.
    ///
    /// A mismatch means the artifact was produced by an incompatible build
    /// and its output indices would map to the wrong species names.
    pub fn validate_labels(&self) -> Result<()> {
        if self.labels.len() != CLASS_NAMES.len() {
            return Err(PestVisionError::LabelCountMismatch {
                output_width: self.labels.len(),
                label_count: CLASS_NAMES.len(),
            });
        }
        for (stored, expected) in self.labels.iter().zip(CLASS_NAMES.iter()) {
            if stored != expected {
                return Err(PestVisionError::Model(format!(
                    "artifact label '{}' does not match expected label '{}'",
                    stored, expected
                )));
            }
        }
        Ok(())
    }
}

/// Resolved file locations for one artifact
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Serialized weights (`<stem>.mpk`)
    pub weights: PathBuf,
    /// Metadata sidecar (`<stem>.json`)
    pub metadata: PathBuf,
    stem: PathBuf,
}

impl ArtifactPaths {
    /// Derive artifact file paths from a model directory
    pub fn new(model_dir: &Path) -> Self {
        let stem = model_dir.join(ARTIFACT_STEM);
        Self {
            weights: stem.with_extension("mpk"),
            metadata: stem.with_extension("json"),
            stem,
        }
    }

    /// Extension-less path handed to Burn recorders, which append `.mpk`
    pub fn stem(&self) -> &Path {
        &self.stem
    }

    /// Whether serialized weights are present on disk
    pub fn weights_exist(&self) -> bool {
        self.weights.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_zero_to_one_bounds() {
        let policy = NormalizationPolicy::ZeroToOne;
        assert_eq!(policy.normalize(0), 0.0);
        assert_eq!(policy.normalize(255), 1.0);
    }

    #[test]
    fn test_normalization_mobilenet_bounds() {
        let policy = NormalizationPolicy::MobileNet;
        assert_eq!(policy.normalize(0), -1.0);
        assert_eq!(policy.normalize(255), 1.0);
    }

    #[test]
    fn test_metadata_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");

        let metadata = ArtifactMetadata {
            normalization: NormalizationPolicy::MobileNet,
            ..Default::default()
        };
        metadata.save(&path).unwrap();

        let loaded = ArtifactMetadata::load(&path).unwrap();
        assert_eq!(loaded.normalization, NormalizationPolicy::MobileNet);
        assert_eq!(loaded.image_size, IMAGE_SIZE);
        assert!(loaded.validate_labels().is_ok());
    }

    #[test]
    fn test_label_mismatch_is_rejected() {
        let metadata = ArtifactMetadata {
            labels: vec!["Aphid".to_string(), "Armyworm".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            metadata.validate_labels(),
            Err(PestVisionError::LabelCountMismatch { .. })
        ));

        let metadata = ArtifactMetadata {
            labels: CLASS_NAMES.iter().rev().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        assert!(metadata.validate_labels().is_err());
    }

    #[test]
    fn test_artifact_paths() {
        let paths = ArtifactPaths::new(Path::new("model"));
        assert_eq!(paths.weights, Path::new("model/pest_classifier.mpk"));
        assert_eq!(paths.metadata, Path::new("model/pest_classifier.json"));
        assert_eq!(paths.stem(), Path::new("model/pest_classifier"));
    }
}
