//! # PestVision
//!
//! A demonstration crop pest classifier built with the Burn framework.
//! Users upload an image of a pest and receive a predicted species label
//! with a confidence score from a small convolutional neural network.
//!
//! ## Modules
//!
//! - `model`: CNN architecture and the persisted artifact format (weights
//!   plus a metadata sidecar binding the normalization policy)
//! - `provider`: lazily initialized, process-wide cached classifier handle
//! - `inference`: single-image prediction (decode, resize, normalize, argmax)
//! - `training`: the illustrative demo-training pass over synthetic data
//! - `utils`: logging and error types
//!
//! The demo trainer fits nothing real: it exists only to show the shape of
//! a training call and to exercise the artifact save/load path.

pub mod backend;
pub mod inference;
pub mod model;
pub mod provider;
pub mod training;
pub mod utils;

// Re-export commonly used items for convenience
pub use inference::predictor::{PestPrediction, Predictor};
pub use model::artifact::{ArtifactMetadata, ArtifactPaths, NormalizationPolicy};
pub use model::cnn::{PestClassifier, PestClassifierConfig};
pub use provider::{ClassifierHandle, ModelProvider};
pub use training::demo::{train_demo, DemoTrainingReport};
pub use utils::error::{PestVisionError, Result};

/// Pest species labels, in the fixed order the classifier was defined with.
pub const CLASS_NAMES: [&str; 5] = ["Aphid", "Armyworm", "Bollworm", "Grasshopper", "Mites"];

/// Number of output classes.
pub const NUM_CLASSES: usize = CLASS_NAMES.len();

/// Input resolution (width and height) expected by the classifier.
pub const IMAGE_SIZE: usize = 224;

/// Number of epochs used by the demo trainer.
pub const DEMO_EPOCHS: usize = 5;

/// Number of synthetic samples generated by the demo trainer.
pub const DEMO_SAMPLES: usize = 20;

/// Version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Look up a class label by index.
pub fn class_name(index: usize) -> Option<&'static str> {
    CLASS_NAMES.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tracks_package() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_class_names_are_fixed() {
        assert_eq!(NUM_CLASSES, 5);
        assert_eq!(class_name(0), Some("Aphid"));
        assert_eq!(class_name(4), Some("Mites"));
        assert_eq!(class_name(5), None);
    }
}
