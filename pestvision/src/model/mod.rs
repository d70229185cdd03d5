//! Model module: CNN architecture and persisted artifact handling.

pub mod artifact;
pub mod cnn;

pub use artifact::{ArtifactMetadata, ArtifactPaths, NormalizationPolicy};
pub use cnn::{PestClassifier, PestClassifierConfig};
