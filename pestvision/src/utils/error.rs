//! Error Handling Module
//!
//! Defines custom error types for the PestVision library.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for PestVision operations
#[derive(Error, Debug)]
pub enum PestVisionError {
    /// The uploaded bytes could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// An artifact exists on disk but cannot be read back.
    /// Deliberately distinct from "no artifact present", which is the
    /// expected fresh-construct path.
    #[error("Model artifact at '{path}' is corrupt: {reason}")]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Classifier output width and label list length disagree
    #[error("Classifier outputs {output_width} classes but {label_count} labels are defined")]
    LabelCountMismatch {
        output_width: usize,
        label_count: usize,
    },

    /// Error with model operations
    #[error("Model error: {0}")]
    Model(String),

    /// Error with training
    #[error("Training error: {0}")]
    Training(String),

    /// Error with inference
    #[error("Inference error: {0}")]
    Inference(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience Result type for PestVision operations
pub type Result<T> = std::result::Result<T, PestVisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PestVisionError::Decode("bad magic bytes".to_string());
        assert!(err.to_string().contains("decode"));

        let err = PestVisionError::LabelCountMismatch {
            output_width: 5,
            label_count: 3,
        };
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('3'));
    }
}
