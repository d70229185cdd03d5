//! Inference module
//!
//! Single-image prediction: decode the uploaded bytes, resize to the model's
//! input resolution, normalize per the artifact's policy, run the forward
//! pass and pick the arg-max class.

pub mod predictor;

pub use predictor::{PestPrediction, Predictor};
