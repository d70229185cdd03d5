//! Backend selection - CPU ndarray backend
//!
//! The demo classifier is small enough that CPU inference is instant, so the
//! ndarray backend is used unconditionally. Training goes through the
//! autodiff wrapper around the same backend.

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};

/// The default inference backend
pub type DefaultBackend = NdArray<f32>;

/// The autodiff backend used for the demo training pass
pub type TrainingBackend = Autodiff<DefaultBackend>;

/// Get the default device
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    "NdArray (CPU)"
}
