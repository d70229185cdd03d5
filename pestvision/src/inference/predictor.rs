//! Single-image prediction
//!
//! The predictor is constructed from artifact metadata, so the image size
//! and normalization policy always match what the classifier's parameters
//! were fitted under.

use std::fmt;
use std::time::{Duration, Instant};

use burn::module::AutodiffModule;
use burn::tensor::{Tensor, TensorData};
use image::{imageops::FilterType, DynamicImage};
use serde::{Deserialize, Serialize};

use crate::backend::{default_device, DefaultBackend};
use crate::class_name;
use crate::model::artifact::{ArtifactMetadata, NormalizationPolicy};
use crate::provider::ClassifierHandle;
use crate::utils::error::{PestVisionError, Result};

/// Result of a single prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestPrediction {
    /// Predicted class index
    pub class_index: usize,

    /// Predicted class label
    pub label: String,

    /// Confidence score (probability) for the predicted class
    pub confidence: f32,

    /// Full probability distribution over all classes
    pub probabilities: Vec<f32>,

    /// Inference time in milliseconds
    pub inference_time_ms: f64,
}

impl PestPrediction {
    /// Build a prediction from a probability vector (argmax + confidence)
    pub fn new(probabilities: Vec<f32>, inference_time: Duration) -> Self {
        let (class_index, &confidence) = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or((0, &0.0));

        let label = class_name(class_index).unwrap_or("Unknown").to_string();

        Self {
            class_index,
            label,
            confidence,
            probabilities,
            inference_time_ms: inference_time.as_secs_f64() * 1000.0,
        }
    }
}

impl fmt::Display for PestPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Detected pest: {}", self.label)?;
        write!(f, "Confidence: {:.2}", self.confidence)
    }
}

/// Predictor for running inference with the cached classifier
pub struct Predictor {
    /// Target image size for preprocessing
    image_size: u32,

    /// Normalization policy bound to the artifact
    policy: NormalizationPolicy,
}

impl Predictor {
    /// Create a predictor matching the given artifact metadata
    pub fn from_metadata(metadata: &ArtifactMetadata) -> Self {
        Self {
            image_size: metadata.image_size as u32,
            policy: metadata.normalization,
        }
    }

    /// Decode uploaded bytes as a JPEG/PNG image
    pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| PestVisionError::Decode(e.to_string()))
    }

    /// Resize (with distortion, not cropping) and normalize an image.
    /// Returns CHW layout: [C, H, W] flattened.
    pub fn preprocess(&self, image: &DynamicImage) -> Vec<f32> {
        let resized = image.resize_exact(self.image_size, self.image_size, FilterType::Lanczos3);
        let rgb = resized.to_rgb8();
        let num_pixels = (self.image_size * self.image_size) as usize;

        let mut normalized = vec![0.0f32; 3 * num_pixels];
        for (i, pixel) in rgb.pixels().enumerate() {
            // CHW layout: all R values, then all G values, then all B values
            normalized[i] = self.policy.normalize(pixel[0]);
            normalized[num_pixels + i] = self.policy.normalize(pixel[1]);
            normalized[2 * num_pixels + i] = self.policy.normalize(pixel[2]);
        }

        normalized
    }

    /// Predict the pest species for one encoded image.
    ///
    /// Malformed input fails with a decode error; everything else runs the
    /// fixed pipeline: resize, normalize, batch dimension, forward pass,
    /// arg-max.
    pub fn predict(&self, handle: &ClassifierHandle, image_bytes: &[u8]) -> Result<PestPrediction> {
        let started = Instant::now();

        let image = Self::decode(image_bytes)?;
        let pixels = self.preprocess(&image);

        let device = default_device();
        let size = self.image_size as usize;
        let data = TensorData::new(pixels, [1, 3, size, size]);
        let input = Tensor::<DefaultBackend, 4>::from_data(data, &device);

        // Inference runs on the inner (non-autodiff) backend
        let model = handle.model().valid();
        let probabilities: Vec<f32> = model
            .forward_softmax(input)
            .into_data()
            .to_vec()
            .map_err(|e| PestVisionError::Inference(format!("{:?}", e)))?;

        Ok(PestPrediction::new(probabilities, started.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cnn::{PestClassifier, PestClassifierConfig};
    use crate::CLASS_NAMES;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn test_handle(image_size: usize) -> ClassifierHandle {
        let device = default_device();
        let config = PestClassifierConfig::new().with_input_size(image_size);
        let metadata = ArtifactMetadata {
            image_size,
            ..Default::default()
        };
        ClassifierHandle::new(PestClassifier::new(&config, &device), metadata)
    }

    fn png_bytes(width: u32, height: u32, fill: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([fill, fill, fill]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_prediction_argmax_and_confidence() {
        let probs = vec![0.05, 0.1, 0.6, 0.2, 0.05];
        let prediction = PestPrediction::new(probs, Duration::from_millis(10));

        assert_eq!(prediction.class_index, 2);
        assert_eq!(prediction.label, "Bollworm");
        assert_eq!(prediction.confidence, 0.6);
    }

    #[test]
    fn test_prediction_display_two_decimals() {
        let prediction = PestPrediction::new(vec![0.125, 0.875, 0.0, 0.0, 0.0], Duration::ZERO);
        let rendered = prediction.to_string();
        assert!(rendered.contains("Armyworm"));
        assert!(rendered.contains("0.88"));
    }

    #[test]
    fn test_preprocess_resizes_any_aspect_ratio() {
        let handle = test_handle(64);
        let predictor = Predictor::from_metadata(&handle.metadata);

        let img = DynamicImage::ImageRgb8(RgbImage::new(100, 37));
        let pixels = predictor.preprocess(&img);
        assert_eq!(pixels.len(), 3 * 64 * 64);
    }

    #[test]
    fn test_zero_to_one_normalization_extremes() {
        let metadata = ArtifactMetadata {
            image_size: 8,
            ..Default::default()
        };
        let predictor = Predictor::from_metadata(&metadata);

        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0])));
        assert!(predictor.preprocess(&black).iter().all(|&v| v == 0.0));

        let white =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255])));
        assert!(predictor.preprocess(&white).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_predict_returns_valid_distribution() {
        let handle = test_handle(64);
        let predictor = Predictor::from_metadata(&handle.metadata);
        let bytes = png_bytes(100, 80, 120);

        let prediction = predictor.predict(&handle, &bytes).unwrap();

        assert!(CLASS_NAMES.contains(&prediction.label.as_str()));
        assert!((0.0..=1.0).contains(&prediction.confidence));
        assert_eq!(prediction.probabilities.len(), CLASS_NAMES.len());

        let sum: f32 = prediction.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);

        let max = prediction
            .probabilities
            .iter()
            .cloned()
            .fold(f32::MIN, f32::max);
        assert_eq!(prediction.confidence, max);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let handle = test_handle(64);
        let predictor = Predictor::from_metadata(&handle.metadata);
        let bytes = png_bytes(50, 50, 42);

        let first = predictor.predict(&handle, &bytes).unwrap();
        let second = predictor.predict(&handle, &bytes).unwrap();

        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.probabilities, second.probabilities);
    }

    #[test]
    fn test_undecodable_bytes_fail_with_decode_error() {
        let handle = test_handle(64);
        let predictor = Predictor::from_metadata(&handle.metadata);

        let result = predictor.predict(&handle, b"definitely not an image");
        assert!(matches!(result, Err(PestVisionError::Decode(_))));
    }
}
