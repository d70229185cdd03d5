//! CNN Model Architecture for Crop Pest Classification
//!
//! This module implements a small Convolutional Neural Network using the Burn
//! framework for classifying crop pests from images. The topology is fixed:
//! two convolution + max-pool stages, a flattening step, one fully connected
//! hidden layer and a final layer with one output per class.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Configuration for the PestClassifier CNN model
#[derive(Config, Debug)]
pub struct PestClassifierConfig {
    /// Number of output classes
    #[config(default = "5")]
    pub num_classes: usize,

    /// Input image size (assumes square images)
    #[config(default = "224")]
    pub input_size: usize,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub in_channels: usize,

    /// Base number of convolutional filters
    #[config(default = "32")]
    pub base_filters: usize,

    /// Number of units in the fully connected hidden layer
    #[config(default = "128")]
    pub hidden_units: usize,
}

impl PestClassifierConfig {
    /// Spatial side length of the feature map after both conv + pool stages.
    ///
    /// Convolutions use 3x3 kernels with valid padding (side - 2), pooling
    /// halves the side with floor division.
    pub fn feature_map_size(&self) -> usize {
        let after_conv1 = self.input_size - 2;
        let after_pool1 = after_conv1 / 2;
        let after_conv2 = after_pool1 - 2;
        after_conv2 / 2
    }

    /// Length of the flattened feature vector fed into the classifier head.
    pub fn flattened_size(&self) -> usize {
        let side = self.feature_map_size();
        self.base_filters * 2 * side * side
    }
}

/// Crop Pest Classifier CNN
///
/// Architecture:
/// - Conv2d 3 -> 32, 3x3, valid padding, ReLU, MaxPool 2x2
/// - Conv2d 32 -> 64, 3x3, valid padding, ReLU, MaxPool 2x2
/// - Flatten
/// - Linear(flattened -> 128), ReLU
/// - Linear(128 -> num_classes), softmax applied at inference
#[derive(Module, Debug)]
pub struct PestClassifier<B: Backend> {
    conv1: Conv2d<B>,
    pool1: MaxPool2d,
    conv2: Conv2d<B>,
    pool2: MaxPool2d,
    fc1: Linear<B>,
    fc2: Linear<B>,
    num_classes: usize,
}

impl<B: Backend> PestClassifier<B> {
    /// Create a new PestClassifier from configuration
    ///
    /// Parameters are randomly initialized; no training happens here.
    pub fn new(config: &PestClassifierConfig, device: &B::Device) -> Self {
        let base = config.base_filters;

        let conv1 = Conv2dConfig::new([config.in_channels, base], [3, 3])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        let pool1 = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();

        let conv2 = Conv2dConfig::new([base, base * 2], [3, 3])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        let pool2 = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();

        let fc1 = LinearConfig::new(config.flattened_size(), config.hidden_units).init(device);
        let fc2 = LinearConfig::new(config.hidden_units, config.num_classes).init(device);

        Self {
            conv1,
            pool1,
            conv2,
            pool2,
            fc1,
            fc2,
            num_classes: config.num_classes,
        }
    }

    /// Forward pass through the network
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = Relu::new().forward(x);
        let x = self.pool1.forward(x);

        let x = self.conv2.forward(x);
        let x = Relu::new().forward(x);
        let x = self.pool2.forward(x);

        // Flatten: [B, C, H, W] -> [B, C * H * W]
        let [batch_size, channels, height, width] = x.dims();
        let x = x.reshape([batch_size, channels * height * width]);

        let x = self.fc1.forward(x);
        let x = Relu::new().forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let logits = self.forward(x);
        burn::tensor::activation::softmax(logits, 1)
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}
