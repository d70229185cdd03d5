//! Training module
//!
//! Only the illustrative demo-training pass lives here. Real training would
//! be a separate offline pipeline with dataset ingestion, augmentation and
//! validation splits; the in-page train action is strictly a smoke test of
//! the optimization and artifact save path.

pub mod demo;

pub use demo::{train_demo, DemoTrainingReport};
