//! # hmmtag Trainer
//!
//! The end-to-end pipeline: load a dataset, fit an HMM on the training
//! split, score it on validation and tag held-out sentences.
pub mod config;
pub mod trainer;

pub use config::TrainerConfig;
pub use trainer::{Trainer, TrainingReport};
