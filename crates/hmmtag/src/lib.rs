//! # hmmtag
//!
//! Supervised HMM sequence tagging: count-based estimation with add-k
//! smoothing, Viterbi decoding with an absorbing end state, BIO helpers
//! and loading of zipped JSON corpora.
//!
//! This crate re-exports the workspace members:
//!
//! - [`tagging`]: tag sets, vocabularies, the model, the decoder and scoring.
//! - [`data`]: archive extraction and dataset splits.
//! - [`trainer`]: the fit/evaluate/predict pipeline.

pub use hmmtag_core as tagging;
pub use hmmtag_data as data;
pub use hmmtag_trainer as trainer;

pub use hmmtag_core::{
    AddK, END_TAG, Hmm, HmmConfig, HmmError, TagSet, UNK_TOKEN, Vocabulary, evaluate,
    stringify_labeled_doc, validate_ner_sequence,
};
pub use hmmtag_data::{Dataset, Split, load_dataset};
pub use hmmtag_trainer::{Trainer, TrainerConfig};
