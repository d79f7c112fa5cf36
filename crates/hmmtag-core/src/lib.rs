//! # hmmtag Core
//!
//! A hidden Markov model sequence tagger. Transition, emission and
//! start-state tables are estimated from a labeled corpus with add-k
//! smoothing and decoded with the Viterbi algorithm, using an absorbing end
//! state (`qf`) after the last token. BIO helpers render and validate
//! named-entity label sequences.
//!
//! ## Quick Start
//!
//! ```rust
//! use hmmtag_core::{AddK, Hmm, HmmConfig, TagSet, Vocabulary};
//!
//! let docs = vec![
//!     vec!["Ada".to_string(), "wrote".to_string()],
//!     vec!["Alan".to_string(), "wrote".to_string()],
//! ];
//! let labels = vec![
//!     vec!["B-PER".to_string(), "O".to_string()],
//!     vec!["B-PER".to_string(), "O".to_string()],
//! ];
//!
//! let vocab = Vocabulary::build(&docs, 1);
//! let tags = TagSet::from_labels(&labels).unwrap();
//! let hmm = Hmm::train(&docs, &labels, vocab, tags, HmmConfig::default(), &AddK).unwrap();
//!
//! assert_eq!(hmm.predict(&["Ada", "wrote"]).unwrap(), vec!["B-PER", "O"]);
//! ```
pub mod bio;
pub mod error;
pub mod eval;
pub mod hmm;
pub mod tags;
pub mod viterbi;

// Re-export primary API
pub use bio::{BioTag, Entity, extract_entities, stringify_labeled_doc, validate_ner_sequence};
pub use error::{HmmError, Result};
pub use eval::{EntityCounts, Evaluation, evaluate};
pub use hmm::{AddK, Hmm, HmmConfig, Matrix, Smoother};
pub use tags::{END_TAG, TagSet, UNK_TOKEN, Vocabulary};
pub use viterbi::{Decoded, TagScorer, ViterbiDecoder};
