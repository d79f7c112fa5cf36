use thiserror::Error;

/// Errors that can occur while training or decoding with the tagger.
#[derive(Debug, Error)]
pub enum HmmError {
    /// The number of documents and label sequences differ.
    #[error("got {documents} documents but {labels} label sequences")]
    CorpusMismatch {
        /// Number of token sequences.
        documents: usize,
        /// Number of label sequences.
        labels: usize,
    },

    /// A document and its labels have different lengths.
    #[error("document {index} has {tokens} tokens but {labels} labels")]
    SequenceMismatch {
        /// Position of the offending document in the corpus.
        index: usize,
        /// Token count.
        tokens: usize,
        /// Label count.
        labels: usize,
    },

    /// A label is not part of the tag set.
    #[error("unknown tag: {0:?}")]
    UnknownTag(String),

    /// The tag set contains the same tag twice.
    #[error("duplicate tag: {0:?}")]
    DuplicateTag(String),

    /// The tag set contains a tag that may not be used as a hidden state.
    #[error("reserved tag {0:?} cannot be part of the tag set")]
    ReservedTag(String),

    /// The tag set is empty.
    #[error("tag set is empty")]
    EmptyTagSet,

    /// A smoothing constant is negative or not finite.
    #[error("invalid smoothing parameter {name} = {value}")]
    InvalidSmoothing {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Gold and predicted sequences used for evaluation do not line up.
    #[error("evaluation mismatch: {0}")]
    EvaluationMismatch(String),
}

/// Result type alias for tagger operations.
pub type Result<T> = std::result::Result<T, HmmError>;
