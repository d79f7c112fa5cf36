//! Summary statistics for exploring a split before training.

use std::collections::{HashMap, HashSet};
use std::fmt;

use hmmtag_core::validate_ner_sequence;
use serde::Serialize;

use crate::dataset::Split;

/// Corpus-level counts for a split.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetStats {
    pub sentences: usize,
    pub tokens: usize,
    pub distinct_tokens: usize,
    pub max_length: usize,
    pub mean_length: f64,
    /// Label frequencies, most frequent first (ties by label).
    pub tag_counts: Vec<(String, usize)>,
    /// Sentences whose labels break the BIO constraints.
    pub invalid_sequences: usize,
}

impl DatasetStats {
    pub fn from_split(split: &Split) -> Self {
        let sentences = split.len();
        let tokens: usize = split.text.iter().map(Vec::len).sum();
        let max_length = split.text.iter().map(Vec::len).max().unwrap_or_default();
        let mean_length = if sentences == 0 {
            0.0
        } else {
            tokens as f64 / sentences as f64
        };

        let distinct: HashSet<&str> = split.text.iter().flatten().map(String::as_str).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in split.ner.iter().flatten() {
            *counts.entry(label.as_str()).or_default() += 1;
        }
        let mut tag_counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, n)| (tag.to_string(), n))
            .collect();
        tag_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let invalid_sequences = split
            .ner
            .iter()
            .filter(|seq| !validate_ner_sequence(seq.as_slice()))
            .count();

        Self {
            sentences,
            tokens,
            distinct_tokens: distinct.len(),
            max_length,
            mean_length,
            tag_counts,
            invalid_sequences,
        }
    }
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sentences:         {}", self.sentences)?;
        writeln!(f, "tokens:            {}", self.tokens)?;
        writeln!(f, "distinct tokens:   {}", self.distinct_tokens)?;
        writeln!(f, "max length:        {}", self.max_length)?;
        writeln!(f, "mean length:       {:.2}", self.mean_length)?;
        writeln!(f, "invalid sequences: {}", self.invalid_sequences)?;
        write!(f, "tags:")?;
        for (tag, n) in &self.tag_counts {
            write!(f, "\n\t{tag}: {n}")?;
        }
        Ok(())
    }
}
