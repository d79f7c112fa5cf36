//! # HMM Parameter Estimation
//!
//! Counts transitions, emissions and sequence starts over a labeled corpus
//! and smooths them into log-probability tables.
//!
//! Tables are stored densely:
//! - transitions: `|tags| × (|tags| + 1)`; the extra column is the end state
//!   [`END_TAG`]. There is no row for it since nothing leaves the end state.
//! - emissions: `|tags| × |vocab|`. The end state emits nothing.
//! - starts: one entry per tag. The end state never starts a sequence.

use tracing::{debug, info};

use crate::error::{HmmError, Result};
use crate::hmm::config::HmmConfig;
use crate::hmm::smoothing::{Matrix, Smoother};
use crate::tags::{END_TAG, TagSet, Vocabulary};
use crate::viterbi::{TagScorer, ViterbiDecoder};

/// A trained hidden Markov model tagger.
#[derive(Debug, Clone)]
pub struct Hmm {
    tags: TagSet,
    vocab: Vocabulary,
    config: HmmConfig,
    transition: Matrix,
    emission: Matrix,
    start: Vec<f64>,
}

impl Hmm {
    /// Estimate all three tables from `documents` and their `labels`.
    ///
    /// `smoother` is applied to the transition and emission counts; start
    /// probabilities are smoothed with `config.k_start` directly.
    pub fn train<D, L, S>(
        documents: &[D],
        labels: &[L],
        vocab: Vocabulary,
        tags: TagSet,
        config: HmmConfig,
        smoother: &S,
    ) -> Result<Self>
    where
        D: AsRef<[String]>,
        L: AsRef<[String]>,
        S: Smoother + ?Sized,
    {
        config.validate()?;
        if documents.len() != labels.len() {
            return Err(HmmError::CorpusMismatch {
                documents: documents.len(),
                labels: labels.len(),
            });
        }

        // Resolve labels to indices once; every table is built from these.
        let mut label_ids = Vec::with_capacity(labels.len());
        for (index, (doc, seq)) in documents.iter().zip(labels).enumerate() {
            let (doc, seq) = (doc.as_ref(), seq.as_ref());
            if doc.len() != seq.len() {
                return Err(HmmError::SequenceMismatch {
                    index,
                    tokens: doc.len(),
                    labels: seq.len(),
                });
            }
            let ids = seq
                .iter()
                .map(|tag| {
                    tags.index_of(tag)
                        .ok_or_else(|| HmmError::UnknownTag(tag.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            label_ids.push(ids);
        }

        let transition = build_transition_matrix(&label_ids, tags.len(), config.k_transition, smoother);
        let emission = build_emission_matrix(
            documents,
            &label_ids,
            &vocab,
            tags.len(),
            config.k_emission,
            smoother,
        );
        let start = start_state_probs(&label_ids, tags.len(), config.k_start);

        info!(
            sequences = documents.len(),
            tags = tags.len(),
            vocab = vocab.len(),
            "trained hmm"
        );

        Ok(Self {
            tags,
            vocab,
            config,
            transition,
            emission,
            start,
        })
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn config(&self) -> &HmmConfig {
        &self.config
    }

    /// The transition table, rows are tags and the last column is the end state.
    pub fn transition_matrix(&self) -> &Matrix {
        &self.transition
    }

    pub fn emission_matrix(&self) -> &Matrix {
        &self.emission
    }

    pub fn start_state_probs(&self) -> &[f64] {
        &self.start
    }

    /// `log P(curr | prev)`. `curr` may be the end state; `prev` may not.
    pub fn transition_log_prob(&self, prev: &str, curr: &str) -> Option<f64> {
        let row = self.tags.index_of(prev)?;
        let col = self.column_of(curr)?;
        Some(self.transition.get(row, col))
    }

    /// `log P(token | tag)` for a token exactly as it appears in the vocabulary.
    pub fn emission_log_prob(&self, tag: &str, token: &str) -> Option<f64> {
        let row = self.tags.index_of(tag)?;
        if !self.vocab.contains(token) {
            return None;
        }
        let col = self.vocab.lookup(token)?;
        Some(self.emission.get(row, col))
    }

    /// `log P(tag starts a sequence)`.
    pub fn start_log_prob(&self, tag: &str) -> Option<f64> {
        self.tags.index_of(tag).map(|i| self.start[i])
    }

    /// Score for labeling `document[i]` with `predicted` after `previous`.
    ///
    /// - first position: the emission score alone (the decoder adds the start
    ///   probability),
    /// - `predicted == qf`: the transition into the end state alone,
    /// - otherwise: transition plus emission.
    ///
    /// Tokens outside the vocabulary are scored as `<unk>`; anything the
    /// model has no entry for scores `-inf`.
    pub fn tag_likelihood<S: AsRef<str>>(
        &self,
        predicted: &str,
        previous: Option<&str>,
        document: &[S],
        i: usize,
    ) -> f64 {
        let Some(predicted) = self.column_of(predicted) else {
            return f64::NEG_INFINITY;
        };
        if i == 0 {
            return self.likelihood_at(predicted, None, document, 0);
        }
        match previous.and_then(|p| self.tags.index_of(p)) {
            Some(prev) => self.likelihood_at(predicted, Some(prev), document, i),
            None => f64::NEG_INFINITY,
        }
    }

    /// Tag `document` with the most likely label sequence.
    pub fn predict<S: AsRef<str>>(&self, document: &[S]) -> Result<Vec<String>> {
        let decoded = ViterbiDecoder::new().decode(self, document)?;
        Ok(decoded
            .tags
            .into_iter()
            .filter_map(|idx| self.tags.get(idx).map(str::to_string))
            .collect())
    }

    fn column_of(&self, tag: &str) -> Option<usize> {
        if tag == END_TAG {
            Some(self.end_column())
        } else {
            self.tags.index_of(tag)
        }
    }

    #[inline]
    fn end_column(&self) -> usize {
        self.tags.len()
    }

    fn emission_for<S: AsRef<str>>(&self, tag: usize, token: Option<&S>) -> f64 {
        token
            .and_then(|t| self.vocab.lookup(t.as_ref()))
            .map_or(f64::NEG_INFINITY, |col| self.emission.get(tag, col))
    }

    fn likelihood_at<S: AsRef<str>>(
        &self,
        predicted: usize,
        previous: Option<usize>,
        document: &[S],
        i: usize,
    ) -> f64 {
        if predicted == self.end_column() {
            return previous.map_or(f64::NEG_INFINITY, |prev| self.transition.get(prev, predicted));
        }
        let emission = self.emission_for(predicted, document.get(i));
        match previous {
            None => emission,
            Some(prev) => self.transition.get(prev, predicted) + emission,
        }
    }
}

impl TagScorer for Hmm {
    fn num_tags(&self) -> usize {
        self.tags.len()
    }

    fn start_score(&self, tag: usize) -> f64 {
        self.start.get(tag).copied().unwrap_or(f64::NEG_INFINITY)
    }

    fn likelihood<S: AsRef<str>>(
        &self,
        predicted: usize,
        previous: Option<usize>,
        document: &[S],
        i: usize,
    ) -> f64 {
        if predicted >= self.tags.len() || previous.is_some_and(|p| p >= self.tags.len()) {
            return f64::NEG_INFINITY;
        }
        self.likelihood_at(predicted, previous, document, i)
    }

    fn end_score(&self, previous: usize) -> f64 {
        if previous >= self.tags.len() {
            return f64::NEG_INFINITY;
        }
        self.transition.get(previous, self.end_column())
    }
}

/// Count `(y_{i-1}, y_i)` pairs plus one `(y_last, qf)` per non-empty
/// sequence, then smooth over `|tags| + 1` outcomes.
fn build_transition_matrix<S: Smoother + ?Sized>(
    labels: &[Vec<usize>],
    num_tags: usize,
    k: f64,
    smoother: &S,
) -> Matrix {
    let mut counts = Matrix::zeros(num_tags, num_tags + 1);
    for seq in labels {
        for pair in seq.windows(2) {
            counts.add(pair[0], pair[1], 1.0);
        }
        if let Some(&last) = seq.last() {
            counts.add(last, num_tags, 1.0);
        }
    }
    debug!(rows = counts.rows(), cols = counts.cols(), "transition counts");
    smoother.smooth(k, &counts)
}

/// Count `(tag, token)` pairs; tokens outside the vocabulary count as
/// `<unk>`, or are skipped when the vocabulary has no `<unk>`.
fn build_emission_matrix<D, S>(
    documents: &[D],
    labels: &[Vec<usize>],
    vocab: &Vocabulary,
    num_tags: usize,
    k: f64,
    smoother: &S,
) -> Matrix
where
    D: AsRef<[String]>,
    S: Smoother + ?Sized,
{
    let mut counts = Matrix::zeros(num_tags, vocab.len());
    let mut skipped = 0usize;
    for (doc, seq) in documents.iter().zip(labels) {
        for (token, &tag) in doc.as_ref().iter().zip(seq) {
            match vocab.lookup(token) {
                Some(col) => counts.add(tag, col, 1.0),
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, "tokens outside vocabulary ignored for emissions");
    }
    debug!(rows = counts.rows(), cols = counts.cols(), "emission counts");
    smoother.smooth(k, &counts)
}

/// `log((starts(y) + k) / (Σ starts + k·|tags|))`.
fn start_state_probs(labels: &[Vec<usize>], num_tags: usize, k: f64) -> Vec<f64> {
    let mut counts = vec![0.0f64; num_tags];
    for seq in labels {
        if let Some(&first) = seq.first() {
            counts[first] += 1.0;
        }
    }
    let denom = counts.iter().sum::<f64>() + k * num_tags as f64;
    counts
        .into_iter()
        .map(|c| {
            if denom > 0.0 {
                ((c + k) / denom).ln()
            } else {
                f64::NEG_INFINITY
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::smoothing::AddK;
    use crate::tags::UNK_TOKEN;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn corpus() -> (Vec<Vec<String>>, Vec<Vec<String>>) {
        let docs = vec![
            strings(&["Alice", "met", "Bob"]),
            strings(&["Bob", "left"]),
            strings(&["Paris", "is", "big"]),
        ];
        let labels = vec![
            strings(&["B-PER", "O", "B-PER"]),
            strings(&["B-PER", "O"]),
            strings(&["B-LOC", "O", "O"]),
        ];
        (docs, labels)
    }

    fn train(config: HmmConfig) -> Hmm {
        let (docs, labels) = corpus();
        let vocab = Vocabulary::build(&docs, 1);
        let tags = TagSet::new(["B-LOC", "B-PER", "O"]).unwrap();
        Hmm::train(&docs, &labels, vocab, tags, config, &AddK).unwrap()
    }

    #[test]
    fn test_table_shapes() {
        let hmm = train(HmmConfig::default());
        assert_eq!(hmm.transition_matrix().rows(), 3);
        assert_eq!(hmm.transition_matrix().cols(), 4);
        assert_eq!(hmm.emission_matrix().len(), hmm.vocab().len() * hmm.tags().len());
        assert_eq!(hmm.start_state_probs().len(), 3);
        assert_eq!(hmm.start_log_prob(END_TAG), None);
        assert_eq!(hmm.transition_log_prob(END_TAG, "O"), None);
        assert_eq!(hmm.emission_log_prob(END_TAG, "Bob"), None);
    }

    #[test]
    fn test_transition_probabilities() {
        let hmm = train(HmmConfig::default());
        // From O: O->O once, O->B-PER once, O->qf twice; 4 counts, 4 outcomes.
        let p = hmm.transition_log_prob("O", END_TAG).unwrap();
        assert!(approx(p, (3.0f64 / 8.0).ln()));
        let p = hmm.transition_log_prob("O", "B-LOC").unwrap();
        assert!(approx(p, (1.0f64 / 8.0).ln()));

        let row_mass: f64 = hmm.transition_matrix().row(1).iter().map(|v| v.exp()).sum();
        assert!(approx(row_mass, 1.0));
    }

    #[test]
    fn test_emission_probabilities() {
        let hmm = train(HmmConfig::default().with_k_emission(0.0));
        // B-PER emits Alice once and Bob twice
        let p = hmm.emission_log_prob("B-PER", "Bob").unwrap();
        assert!(approx(p, (2.0f64 / 3.0).ln()));
        assert_eq!(hmm.emission_log_prob("B-PER", "Paris"), Some(f64::NEG_INFINITY));
        assert_eq!(hmm.emission_log_prob("B-PER", "Zurich"), None);
    }

    #[test]
    fn test_start_probabilities() {
        let hmm = train(HmmConfig::default().with_k_start(1.0));
        // starts: B-PER x2, B-LOC x1, O x0 over 3 + 3
        assert!(approx(hmm.start_log_prob("B-PER").unwrap(), (3.0f64 / 6.0).ln()));
        assert!(approx(hmm.start_log_prob("O").unwrap(), (1.0f64 / 6.0).ln()));

        let hmm = train(HmmConfig::default().with_k_start(0.0));
        assert_eq!(hmm.start_log_prob("O"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_tag_likelihood_cases() {
        let hmm = train(HmmConfig::default());
        let doc = strings(&["Bob", "met", "Carol"]);

        let first = hmm.tag_likelihood("B-PER", None, &doc, 0);
        assert!(approx(first, hmm.emission_log_prob("B-PER", "Bob").unwrap()));

        let end = hmm.tag_likelihood(END_TAG, Some("O"), &doc, 3);
        assert!(approx(end, hmm.transition_log_prob("O", END_TAG).unwrap()));

        // "Carol" is unseen and scored as <unk>
        let unk = hmm.tag_likelihood("B-PER", Some("O"), &doc, 2);
        let expected = hmm.transition_log_prob("O", "B-PER").unwrap()
            + hmm.emission_log_prob("B-PER", UNK_TOKEN).unwrap();
        assert!(approx(unk, expected));

        assert_eq!(hmm.tag_likelihood("B-MISC", Some("O"), &doc, 1), f64::NEG_INFINITY);

        // unseen first token is scored as <unk> too
        let first_unseen = hmm.tag_likelihood("B-PER", None, &["Zed", "left"], 0);
        assert!(approx(first_unseen, hmm.emission_log_prob("B-PER", UNK_TOKEN).unwrap()));
        assert_eq!(hmm.predict(&["Zed", "left"]).unwrap(), strings(&["B-PER", "O"]));
    }

    #[test]
    fn test_rare_training_tokens_count_as_unk() {
        let docs = vec![strings(&["a", "a", "b"])];
        let labels = vec![strings(&["O", "O", "X"])];
        let vocab = Vocabulary::build(&docs, 2);
        assert!(!vocab.contains("b"));

        let tags = TagSet::new(["O", "X"]).unwrap();
        let config = HmmConfig::default().with_k_emission(0.0);
        let hmm = Hmm::train(&docs, &labels, vocab, tags, config, &AddK).unwrap();
        assert_eq!(hmm.emission_log_prob("X", UNK_TOKEN), Some(0.0));
        assert_eq!(hmm.emission_log_prob("O", "a"), Some(0.0));
        assert_eq!(hmm.emission_log_prob("X", "b"), None);
    }

    #[test]
    fn test_tokens_outside_vocabulary_without_unk_are_skipped() {
        let docs = vec![strings(&["a", "a", "b"])];
        let labels = vec![strings(&["O", "O", "X"])];
        let vocab = Vocabulary::new(["a"]);
        let tags = TagSet::new(["O", "X"]).unwrap();
        let config = HmmConfig::default().with_k_emission(0.0);
        let hmm = Hmm::train(&docs, &labels, vocab, tags, config, &AddK).unwrap();

        assert_eq!(hmm.emission_matrix().cols(), 1);
        assert_eq!(hmm.emission_log_prob("O", "a"), Some(0.0));
        // X only ever emitted the skipped token
        assert_eq!(hmm.emission_log_prob("X", "a"), Some(f64::NEG_INFINITY));

        let decoded = ViterbiDecoder::new().decode(&hmm, &["a", "zzz", "a"]).unwrap();
        assert_eq!(decoded.tags, vec![0, 0, 0]);
        assert_eq!(decoded.log_probability, f64::NEG_INFINITY);
    }

    #[test]
    fn test_predict() {
        let hmm = train(HmmConfig::default().with_k_emission(0.1));
        let tagged = hmm.predict(&["Alice", "met", "Bob"]).unwrap();
        assert_eq!(tagged, strings(&["B-PER", "O", "B-PER"]));
        let empty: [&str; 0] = [];
        assert!(hmm.predict(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_train_errors() {
        let (docs, mut labels) = corpus();
        let vocab = Vocabulary::build(&docs, 1);
        let tags = TagSet::new(["B-LOC", "B-PER", "O"]).unwrap();

        let err = Hmm::train(&docs, &labels[..2], vocab.clone(), tags.clone(), HmmConfig::default(), &AddK)
            .unwrap_err();
        assert!(matches!(err, HmmError::CorpusMismatch { documents: 3, labels: 2 }));

        labels[1].push("O".into());
        let err = Hmm::train(&docs, &labels, vocab.clone(), tags.clone(), HmmConfig::default(), &AddK)
            .unwrap_err();
        assert!(matches!(err, HmmError::SequenceMismatch { index: 1, .. }));

        labels[1].pop();
        labels[2][0] = "B-MISC".into();
        let err = Hmm::train(&docs, &labels, vocab, tags, HmmConfig::default(), &AddK).unwrap_err();
        assert!(matches!(err, HmmError::UnknownTag(t) if t == "B-MISC"));
    }

    #[test]
    fn test_empty_sequences_are_ignored() {
        let docs = vec![strings(&[]), strings(&["x"])];
        let labels = vec![strings(&[]), strings(&["O"])];
        let vocab = Vocabulary::build(&docs, 1);
        let tags = TagSet::new(["O"]).unwrap();
        let hmm = Hmm::train(&docs, &labels, vocab, tags, HmmConfig::default(), &AddK).unwrap();
        // one start over one tag
        assert_eq!(hmm.start_log_prob("O"), Some(0.0));
    }
}
