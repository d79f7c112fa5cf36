//! # Viterbi Decoding
//!
//! Finds the most likely tag sequence for a document under any model that
//! can score a tag given the previous one, with an explicit transition into
//! the absorbing end state after the last token.

use crate::error::{HmmError, Result};

/// Scores the decoder needs from a sequence model. Tags are indices into the
/// model's tag set.
pub trait TagScorer {
    /// Number of tags, excluding the end state.
    fn num_tags(&self) -> usize;

    /// Log score of `tag` starting a sequence.
    fn start_score(&self, tag: usize) -> f64;

    /// Log score of labeling `document[i]` with `predicted` when the
    /// previous token was labeled `previous` (`None` at position 0).
    fn likelihood<S: AsRef<str>>(
        &self,
        predicted: usize,
        previous: Option<usize>,
        document: &[S],
        i: usize,
    ) -> f64;

    /// Log score of moving from `previous` into the end state.
    fn end_score(&self, previous: usize) -> f64;
}

/// Best tag path and its log score.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub tags: Vec<usize>,
    pub log_probability: f64,
}

/// Path score and backpointer for Viterbi decoding.
#[derive(Debug, Clone, Copy)]
struct PathState {
    score: f64,
    prev_tag: usize,
}

/// Viterbi decoder over a [`TagScorer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ViterbiDecoder;

impl ViterbiDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode the optimal tag sequence for `document`.
    ///
    /// Ties go to the lowest tag index, so the result is deterministic even
    /// when every path scores `-inf`.
    pub fn decode<T, S>(&self, scorer: &T, document: &[S]) -> Result<Decoded>
    where
        T: TagScorer + ?Sized,
        S: AsRef<str>,
    {
        let seq_len = document.len();
        if seq_len == 0 {
            return Ok(Decoded {
                tags: Vec::new(),
                log_probability: 0.0,
            });
        }

        let num_tags = scorer.num_tags();
        if num_tags == 0 {
            return Err(HmmError::EmptyTagSet);
        }

        // dp[pos][tag]
        let mut dp: Vec<Vec<PathState>> = vec![
            vec![
                PathState {
                    score: f64::NEG_INFINITY,
                    prev_tag: 0,
                };
                num_tags
            ];
            seq_len
        ];

        for tag in 0..num_tags {
            dp[0][tag].score = scorer.start_score(tag) + scorer.likelihood(tag, None, document, 0);
        }

        // Forward pass
        for pos in 1..seq_len {
            for curr_tag in 0..num_tags {
                let mut best_score = f64::NEG_INFINITY;
                let mut best_prev = 0;

                for prev_tag in 0..num_tags {
                    let score = dp[pos - 1][prev_tag].score
                        + scorer.likelihood(curr_tag, Some(prev_tag), document, pos);
                    if score > best_score {
                        best_score = score;
                        best_prev = prev_tag;
                    }
                }

                dp[pos][curr_tag] = PathState {
                    score: best_score,
                    prev_tag: best_prev,
                };
            }
        }

        // Transition into the end state
        let last = &dp[seq_len - 1];
        let mut best_final_tag = 0;
        let mut best_final_score = f64::NEG_INFINITY;
        for (tag, state) in last.iter().enumerate() {
            let score = state.score + scorer.end_score(tag);
            if score > best_final_score {
                best_final_score = score;
                best_final_tag = tag;
            }
        }

        // Backtrack
        let mut path = Vec::with_capacity(seq_len);
        path.push(best_final_tag);
        let mut curr_tag = best_final_tag;
        for pos in (1..seq_len).rev() {
            curr_tag = dp[pos][curr_tag].prev_tag;
            path.push(curr_tag);
        }
        path.reverse();

        Ok(Decoded {
            tags: path,
            log_probability: best_final_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table-driven scorer: `emit[tag][token]` and `trans[prev][curr]`, with
    /// tokens given as their index in decimal.
    struct TableScorer {
        start: Vec<f64>,
        trans: Vec<Vec<f64>>,
        emit: Vec<Vec<f64>>,
        end: Vec<f64>,
    }

    impl TagScorer for TableScorer {
        fn num_tags(&self) -> usize {
            self.start.len()
        }

        fn start_score(&self, tag: usize) -> f64 {
            self.start[tag]
        }

        fn likelihood<S: AsRef<str>>(
            &self,
            predicted: usize,
            previous: Option<usize>,
            document: &[S],
            i: usize,
        ) -> f64 {
            let token: usize = document[i].as_ref().parse().unwrap();
            let emission = self.emit[predicted][token];
            match previous {
                None => emission,
                Some(prev) => self.trans[prev][predicted] + emission,
            }
        }

        fn end_score(&self, previous: usize) -> f64 {
            self.end[previous]
        }
    }

    fn ln(p: f64) -> f64 {
        p.ln()
    }

    /// Classic two-state weather model (rainy=0, sunny=1) over
    /// walk=0, shop=1, clean=2.
    fn weather() -> TableScorer {
        TableScorer {
            start: vec![ln(0.6), ln(0.4)],
            trans: vec![vec![ln(0.7), ln(0.3)], vec![ln(0.4), ln(0.6)]],
            emit: vec![
                vec![ln(0.1), ln(0.4), ln(0.5)],
                vec![ln(0.6), ln(0.3), ln(0.1)],
            ],
            end: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_viterbi_weather() {
        let decoded = ViterbiDecoder::new()
            .decode(&weather(), &["0", "1", "2"])
            .unwrap();
        assert_eq!(decoded.tags, vec![1, 0, 0]);
        let expected = ln(0.4 * 0.6 * 0.4 * 0.4 * 0.7 * 0.5);
        assert!((decoded.log_probability - expected).abs() < 1e-9);
    }

    #[test]
    fn test_viterbi_empty() {
        let empty: [&str; 0] = [];
        let decoded = ViterbiDecoder::new().decode(&weather(), &empty).unwrap();
        assert!(decoded.tags.is_empty());
        assert_eq!(decoded.log_probability, 0.0);
    }

    #[test]
    fn test_end_transition_changes_path() {
        let mut scorer = weather();
        // a single "walk" favors sunny, unless sunny can never end a sequence
        let decoded = ViterbiDecoder::new().decode(&scorer, &["0"]).unwrap();
        assert_eq!(decoded.tags, vec![1]);

        scorer.end = vec![0.0, f64::NEG_INFINITY];
        let decoded = ViterbiDecoder::new().decode(&scorer, &["0"]).unwrap();
        assert_eq!(decoded.tags, vec![0]);
    }

    #[test]
    fn test_impossible_input_still_decodes() {
        let mut scorer = weather();
        scorer.emit = vec![vec![f64::NEG_INFINITY; 3]; 2];
        let decoded = ViterbiDecoder::new()
            .decode(&scorer, &["0", "1"])
            .unwrap();
        assert_eq!(decoded.tags, vec![0, 0]);
        assert_eq!(decoded.log_probability, f64::NEG_INFINITY);
    }

    #[test]
    fn test_ties_go_to_lowest_tag() {
        let scorer = TableScorer {
            start: vec![ln(0.5), ln(0.5)],
            trans: vec![vec![ln(0.5), ln(0.5)], vec![ln(0.5), ln(0.5)]],
            emit: vec![vec![ln(0.5)], vec![ln(0.5)]],
            end: vec![0.0, 0.0],
        };
        let decoded = ViterbiDecoder::new().decode(&scorer, &["0", "0"]).unwrap();
        assert_eq!(decoded.tags, vec![0, 0]);
        assert!((decoded.log_probability - ln(0.0625)).abs() < 1e-9);
    }

    #[test]
    fn test_no_tags_is_an_error() {
        let scorer = TableScorer {
            start: vec![],
            trans: vec![],
            emit: vec![],
            end: vec![],
        };
        assert!(matches!(
            ViterbiDecoder::new().decode(&scorer, &["0"]),
            Err(HmmError::EmptyTagSet)
        ));
    }
}
