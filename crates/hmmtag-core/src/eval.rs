//! Token- and entity-level evaluation of predicted label sequences.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::bio::{Entity, extract_entities};
use crate::error::{HmmError, Result};

/// Match counts for one entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    /// Predicted entities that exactly match a gold entity.
    pub correct: usize,
    /// Entities in the predictions.
    pub predicted: usize,
    /// Entities in the gold standard.
    pub gold: usize,
}

impl EntityCounts {
    pub fn precision(&self) -> f64 {
        ratio(self.correct, self.predicted)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.correct, self.gold)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 }
    }

    fn merge(&mut self, other: &EntityCounts) {
        self.correct += other.correct;
        self.predicted += other.predicted;
        self.gold += other.gold;
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Accumulated evaluation over a set of sentences.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    pub tokens_correct: usize,
    pub tokens_total: usize,
    pub sequences_correct: usize,
    pub sequences_total: usize,
    pub by_type: BTreeMap<String, EntityCounts>,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one gold/predicted sentence pair.
    pub fn accumulate<G: AsRef<str>, P: AsRef<str>>(&mut self, gold: &[G], predicted: &[P]) -> Result<()> {
        if gold.len() != predicted.len() {
            return Err(HmmError::EvaluationMismatch(format!(
                "sentence has {} gold labels but {} predictions",
                gold.len(),
                predicted.len()
            )));
        }

        let matched = gold
            .iter()
            .zip(predicted)
            .filter(|&(g, p)| g.as_ref() == p.as_ref())
            .count();
        self.tokens_correct += matched;
        self.tokens_total += gold.len();
        if matched == gold.len() {
            self.sequences_correct += 1;
        }
        self.sequences_total += 1;

        let gold_entities = extract_entities(gold);
        let predicted_entities = extract_entities(predicted);
        let gold_set: HashSet<&Entity> = gold_entities.iter().collect();

        for entity in &gold_entities {
            self.counts_for(&entity.entity_type).gold += 1;
        }
        for entity in &predicted_entities {
            let counts = self.counts_for(&entity.entity_type);
            counts.predicted += 1;
            if gold_set.contains(entity) {
                counts.correct += 1;
            }
        }
        Ok(())
    }

    fn counts_for(&mut self, entity_type: &str) -> &mut EntityCounts {
        self.by_type.entry(entity_type.to_string()).or_default()
    }

    /// Fraction of tokens labeled correctly.
    pub fn accuracy(&self) -> f64 {
        ratio(self.tokens_correct, self.tokens_total)
    }

    /// Fraction of sentences labeled entirely correctly.
    pub fn sequence_accuracy(&self) -> f64 {
        ratio(self.sequences_correct, self.sequences_total)
    }

    /// Entity counts summed over all types (micro average).
    pub fn overall(&self) -> EntityCounts {
        let mut total = EntityCounts::default();
        for counts in self.by_type.values() {
            total.merge(counts);
        }
        total
    }

    pub fn precision(&self) -> f64 {
        self.overall().precision()
    }

    pub fn recall(&self) -> f64 {
        self.overall().recall()
    }

    pub fn f1(&self) -> f64 {
        self.overall().f1()
    }
}

/// Evaluate a corpus of predictions against gold labels.
pub fn evaluate<G, P>(gold: &[G], predicted: &[P]) -> Result<Evaluation>
where
    G: AsRef<[String]>,
    P: AsRef<[String]>,
{
    if gold.len() != predicted.len() {
        return Err(HmmError::EvaluationMismatch(format!(
            "{} gold sentences but {} predicted",
            gold.len(),
            predicted.len()
        )));
    }
    let mut eval = Evaluation::new();
    for (g, p) in gold.iter().zip(predicted) {
        eval.accumulate(g.as_ref(), p.as_ref())?;
    }
    Ok(eval)
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Performance by entity type (#match, #model, #ref) (precision, recall, F1):")?;
        for (ty, counts) in &self.by_type {
            writeln!(
                f,
                "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                ty,
                counts.correct,
                counts.predicted,
                counts.gold,
                counts.precision(),
                counts.recall(),
                counts.f1()
            )?;
        }
        let overall = self.overall();
        writeln!(
            f,
            "Micro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})",
            overall.precision(),
            overall.recall(),
            overall.f1()
        )?;
        writeln!(
            f,
            "Token accuracy: {}/{} => {:.4}",
            self.tokens_correct,
            self.tokens_total,
            self.accuracy()
        )?;
        write!(
            f,
            "Sequence accuracy: {}/{} => {:.4}",
            self.sequences_correct,
            self.sequences_total,
            self.sequence_accuracy()
        )
    }
}
