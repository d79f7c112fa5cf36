//! Fit, evaluate and tag with an HMM over dataset splits.

use anyhow::{Context, bail};
use hmmtag_core::{AddK, Evaluation, Hmm, TagSet, Vocabulary};
use hmmtag_data::{Dataset, Split};
use tracing::{debug, info};

use crate::config::TrainerConfig;

/// Outcome of training on `train` and scoring on `validation`.
#[derive(Debug)]
pub struct TrainingReport {
    pub model: Hmm,
    pub validation: Option<Evaluation>,
}

#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Estimate a model from a labeled split. The vocabulary and tag set
    /// come from the split itself.
    pub fn fit(&self, split: &Split) -> anyhow::Result<Hmm> {
        if !split.is_labeled() {
            bail!("cannot train on an unlabeled split");
        }
        if split.is_empty() {
            bail!("cannot train on an empty split");
        }

        let vocab = Vocabulary::build(&split.text, self.config.min_count);
        let tags = TagSet::from_labels(&split.ner).context("collecting tag set")?;
        debug!(vocab = vocab.len(), tags = tags.len(), "fitting");

        let model = Hmm::train(&split.text, &split.ner, vocab, tags, self.config.hmm, &AddK)
            .context("estimating hmm tables")?;
        Ok(model)
    }

    /// Tag every sentence of a split.
    pub fn predict(&self, model: &Hmm, split: &Split) -> anyhow::Result<Vec<Vec<String>>> {
        let mut predictions = Vec::with_capacity(split.len());
        for (i, sentence) in split.text.iter().enumerate() {
            let tagged = model
                .predict(sentence)
                .with_context(|| format!("decoding sentence {i}"))?;
            predictions.push(tagged);

            if (i + 1) % 1000 == 0 {
                debug!(done = i + 1, total = split.len(), "tagging");
            }
        }
        Ok(predictions)
    }

    /// Tag a labeled split and compare against its gold labels.
    pub fn evaluate(&self, model: &Hmm, split: &Split) -> anyhow::Result<Evaluation> {
        if !split.is_labeled() {
            bail!("cannot evaluate on an unlabeled split");
        }
        let predictions = self.predict(model, split)?;
        let evaluation = hmmtag_core::evaluate(&split.ner, &predictions)?;
        info!(
            accuracy = evaluation.accuracy(),
            f1 = evaluation.f1(),
            "evaluated"
        );
        Ok(evaluation)
    }

    /// Train on the training split and score on validation when it is labeled.
    pub fn run(&self, dataset: &Dataset) -> anyhow::Result<TrainingReport> {
        info!(sentences = dataset.train.len(), "training");
        let model = self.fit(&dataset.train)?;

        let validation = if dataset.validation.is_labeled() {
            Some(self.evaluate(&model, &dataset.validation)?)
        } else {
            None
        };

        Ok(TrainingReport { model, validation })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainerConfig::default())
    }
}
