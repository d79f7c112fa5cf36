//! Training configuration.

use std::path::Path;

use anyhow::Context;
use hmmtag_core::HmmConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to fit a model on a training split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Smoothing constants.
    pub hmm: HmmConfig,
    /// Tokens seen fewer times than this in training map to `<unk>`.
    pub min_count: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            hmm: HmmConfig::default(),
            min_count: 1,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hmm(mut self, hmm: HmmConfig) -> Self {
        self.hmm = hmm;
        self
    }

    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count.max(1);
        self
    }

    /// Read a configuration from a JSON file; missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.hmm.validate()?;
        Ok(config)
    }
}
