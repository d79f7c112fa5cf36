use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};

/// Add-k smoothing constants for the three probability tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmmConfig {
    /// Added to every transition count (`k_t`).
    pub k_transition: f64,
    /// Added to every emission count (`k_e`).
    pub k_emission: f64,
    /// Added to every start-state count (`k_s`).
    pub k_start: f64,
}

impl Default for HmmConfig {
    fn default() -> Self {
        Self {
            k_transition: 1.0,
            k_emission: 1.0,
            k_start: 1.0,
        }
    }
}

impl HmmConfig {
    /// Create a configuration with Laplace (add-one) smoothing everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k_transition(mut self, k: f64) -> Self {
        self.k_transition = k;
        self
    }

    pub fn with_k_emission(mut self, k: f64) -> Self {
        self.k_emission = k;
        self
    }

    pub fn with_k_start(mut self, k: f64) -> Self {
        self.k_start = k;
        self
    }

    /// Reject negative or non-finite constants.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("k_transition", self.k_transition),
            ("k_emission", self.k_emission),
            ("k_start", self.k_start),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HmmError::InvalidSmoothing { name, value });
            }
        }
        Ok(())
    }
}
