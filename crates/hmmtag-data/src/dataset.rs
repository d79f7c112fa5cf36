//! JSON dataset splits.
//!
//! Each split is a JSON object with parallel `text` and `NER` arrays of
//! token and label sequences. Other keys are ignored. Unlabeled splits (a
//! held-out test set) may omit `NER`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::archive::unzip_data;
use crate::error::{DataError, Result};

/// File names of the three splits inside a dataset directory.
pub const TRAIN_FILE: &str = "train.json";
pub const VALIDATION_FILE: &str = "val.json";
pub const TEST_FILE: &str = "test.json";

/// Read a UTF-8 JSON file into any deserializable value.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// One split of a tagged corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Token sequences.
    pub text: Vec<Vec<String>>,
    /// Label sequences, parallel to `text`. Empty for unlabeled splits.
    #[serde(rename = "NER", default, skip_serializing_if = "Vec::is_empty")]
    pub ner: Vec<Vec<String>>,
}

impl Split {
    pub fn new(text: Vec<Vec<String>>, ner: Vec<Vec<String>>) -> Self {
        Self { text, ner }
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the split carries labels.
    pub fn is_labeled(&self) -> bool {
        !self.ner.is_empty()
    }

    /// Iterate `(tokens, labels)` pairs of a labeled split.
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &[String])> {
        self.text
            .iter()
            .zip(&self.ner)
            .map(|(t, n)| (t.as_slice(), n.as_slice()))
    }

    /// Check that labels, when present, line up with the tokens.
    pub fn validate(&self) -> Result<()> {
        if !self.is_labeled() {
            return Ok(());
        }
        if self.text.len() != self.ner.len() {
            return Err(DataError::MalformedSplit(format!(
                "{} sentences but {} label sequences",
                self.text.len(),
                self.ner.len()
            )));
        }
        for (i, (tokens, labels)) in self.iter().enumerate() {
            if tokens.len() != labels.len() {
                return Err(DataError::MalformedSplit(format!(
                    "sentence {i} has {} tokens but {} labels",
                    tokens.len(),
                    labels.len()
                )));
            }
        }
        Ok(())
    }
}

/// Train, validation and test splits of a corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub train: Split,
    pub validation: Split,
    pub test: Split,
}

impl Dataset {
    /// Load the three splits from an already extracted directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let dataset = Self {
            train: read_split(&dir.join(TRAIN_FILE))?,
            validation: read_split(&dir.join(VALIDATION_FILE))?,
            test: read_split(&dir.join(TEST_FILE))?,
        };
        info!(
            train = dataset.train.len(),
            validation = dataset.validation.len(),
            test = dataset.test.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

fn read_split(path: &Path) -> Result<Split> {
    let split: Split = read_json(path)?;
    split.validate()?;
    Ok(split)
}

/// Unzip `data_zip_path` into `dest_path` and load its splits.
pub fn load_dataset(data_zip_path: impl AsRef<Path>, dest_path: impl AsRef<Path>) -> Result<Dataset> {
    unzip_data(data_zip_path.as_ref(), dest_path.as_ref())?;
    Dataset::from_dir(dest_path)
}
