//! # Tag Sets and Vocabularies
//!
//! Index-addressable label and token inventories. Probability tables are
//! stored densely, so both sets map their entries to stable row/column
//! indices in insertion order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};

/// The absorbing final state. It can be entered but never left, emits
/// nothing and never starts a sequence.
pub const END_TAG: &str = "qf";

/// Token that stands in for anything outside the vocabulary.
pub const UNK_TOKEN: &str = "<unk>";

/// Ordered set of hidden states, excluding [`END_TAG`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet {
    tags: Vec<String>,
    index: HashMap<String, usize>,
}

impl TagSet {
    /// Build a tag set from tags in the desired index order.
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self {
            tags: Vec::new(),
            index: HashMap::new(),
        };
        for tag in tags {
            let tag = tag.into();
            if tag.is_empty() || tag == END_TAG {
                return Err(HmmError::ReservedTag(tag));
            }
            if set.index.contains_key(&tag) {
                return Err(HmmError::DuplicateTag(tag));
            }
            set.index.insert(tag.clone(), set.tags.len());
            set.tags.push(tag);
        }
        if set.tags.is_empty() {
            return Err(HmmError::EmptyTagSet);
        }
        Ok(set)
    }

    /// Collect every distinct label from a labeled corpus, sorted.
    pub fn from_labels<'a, I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a L>,
        L: AsRef<[String]> + 'a + ?Sized,
    {
        let mut seen: Vec<String> = labels
            .into_iter()
            .flat_map(|seq| seq.as_ref().iter().cloned())
            .collect();
        seen.sort();
        seen.dedup();
        Self::new(seen)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Index of `tag`, if it belongs to the set.
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).copied()
    }

    /// Tag at `idx`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.tags.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }
}

impl TryFrom<Vec<String>> for TagSet {
    type Error = HmmError;

    fn try_from(tags: Vec<String>) -> Result<Self> {
        Self::new(tags)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.tags
    }
}

/// Ordered token inventory with optional `<unk>` fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from tokens in the desired index order.
    /// Repeated tokens keep their first index.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for token in tokens {
            vocab.insert(token.into());
        }
        vocab
    }

    /// Build a vocabulary from a corpus, keeping tokens that occur at least
    /// `min_count` times. `<unk>` is always present and comes first.
    pub fn build<'a, I, D>(documents: I, min_count: usize) -> Self
    where
        I: IntoIterator<Item = &'a D>,
        D: AsRef<[String]> + 'a + ?Sized,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for doc in documents {
            for token in doc.as_ref() {
                let count = counts.entry(token.as_str()).or_insert_with(|| {
                    order.push(token.as_str());
                    0
                });
                *count += 1;
            }
        }

        let mut vocab = Self::new([UNK_TOKEN]);
        for token in order {
            if counts[token] >= min_count.max(1) {
                vocab.insert(token.to_string());
            }
        }
        tracing::debug!(size = vocab.len(), min_count, "built vocabulary");
        vocab
    }

    fn insert(&mut self, token: String) {
        if !self.index.contains_key(&token) {
            self.index.insert(token.clone(), self.tokens.len());
            self.tokens.push(token);
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether `token` is in the vocabulary verbatim.
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Index of `token`, falling back to `<unk>` when the vocabulary has one.
    pub fn lookup(&self, token: &str) -> Option<usize> {
        self.index
            .get(token)
            .or_else(|| self.index.get(UNK_TOKEN))
            .copied()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
