//! # BIO Labels for Named Entity Recognition
//!
//! Helpers for the BIO (Begin-Inside-Outside) labeling scheme: parsing
//! label strings, checking sequence validity, grouping tokens into entity
//! spans and rendering tagged sentences as `[TYPE tok tok] word ...`.

use std::fmt;

/// Parsed view of a single BIO label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BioTag<'a> {
    /// `B-TYPE`: first token of an entity.
    Begin(&'a str),
    /// `I-TYPE`: continuation of an entity.
    Inside(&'a str),
    /// `O`: not part of any entity.
    Outside,
    /// Any label that does not follow the scheme.
    Other(&'a str),
}

impl<'a> BioTag<'a> {
    /// Parse a label string.
    pub fn parse(label: &'a str) -> Self {
        if let Some(ty) = label.strip_prefix("B-") {
            BioTag::Begin(ty)
        } else if let Some(ty) = label.strip_prefix("I-") {
            BioTag::Inside(ty)
        } else if label == "O" {
            BioTag::Outside
        } else {
            BioTag::Other(label)
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, BioTag::Begin(_))
    }

    pub fn is_inside(&self) -> bool {
        matches!(self, BioTag::Inside(_))
    }

    /// Entity type carried by a `B-`/`I-` label.
    pub fn entity_type(&self) -> Option<&'a str> {
        match *self {
            BioTag::Begin(ty) | BioTag::Inside(ty) => Some(ty),
            BioTag::Outside | BioTag::Other(_) => None,
        }
    }

    /// Check if `to` may directly follow `from`.
    ///
    /// `I-X` may not follow `O` or an entity label of another type. Labels
    /// outside the scheme constrain nothing.
    pub fn is_valid_transition(from: BioTag<'_>, to: BioTag<'_>) -> bool {
        if !to.is_inside() {
            return true;
        }
        match from {
            BioTag::Outside => false,
            BioTag::Other(_) => true,
            BioTag::Begin(_) | BioTag::Inside(_) => from.entity_type() == to.entity_type(),
        }
    }
}

impl fmt::Display for BioTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BioTag::Begin(ty) => write!(f, "B-{ty}"),
            BioTag::Inside(ty) => write!(f, "I-{ty}"),
            BioTag::Outside => write!(f, "O"),
            BioTag::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// An entity span over token indices, `start_token..end_token`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub entity_type: String,
    pub start_token: usize,
    pub end_token: usize,
}

impl Entity {
    pub fn len(&self) -> usize {
        self.end_token - self.start_token
    }

    pub fn is_empty(&self) -> bool {
        self.start_token == self.end_token
    }
}

#[derive(Debug)]
enum Segment {
    Word(usize),
    Entity(Entity),
}

fn close(open: &mut Option<(&str, usize)>, end: usize, out: &mut Vec<Segment>) {
    if let Some((ty, start)) = open.take() {
        out.push(Segment::Entity(Entity {
            entity_type: ty.to_string(),
            start_token: start,
            end_token: end,
        }));
    }
}

/// Group a label sequence into plain `O` words and entities.
///
/// `B-X` opens an entity, `I-X` extends it only if the open entity is of
/// type X, and anything else closes it. Tokens whose label breaks an entity
/// without being `O` are dropped.
fn segment<S: AsRef<str>>(ner: &[S]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<(&str, usize)> = None;

    for (i, label) in ner.iter().enumerate() {
        let tag = BioTag::parse(label.as_ref());
        if tag.is_inside() && open.map(|(cur, _)| cur) == tag.entity_type() {
            continue;
        }
        close(&mut open, i, &mut segments);
        if tag.is_begin() {
            open = tag.entity_type().map(|ty| (ty, i));
        } else if tag == BioTag::Outside {
            segments.push(Segment::Word(i));
        }
    }
    close(&mut open, ner.len(), &mut segments);

    segments
}

/// Extract entity spans from a BIO label sequence.
pub fn extract_entities<S: AsRef<str>>(ner: &[S]) -> Vec<Entity> {
    segment(ner)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Entity(e) => Some(e),
            Segment::Word(_) => None,
        })
        .collect()
}

/// Render a tagged sentence with entities grouped as `[TYPE tok1 ... tokN]`.
///
/// Tokens and labels are paired up to the shorter of the two. `O` tokens are
/// kept as-is, BIO prefixes are stripped and tokens with labels outside the
/// scheme are dropped. Returns an empty string if either input is empty.
///
/// ```rust
/// use hmmtag_core::bio::stringify_labeled_doc;
///
/// let text = ["Mark", "Twain", "lived", "in", "Hartford"];
/// let ner = ["B-PER", "I-PER", "O", "O", "B-LOC"];
/// assert_eq!(
///     stringify_labeled_doc(&text, &ner),
///     "[PER Mark Twain] lived in [LOC Hartford]"
/// );
/// ```
pub fn stringify_labeled_doc<T: AsRef<str>, S: AsRef<str>>(text: &[T], ner: &[S]) -> String {
    if text.is_empty() || ner.is_empty() {
        return String::new();
    }

    let n = text.len().min(ner.len());
    let pieces: Vec<String> = segment(&ner[..n])
        .into_iter()
        .map(|seg| match seg {
            Segment::Word(i) => text[i].as_ref().to_string(),
            Segment::Entity(e) => {
                let words: Vec<&str> = text[e.start_token..e.end_token]
                    .iter()
                    .map(|t| t.as_ref())
                    .collect();
                format!("[{} {}]", e.entity_type, words.join(" "))
            }
        })
        .collect();

    pieces.join(" ")
}

/// Check whether a label sequence obeys the BIO constraints.
///
/// An empty sequence is valid. `I-X` may not start the sequence, follow `O`,
/// or follow an entity label of a different type.
pub fn validate_ner_sequence<S: AsRef<str>>(ner: &[S]) -> bool {
    let mut previous = BioTag::Outside;
    for label in ner {
        let tag = BioTag::parse(label.as_ref());
        if !BioTag::is_valid_transition(previous, tag) {
            return false;
        }
        previous = tag;
    }
    true
}
