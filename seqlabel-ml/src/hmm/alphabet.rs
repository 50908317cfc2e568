//! Label ↔ index mapping for states and observation symbols.

use std::collections::BTreeMap;

use seqlabel_core::{LabelKind, Result, SeqLabelError};

/// A finite, sorted set of labels with dense indices `0..len()`.
///
/// Indices follow byte-lexicographic label order, so two alphabets built
/// from the same labels always agree, whatever order the labels arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    kind: LabelKind,
    labels: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl Alphabet {
    /// Build an alphabet from labels; duplicates collapse to one entry.
    pub fn new<I, S>(kind: LabelKind, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort_unstable();
        labels.dedup();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self {
            kind,
            labels,
            index,
        }
    }

    /// Whether this alphabet holds states or observation symbols.
    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the alphabet has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of `label`.
    ///
    /// # Errors
    ///
    /// Returns [`SeqLabelError::UnknownLabel`] if the label is not in the alphabet.
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| SeqLabelError::unknown_label(self.kind, label))
    }

    /// Label at `index`, if in range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Map a label sequence to indices, failing on the first unknown label.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.index_of(l.as_ref())).collect()
    }

    /// Map an index sequence back to labels.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is out of range.
    pub fn decode(&self, indices: &[usize]) -> Result<Vec<String>> {
        indices
            .iter()
            .map(|&i| {
                self.label(i).map(str::to_owned).ok_or_else(|| {
                    SeqLabelError::InvalidInput(format!(
                        "{} index {i} out of range (len = {})",
                        self.kind,
                        self.len()
                    ))
                })
            })
            .collect()
    }
}
