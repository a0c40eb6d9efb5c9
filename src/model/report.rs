//! Derived reports and finished artifacts

use indexmap::IndexMap;
use serde::Serialize;

/// Missing-value counts per column, in table column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingValueReport {
    counts: IndexMap<String, usize>,
}

impl MissingValueReport {
    pub(crate) fn new(counts: IndexMap<String, usize>) -> Self {
        Self { counts }
    }

    /// Missing count for a column, `None` if the column is unknown
    pub fn get(&self, column: &str) -> Option<usize> {
        self.counts.get(column).copied()
    }

    /// Whether any column has a missing value
    pub fn has_missing(&self) -> bool {
        self.counts.values().any(|&n| n > 0)
    }

    /// Total number of missing cells
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Columns with at least one missing value
    pub fn columns_with_missing(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(name, &n)| (name.as_str(), n))
    }

    /// All (column, count) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(name, &n)| (name.as_str(), n))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// A finished export, ready to hand to the caller for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    bytes: Vec<u8>,
    media_type: &'static str,
    filename: String,
}

impl ExportArtifact {
    pub(crate) fn new(bytes: Vec<u8>, media_type: &'static str, filename: String) -> Self {
        Self {
            bytes,
            media_type,
            filename,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        self.media_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}
