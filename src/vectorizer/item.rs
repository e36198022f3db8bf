use serde::{Deserialize, Serialize};

use crate::utils::math::{FixedVector, SparseVector};

/// Content profile of one item (or of a user, when aggregated)
///
/// Four independent components:
/// - `term`: TF-IDF weighted words of the searchable text
/// - `tag`: raw tag frequencies
/// - `category`: raw category frequencies
/// - `host`: single entry keyed by host id, valued with the host's IDF
///
/// Every operation treats the components independently; they never mix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemVector {
    pub term: SparseVector<String>,
    pub tag: SparseVector<String>,
    pub category: SparseVector<String>,
    pub host: SparseVector<String>,
}

impl ItemVector {
    pub fn new(
        term: SparseVector<String>,
        tag: SparseVector<String>,
        category: SparseVector<String>,
        host: SparseVector<String>,
    ) -> Self {
        ItemVector {
            term,
            tag,
            category,
            host,
        }
    }

    /// Additive zero: all four components empty
    pub fn identity() -> Self {
        ItemVector::default()
    }

    pub fn is_identity(&self) -> bool {
        self.term.is_empty() && self.tag.is_empty() && self.category.is_empty() && self.host.is_empty()
    }

    /// Component-wise sum, each component with its own counterpart
    pub fn add(&self, other: &ItemVector) -> ItemVector {
        ItemVector {
            term: self.term.add(&other.term),
            tag: self.tag.add(&other.tag),
            category: self.category.add(&other.category),
            host: self.host.add(&other.host),
        }
    }

    pub fn multiply(&self, scalar: f64) -> ItemVector {
        ItemVector {
            term: self.term.multiply(scalar),
            tag: self.tag.multiply(scalar),
            category: self.category.multiply(scalar),
            host: self.host.multiply(scalar),
        }
    }

    /// Weight tags and categories by their corpus IDF
    ///
    /// Tag and category become `component ⊙ idf`, normalised. Term already
    /// carries TF-IDF weights and host already carries its own IDF, so both
    /// pass through.
    pub fn apply_idfs(
        &self,
        tag_idf: &SparseVector<String>,
        category_idf: &SparseVector<String>,
    ) -> ItemVector {
        ItemVector {
            term: self.term.clone(),
            tag: self.tag.cartesian_product(tag_idf).normalised(),
            category: self.category.cartesian_product(category_idf).normalised(),
            host: self.host.clone(),
        }
    }

    /// Normalise each component on its own, not the concatenation
    pub fn normalise(&self) -> ItemVector {
        ItemVector {
            term: self.term.normalised(),
            tag: self.tag.normalised(),
            category: self.category.normalised(),
            host: self.host.normalised(),
        }
    }

    /// Per-component dot products plus one extra column
    ///
    /// Returns `[term·term, tag·tag, category·category, host·host, extra]`.
    pub fn combine(&self, other: &ItemVector, extra: f64) -> FixedVector {
        FixedVector::new([
            self.term.dot(&other.term),
            self.tag.dot(&other.tag),
            self.category.dot(&other.category),
            self.host.dot(&other.host),
            extra,
        ])
    }
}
