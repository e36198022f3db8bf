/// This crate is a content-based recommendation engine built on TF-IDF item vectors.
pub mod error;
pub mod recommender;
pub mod utils;
pub mod vectorizer;

/// Recommender
/// The top-level struct of this crate, providing item-item similarity,
/// user-item relevance and ranked recommendation queries.
///
/// Internally, it holds:
/// - An item repository (catalog of live items)
/// - An interaction ledger
/// - A corpus store (document terms and term associations)
/// - A corpus builder with its tokenizer
/// - The normalised component weight vector
///
/// `Recommender<R, L, S, T, E>` has the following generic parameters:
/// - `R`: Item repository type (e.g., `MemoryItemRepository<String>`)
/// - `L`: Interaction ledger type (e.g., `MemoryLedger<String>`)
/// - `S`: Corpus store type (e.g., `Corpus<String>`)
/// - `T`: Tokenizer type (default `WhitespaceTokenizer`)
/// - `E`: IDF engine type (default `DefaultIdfEngine`)
///
/// The corpus is rebuilt only on `force_recalculate`; call it after any change
/// to an item's text, tags, categories or existence.
///
/// # Thread Safety
/// Not synchronised. Queries take `&self`, mutations take `&mut self`.
pub use recommender::Recommender;

/// Recommender Configuration
/// Component weights, interaction weights and the page size cap.
/// Every field falls back to its default when missing from serialized input.
pub use recommender::config::{ComponentWeights, InteractionWeights, RecommenderConfig};

/// Ranking types
/// `Page` selects a window of a ranked list; `Recommendations` holds the
/// window together with the number of scored candidates.
pub use recommender::ranking::{Page, Recommendations};

/// Scoring context
/// Tag / category IDF tables and item count shared by one query.
pub use recommender::scoring::ScoringContext;

/// Catalog types and the item repository seam
pub use recommender::repository::{GeoPoint, Item, ItemRepository, MemoryItemRepository, UserId};

/// Interaction types and the ledger seam
pub use recommender::interaction::{Interaction, InteractionKind, InteractionLedger, MemoryLedger};

/// Corpus for the TF-IDF builder
/// This struct does not store item text; it only manages:
/// - The number of items indexed
/// - The number of items in which each term appears
/// - The raw term counts of each item
///
/// It is used as the base data for term IDF calculation.
///
/// # Serialization
/// Supported (CBOR snapshot via `to_cbor` / `from_cbor`).
pub use vectorizer::corpus::{Corpus, CorpusBuilder, CorpusStore};

/// Term Frequency structure
/// A struct for counting term occurrences within one document.
/// It manages:
/// - The count of occurrences of each term
/// - The total number of terms in the document
///
/// # Examples
/// ```
/// use tf_idf_recommender::TermFrequency;
/// let mut tf = TermFrequency::new();
/// tf.add_term("jazz");
/// tf.add_terms(&["jazz", "concert"]);
/// assert_eq!(tf.term_count("jazz"), 2);
/// assert_eq!(tf.term_sum(), 3);
/// ```
pub use vectorizer::token::TermFrequency;

/// Tokenizer seam and the default implementation
pub use vectorizer::token::{Tokenizer, WhitespaceTokenizer};

/// IDF engine
/// `DefaultIdfEngine` computes `ln((n + 1) / df)`, and 0 for unknown terms.
pub use vectorizer::tfidf::{DefaultIdfEngine, IdfEngine};

/// Item vector
/// Four independent sparse components: term, tag, category, host.
pub use vectorizer::item::ItemVector;

/// Sparse vector
/// Entries sorted by key with unique keys; binary operations are ordered merges.
///
/// # Examples
/// ```
/// use tf_idf_recommender::SparseVector;
/// let a = SparseVector::new(vec!["a", "b"], vec![1.0, 2.0]);
/// let b = SparseVector::new(vec!["b", "c"], vec![3.0, 4.0]);
/// assert_eq!(a.dot(&b), 6.0);
/// assert_eq!(a.add(&b).len(), 3);
/// ```
pub use utils::math::SparseVector;

/// Fixed-size dense vector (5 components by default)
pub use utils::math::FixedVector;

/// Error type
pub use error::{RecommendError, Result};
