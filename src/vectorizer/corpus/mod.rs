use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::utils::math::SparseVector;
use crate::vectorizer::tfidf::IdfEngine;
use crate::vectorizer::token::{TermFrequency, Tokenizer, WhitespaceTokenizer};

/// Corpus statistics rebuilt from the live item set
///
/// It holds two tables that are always replaced together:
/// - document terms: term -> number of distinct items containing it
/// - term associations: item -> (term, raw in-item count) pairs
///
/// Tables are never patched incrementally; see [`CorpusBuilder::rebuild`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash"
))]
pub struct Corpus<K> {
    /// number of items indexed by the last rebuild
    doc_num: u64,
    /// term -> document frequency
    document_terms: IndexMap<Box<str>, u64>,
    /// item -> raw term counts, in first-seen order
    term_associations: IndexMap<K, Vec<(Box<str>, u64)>>,
}

impl<K> Corpus<K>
where
    K: Eq + Hash,
{
    /// Create an empty corpus
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            document_terms: IndexMap::new(),
            term_associations: IndexMap::new(),
        }
    }

    /// Drop both tables
    pub fn clear(&mut self) {
        self.doc_num = 0;
        self.document_terms.clear();
        self.term_associations.clear();
    }

    /// Record one item's word multiset
    /// Each distinct term bumps its document frequency exactly once.
    pub fn add_document(&mut self, key: K, freq: &TermFrequency) {
        self.doc_num += 1;
        let mut counts = Vec::with_capacity(freq.term_num());
        for (term, count) in freq.iter() {
            *self.document_terms.entry(Box::from(term)).or_insert(0) += 1;
            counts.push((Box::from(term), count));
        }
        self.term_associations.insert(key, counts);
    }

    /// Number of items indexed by the last rebuild
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.document_terms.len()
    }

    #[inline]
    pub fn get_doc_freq(&self, term: &str) -> u64 {
        self.document_terms.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn get_term_counts(&self, key: &K) -> &[(Box<str>, u64)] {
        self.term_associations
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// (term, document frequency) in first-seen order
    pub fn document_terms(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.document_terms.iter().map(|(t, &c)| (t.as_ref(), c))
    }
}

impl<K> PartialEq for Corpus<K>
where
    K: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.doc_num == other.doc_num
            && self.document_terms == other.document_terms
            && self.term_associations == other.term_associations
    }
}

impl<K> Default for Corpus<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot encoding
impl<K> Corpus<K>
where
    K: Eq + Hash + Serialize + for<'de> Deserialize<'de>,
{
    /// Encode both tables as CBOR
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

/// Corpus store seam
///
/// Holds the document-term and term-association tables between rebuilds.
/// Errors are passed to the caller unchanged.
pub trait CorpusStore<K> {
    /// Replace both tables with a freshly rebuilt corpus
    fn replace(&mut self, corpus: Corpus<K>) -> Result<()>;

    /// Document frequency of `term`, 0 when unknown
    fn document_frequency(&self, term: &str) -> Result<u64>;

    /// Raw (term, count) pairs recorded for `item`
    fn term_counts(&self, item: &K) -> Result<Vec<(Box<str>, u64)>>;

    /// L2-normalised TF-IDF vector of `item`
    ///
    /// Each entry is `raw_count * idf(doc_freq, doc_num)`. Terms without a
    /// recorded document frequency weigh 0.
    fn term_vector<E>(&self, item: &K, doc_num: u64) -> Result<SparseVector<String>>
    where
        E: IdfEngine,
        Self: Sized,
    {
        let counts = self.term_counts(item)?;
        let mut entries = Vec::with_capacity(counts.len());
        for (term, count) in counts {
            let doc_freq = self.document_frequency(&term)?;
            entries.push((term.into_string(), count as f64 * E::idf(doc_freq, doc_num)));
        }
        Ok(entries.into_iter().collect::<SparseVector<String>>().normalised())
    }
}

impl<K> CorpusStore<K> for Corpus<K>
where
    K: Eq + Hash,
{
    fn replace(&mut self, corpus: Corpus<K>) -> Result<()> {
        *self = corpus;
        Ok(())
    }

    fn document_frequency(&self, term: &str) -> Result<u64> {
        Ok(self.get_doc_freq(term))
    }

    fn term_counts(&self, item: &K) -> Result<Vec<(Box<str>, u64)>> {
        Ok(self.get_term_counts(item).to_vec())
    }
}

/// Full corpus rebuild
#[derive(Debug, Clone, Default)]
pub struct CorpusBuilder<T = WhitespaceTokenizer>
where
    T: Tokenizer,
{
    tokenizer: T,
}

impl<T> CorpusBuilder<T>
where
    T: Tokenizer,
{
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    /// Build a corpus from (key, searchable text) pairs
    pub fn build<K, I, S>(&self, documents: I) -> Corpus<K>
    where
        K: Eq + Hash,
        I: IntoIterator<Item = (K, S)>,
        S: AsRef<str>,
    {
        let mut corpus = Corpus::new();
        for (key, text) in documents {
            let freq = self.tokenizer.tokenize(text.as_ref());
            corpus.add_document(key, &freq);
        }
        corpus
    }

    /// Clear and rebuild `store` from every document
    ///
    /// O(total word count), synchronous. Running it twice without an
    /// intervening mutation yields identical tables.
    pub fn rebuild<K, I, S, C>(&self, documents: I, store: &mut C) -> Result<()>
    where
        K: Eq + Hash,
        I: IntoIterator<Item = (K, S)>,
        S: AsRef<str>,
        C: CorpusStore<K>,
    {
        let corpus = self.build(documents);
        info!(
            doc_num = corpus.doc_num(),
            vocab_size = corpus.vocab_size(),
            "corpus rebuilt"
        );
        store.replace(corpus)
    }
}
