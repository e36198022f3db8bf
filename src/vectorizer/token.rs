use std::fmt::Debug;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tokenizer seam
/// Turns free text into a word multiset. Case folding and stopword policy
/// belong to the implementation.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> TermFrequency;
}

/// Splits on anything that is not alphanumeric and lowercases every word
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> TermFrequency {
        let mut freq = TermFrequency::new();
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .for_each(|word| {
                freq.add_term(&word.to_lowercase());
            });
        freq
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> TermFrequency,
{
    fn tokenize(&self, text: &str) -> TermFrequency {
        self(text)
    }
}

///  TermFrequency 構造体
/// Word multiset of one document: occurrence count per term, in first-seen
/// order, plus the total number of words.
///
/// # Examples
/// ```
/// use tf_idf_recommender::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["concert", "jazz", "concert"]);
/// assert_eq!(freq.term_count("concert"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u64>,
    total_term_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// termを追加する
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        *self.term_count.entry(term.to_string()).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Merge the counts of another multiset into this one
    pub fn add_terms_from_freq(&mut self, other: &TermFrequency) -> &mut Self {
        for (term, &count) in &other.term_count {
            *self.term_count.entry(term.clone()).or_insert(0) += count;
            self.total_term_count += count;
        }
        self
    }

    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of words, duplicates included
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// (term, count) in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.term_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }
}
