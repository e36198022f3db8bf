pub mod config;
pub mod interaction;
pub mod ranking;
pub mod repository;
pub mod scoring;

use std::marker::PhantomData;

use tracing::debug;

use crate::error::Result;
use crate::utils::math::FixedVector;
use crate::vectorizer::corpus::{CorpusBuilder, CorpusStore};
use crate::vectorizer::tfidf::{DefaultIdfEngine, IdfEngine};
use crate::vectorizer::token::{Tokenizer, WhitespaceTokenizer};

use self::config::RecommenderConfig;
use self::interaction::{Interaction, InteractionKind, InteractionLedger};
use self::repository::{ItemRepository, UserId};

/// Content based recommender
///
/// `Recommender<R, L, S, T, E>` has the following generic parameters:
/// - `R`: item repository (catalog of live items)
/// - `L`: interaction ledger
/// - `S`: corpus store holding document terms and term associations
/// - `T`: tokenizer used by corpus rebuilds
/// - `E`: IDF engine
///
/// The corpus is not kept in sync automatically: call
/// [`force_recalculate`](Recommender::force_recalculate) after any change to an
/// item's text, tags, categories or existence, before querying.
#[derive(Debug)]
pub struct Recommender<R, L, S, T = WhitespaceTokenizer, E = DefaultIdfEngine>
where
    R: ItemRepository,
    L: InteractionLedger<R::Key>,
    S: CorpusStore<R::Key>,
    T: Tokenizer,
    E: IdfEngine,
{
    items: R,
    ledger: L,
    corpus: S,
    builder: CorpusBuilder<T>,
    config: RecommenderConfig,
    /// L2-normalised component weights, fixed at construction
    weight_vector: FixedVector,
    _marker: PhantomData<E>,
}

impl<R, L, S, T> Recommender<R, L, S, T>
where
    R: ItemRepository,
    L: InteractionLedger<R::Key>,
    S: CorpusStore<R::Key>,
    T: Tokenizer,
{
    /// Create a recommender using the default IDF engine
    pub fn new(items: R, ledger: L, corpus: S, tokenizer: T, config: RecommenderConfig) -> Result<Self> {
        Self::with_engine(items, ledger, corpus, tokenizer, config)
    }
}

impl<R, L, S, T, E> Recommender<R, L, S, T, E>
where
    R: ItemRepository,
    L: InteractionLedger<R::Key>,
    S: CorpusStore<R::Key>,
    T: Tokenizer,
    E: IdfEngine,
{
    /// Create a recommender with an explicit IDF engine `E`
    pub fn with_engine(items: R, ledger: L, corpus: S, tokenizer: T, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let weight_vector = config.weights.as_vector().normalised();
        Ok(Self {
            items,
            ledger,
            corpus,
            builder: CorpusBuilder::new(tokenizer),
            config,
            weight_vector,
            _marker: PhantomData,
        })
    }

    pub fn items(&self) -> &R {
        &self.items
    }

    /// Mutable catalog access
    /// Content changes only show in scores after `force_recalculate`.
    pub fn items_mut(&mut self) -> &mut R {
        &mut self.items
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn corpus(&self) -> &S {
        &self.corpus
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn weight_vector(&self) -> &FixedVector {
        &self.weight_vector
    }

    /// Rebuild the corpus tables from every live item
    ///
    /// Must run after any mutation affecting an item's text, tags,
    /// categories or existence, and before a query that has to reflect it.
    pub fn force_recalculate(&mut self) -> Result<()> {
        let items = self.items.live_items()?;
        let documents = items
            .into_iter()
            .map(|item| {
                let text = item.searchable_text();
                (item.key, text)
            });
        self.builder.rebuild(documents, &mut self.corpus)
    }

    /// Append a non-review interaction
    ///
    /// # Panics
    /// If `kind` is `Review`: ratings go through [`record_rating`](Self::record_rating).
    pub fn record_interaction(&mut self, user: &UserId, item: &R::Key, kind: InteractionKind) -> Result<()> {
        assert!(
            kind != InteractionKind::Review,
            "record_interaction cannot record reviews, use record_rating"
        );
        debug!(user = %user, item = ?item, kind = ?kind, "record interaction");
        self.ledger
            .append(Interaction::new(user.clone(), item.clone(), kind))
    }

    /// Append a review interaction carrying `rating`
    pub fn record_rating(&mut self, user: &UserId, item: &R::Key, rating: f64) -> Result<()> {
        debug!(user = %user, item = ?item, rating, "record rating");
        self.ledger
            .append(Interaction::review(user.clone(), item.clone(), rating))
    }
}
