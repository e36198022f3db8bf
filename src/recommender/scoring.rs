use indexmap::IndexMap;
use tracing::debug;

use crate::error::{RecommendError, Result};
use crate::recommender::interaction::InteractionLedger;
use crate::recommender::repository::{Item, ItemRepository, UserId};
use crate::recommender::Recommender;
use crate::utils::math::{FixedVector, SparseVector};
use crate::vectorizer::corpus::CorpusStore;
use crate::vectorizer::item::ItemVector;
use crate::vectorizer::tfidf::IdfEngine;
use crate::vectorizer::token::Tokenizer;
use crate::vectorizer::label_vector;

/// Corpus-wide quantities shared by every score of one query
///
/// Built from the live item set; scores computed through one context are
/// identical to scores computed call by call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringContext {
    /// number of live items
    pub doc_num: u64,
    /// normalised tag -> idf
    pub tag_idf: SparseVector<String>,
    /// normalised category -> idf
    pub category_idf: SparseVector<String>,
}

impl ScoringContext {
    pub fn new<K, E>(items: &[Item<K>]) -> Self
    where
        E: IdfEngine,
    {
        let doc_num = items.len() as u64;
        ScoringContext {
            doc_num,
            tag_idf: label_idf::<E, _>(items.iter().map(|item| item.tags.as_slice()), doc_num),
            category_idf: label_idf::<E, _>(items.iter().map(|item| item.categories.as_slice()), doc_num),
        }
    }
}

/// ラベルごとに出現アイテム数を数えて IDF ベクトルを作る
fn label_idf<'a, E, I>(label_sets: I, doc_num: u64) -> SparseVector<String>
where
    E: IdfEngine,
    I: Iterator<Item = &'a [String]>,
{
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for labels in label_sets {
        // one count per item, even if a label repeats
        for (label, _) in label_vector(labels).iter() {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(label, count)| (label, E::idf(count, doc_num)))
        .collect::<SparseVector<String>>()
        .normalised()
}

/// Scoring implementations
impl<R, L, S, T, E> Recommender<R, L, S, T, E>
where
    R: ItemRepository,
    L: InteractionLedger<R::Key>,
    S: CorpusStore<R::Key>,
    T: Tokenizer,
    E: IdfEngine,
{
    /// Context over the current live item set
    pub fn scoring_context(&self) -> Result<ScoringContext> {
        let items = self.items.live_items()?;
        Ok(ScoringContext::new::<_, E>(&items))
    }

    pub(crate) fn require_item(&self, key: &R::Key) -> Result<Item<R::Key>> {
        self.items
            .item(key)?
            .ok_or_else(|| RecommendError::UnknownItem(format!("{:?}", key)))
    }

    /// Raw content vector of `item` for a corpus of `doc_num` items
    ///
    /// - term: TF-IDF from the corpus store, normalised
    /// - tag / category: frequency 1 per distinct case-folded label
    /// - host: host id weighted by `idf(items hosted, doc_num)`
    pub fn item_vector(&self, item: &Item<R::Key>, doc_num: u64) -> Result<ItemVector> {
        let term = self.corpus.term_vector::<E>(&item.key, doc_num)?;
        let host = match &item.host {
            Some(host) => {
                let hosted = self.items.host_item_count(host)?;
                SparseVector::new(vec![host.as_str().to_string()], vec![E::idf(hosted, doc_num)])
            }
            None => SparseVector::empty(),
        };
        Ok(ItemVector::new(
            term,
            label_vector(&item.tags),
            label_vector(&item.categories),
            host,
        ))
    }

    /// IDF-weighted vector used for item-item comparison
    ///
    /// Term, tag and category come out unit length; host keeps its IDF value
    /// so a shared rare host counts more than a shared prolific one.
    pub(crate) fn similarity_item_vector(&self, ctx: &ScoringContext, item: &Item<R::Key>) -> Result<ItemVector> {
        Ok(self
            .item_vector(item, ctx.doc_num)?
            .apply_idfs(&ctx.tag_idf, &ctx.category_idf))
    }

    /// `[term, tag, category, host, 1 / (distance + 1)]` from prepared vectors
    pub(crate) fn combine_items(
        &self,
        a: &Item<R::Key>,
        a_vec: &ItemVector,
        b: &Item<R::Key>,
        b_vec: &ItemVector,
    ) -> FixedVector {
        // 位置不明は距離無限大 -> 0
        let inv_distance = 1.0 / (self.items.distance(a, b) + 1.0);
        a_vec.combine(b_vec, inv_distance)
    }

    /// Combined similarity vector of two items, before weighting
    pub fn similarity_vector(&self, a: &R::Key, b: &R::Key) -> Result<FixedVector> {
        let ctx = self.scoring_context()?;
        let (a, b) = (self.require_item(a)?, self.require_item(b)?);
        let a_vec = self.similarity_item_vector(&ctx, &a)?;
        let b_vec = self.similarity_item_vector(&ctx, &b)?;
        Ok(self.combine_items(&a, &a_vec, &b, &b_vec))
    }

    /// Item-item similarity
    ///
    /// Exactly `1.0` when `a == b`; otherwise the similarity vector dotted
    /// with the weight vector.
    pub fn similarity(&self, a: &R::Key, b: &R::Key) -> Result<f64> {
        if a == b {
            return Ok(1.0);
        }
        Ok(self.similarity_vector(a, b)?.dot(&self.weight_vector))
    }

    /// Profile of `user` from their interaction history
    ///
    /// Sum of every target item's vector scaled by its interaction weight,
    /// normalised per component. No history gives the identity vector.
    /// Interactions with items that no longer exist are skipped.
    pub fn build_user_profile(&self, user: &UserId) -> Result<ItemVector> {
        let interactions = self.ledger.interactions_of(user)?;
        if interactions.is_empty() {
            return Ok(ItemVector::identity());
        }
        let doc_num = self.items.live_item_count()?;
        let mut profile = ItemVector::identity();
        for interaction in &interactions {
            let Some(item) = self.items.item(interaction.item())? else {
                debug!(user = %user, item = ?interaction.item(), "skip interaction with missing item");
                continue;
            };
            let weight = self.config.interaction_weights.weight_of(interaction);
            profile = profile.add(&self.item_vector(&item, doc_num)?.multiply(weight));
        }
        Ok(profile.normalise())
    }

    pub(crate) fn user_score_with(
        &self,
        ctx: &ScoringContext,
        item: &Item<R::Key>,
        weighted_profile: &ItemVector,
    ) -> Result<f64> {
        let item_vec = self
            .item_vector(item, ctx.doc_num)?
            .apply_idfs(&ctx.tag_idf, &ctx.category_idf);
        // profiles have no location: distance column is 0
        Ok(weighted_profile
            .combine(&item_vec, 0.0)
            .dot(&self.weight_vector))
    }

    /// Relevance of `item` to a user profile
    pub fn user_score(&self, item: &R::Key, profile: &ItemVector) -> Result<f64> {
        let ctx = self.scoring_context()?;
        let item = self.require_item(item)?;
        let weighted_profile = profile.apply_idfs(&ctx.tag_idf, &ctx.category_idf);
        self.user_score_with(&ctx, &item, &weighted_profile)
    }

    /// `0.5 * similarity(test, curr) + 0.5 * user_score(test, profile)`
    pub fn blended_score(&self, test: &R::Key, curr: &R::Key, profile: &ItemVector) -> Result<f64> {
        Ok(0.5 * self.similarity(test, curr)? + 0.5 * self.user_score(test, profile)?)
    }
}
