use std::fmt::{self, Debug};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecommendError, Result};
use crate::recommender::interaction::InteractionLedger;
use crate::recommender::repository::{Item, ItemRepository, UserId};
use crate::recommender::scoring::ScoringContext;
use crate::recommender::Recommender;
use crate::vectorizer::corpus::CorpusStore;
use crate::vectorizer::tfidf::IdfEngine;
use crate::vectorizer::token::Tokenizer;

/// Window into a ranked list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// ranked results skipped before the window
    pub start: usize,
    /// window size, `1..=cap`
    pub max_results: usize,
}

impl Page {
    pub fn new(start: usize, max_results: usize) -> Self {
        Page { start, max_results }
    }

    /// First `max_results` results
    pub fn first(max_results: usize) -> Self {
        Page::new(0, max_results)
    }

    pub fn validate(&self, cap: usize) -> Result<()> {
        if self.max_results == 0 || self.max_results > cap {
            return Err(RecommendError::InvalidPage {
                start: self.start,
                max_results: self.max_results,
                cap,
            });
        }
        Ok(())
    }
}

/// Ranked recommendation results
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations<K> {
    /// (item key, score), best first
    pub hits: Vec<(K, f64)>,
    /// Number of candidates scored before paging
    pub total: usize,
}

impl<K> Recommendations<K> {
    /// Rank scored candidates and cut out `page`
    pub fn ranked(mut scored: Vec<(K, f64)>, page: Page) -> Self {
        // NaN は順位付けできないので落とす
        scored.retain(|(_, s)| !s.is_nan());
        // stable: ties keep repository order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let total = scored.len();
        let hits = scored
            .into_iter()
            .skip(page.start)
            .take(page.max_results)
            .collect();
        Recommendations { hits, total }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.hits.iter().map(|(k, _)| k)
    }
}

impl<K> Debug for Recommendations<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Recommendations ({} total) [", self.total)?;
            for (key, score) in &self.hits {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("Recommendations")
                .field("hits", &self.hits)
                .field("total", &self.total)
                .finish()
        }
    }
}

/// Live items still worth recommending at `now`
fn candidates<'a, K>(
    items: &'a [Item<K>],
    now: SystemTime,
    exclude: Option<&'a K>,
    user: Option<&'a UserId>,
) -> impl Iterator<Item = &'a Item<K>> + 'a
where
    K: PartialEq,
{
    items.iter().filter(move |item| {
        item.is_recommendable(now)
            && exclude.map_or(true, |key| &item.key != key)
            && user.map_or(true, |user| !item.is_hosted_by(user))
    })
}

/// Ranking queries
impl<R, L, S, T, E> Recommender<R, L, S, T, E>
where
    R: ItemRepository,
    L: InteractionLedger<R::Key>,
    S: CorpusStore<R::Key>,
    T: Tokenizer,
    E: IdfEngine,
{
    /// Items most similar to `item`
    pub fn recommend_similar(
        &self,
        item: &R::Key,
        page: Page,
        now: SystemTime,
    ) -> Result<Recommendations<R::Key>> {
        page.validate(self.config.max_results)?;
        let items = self.items.live_items()?;
        let ctx = ScoringContext::new::<_, E>(&items);
        let reference = self.require_item(item)?;
        let reference_vec = self.similarity_item_vector(&ctx, &reference)?;

        let mut scored = Vec::new();
        for candidate in candidates(&items, now, Some(item), None) {
            let candidate_vec = self.similarity_item_vector(&ctx, candidate)?;
            let score = self
                .combine_items(&reference, &reference_vec, candidate, &candidate_vec)
                .dot(&self.weight_vector);
            scored.push((candidate.key.clone(), score));
        }
        debug!(item = ?item, candidates = scored.len(), "similar items ranked");
        Ok(Recommendations::ranked(scored, page))
    }

    /// Items most relevant to `user`'s interaction history
    pub fn recommend_for_user(
        &self,
        user: &UserId,
        page: Page,
        now: SystemTime,
    ) -> Result<Recommendations<R::Key>> {
        page.validate(self.config.max_results)?;
        let items = self.items.live_items()?;
        let ctx = ScoringContext::new::<_, E>(&items);
        let profile = self
            .build_user_profile(user)?
            .apply_idfs(&ctx.tag_idf, &ctx.category_idf);

        let mut scored = Vec::new();
        for candidate in candidates(&items, now, None, Some(user)) {
            let score = self.user_score_with(&ctx, candidate, &profile)?;
            scored.push((candidate.key.clone(), score));
        }
        debug!(user = %user, candidates = scored.len(), "user recommendations ranked");
        Ok(Recommendations::ranked(scored, page))
    }

    /// Items ranked by `blended_score` against `item` and `user`
    pub fn recommend_blended(
        &self,
        user: &UserId,
        item: &R::Key,
        page: Page,
        now: SystemTime,
    ) -> Result<Recommendations<R::Key>> {
        page.validate(self.config.max_results)?;
        let items = self.items.live_items()?;
        let ctx = ScoringContext::new::<_, E>(&items);
        let reference = self.require_item(item)?;
        let reference_vec = self.similarity_item_vector(&ctx, &reference)?;
        let profile = self
            .build_user_profile(user)?
            .apply_idfs(&ctx.tag_idf, &ctx.category_idf);

        let mut scored = Vec::new();
        for candidate in candidates(&items, now, Some(item), Some(user)) {
            let candidate_vec = self.similarity_item_vector(&ctx, candidate)?;
            let similarity = self
                .combine_items(&reference, &reference_vec, candidate, &candidate_vec)
                .dot(&self.weight_vector);
            let user_score = self.user_score_with(&ctx, candidate, &profile)?;
            scored.push((candidate.key.clone(), 0.5 * similarity + 0.5 * user_score));
        }
        debug!(user = %user, item = ?item, candidates = scored.len(), "blended recommendations ranked");
        Ok(Recommendations::ranked(scored, page))
    }
}
