use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::recommender::repository::UserId;

/// Kind of recorded user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    View,
    Purchase,
    Comment,
    React,
    /// Only recorded through `Recommender::record_rating`; carries a rating
    Review,
}

/// Immutable record of a user acting on an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction<K> {
    user: UserId,
    item: K,
    kind: InteractionKind,
    rating: Option<f64>,
    at: SystemTime,
}

impl<K> Interaction<K> {
    /// Non-review interaction stamped with the current time
    ///
    /// # Panics
    /// If `kind` is `Review`; use [`Interaction::review`].
    pub fn new(user: UserId, item: K, kind: InteractionKind) -> Self {
        assert!(
            kind != InteractionKind::Review,
            "Reviews must be recorded with a rating."
        );
        Interaction {
            user,
            item,
            kind,
            rating: None,
            at: SystemTime::now(),
        }
    }

    /// Review interaction carrying `rating`
    pub fn review(user: UserId, item: K, rating: f64) -> Self {
        Interaction {
            user,
            item,
            kind: InteractionKind::Review,
            rating: Some(rating),
            at: SystemTime::now(),
        }
    }

    /// Override the timestamp (replaying history)
    pub fn at(mut self, at: SystemTime) -> Self {
        self.at = at;
        self
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn item(&self) -> &K {
        &self.item
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    pub fn timestamp(&self) -> SystemTime {
        self.at
    }
}

/// Append-only interaction store seam
pub trait InteractionLedger<K> {
    fn append(&mut self, interaction: Interaction<K>) -> Result<()>;

    /// Every interaction of `user`, oldest first
    fn interactions_of(&self, user: &UserId) -> Result<Vec<Interaction<K>>>;
}

/// In-memory ledger
#[derive(Debug, Clone)]
pub struct MemoryLedger<K> {
    records: Vec<Interaction<K>>,
}

impl<K> MemoryLedger<K> {
    pub fn new() -> Self {
        MemoryLedger { records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction<K>> + '_ {
        self.records.iter()
    }
}

impl<K> Default for MemoryLedger<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InteractionLedger<K> for MemoryLedger<K>
where
    K: Clone,
{
    fn append(&mut self, interaction: Interaction<K>) -> Result<()> {
        self.records.push(interaction);
        Ok(())
    }

    fn interactions_of(&self, user: &UserId) -> Result<Vec<Interaction<K>>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.user() == user)
            .cloned()
            .collect())
    }
}
