use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::recommender::interaction::{Interaction, InteractionKind};
use crate::utils::math::FixedVector;

/// Configuration for the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Raw weights of the five score components (normalised at startup)
    pub weights: ComponentWeights,

    /// How much each interaction kind pulls a user profile
    pub interaction_weights: InteractionWeights,

    /// Upper bound for `Page::max_results`
    pub max_results: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            interaction_weights: InteractionWeights::default(),
            max_results: 256,
        }
    }
}

impl RecommenderConfig {
    pub fn validate(&self) -> Result<()> {
        let raw = self.weights.as_vector();
        if raw.as_array().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RecommendError::InvalidConfig(format!(
                "component weights must be finite and non-negative: {:?}",
                raw.as_array()
            )));
        }
        if raw.length() == 0.0 {
            return Err(RecommendError::InvalidConfig(
                "component weights must not all be zero".to_string(),
            ));
        }
        let iw = &self.interaction_weights;
        if [iw.view, iw.purchase, iw.comment, iw.react, iw.review]
            .iter()
            .any(|w| !w.is_finite())
        {
            return Err(RecommendError::InvalidConfig(
                "interaction weights must be finite".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(RecommendError::InvalidConfig(
                "max_results must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Weights of `[term, tag, category, host, distance]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub term: f64,
    pub tag: f64,
    pub category: f64,
    pub host: f64,
    pub distance: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            term: 1.0,
            tag: 0.4,
            category: 0.6,
            host: 0.7,
            distance: 1.5,
        }
    }
}

impl ComponentWeights {
    /// Raw (unnormalised) weight vector
    pub fn as_vector(&self) -> FixedVector {
        FixedVector::new([self.term, self.tag, self.category, self.host, self.distance])
    }
}

/// Per-kind interaction weights
/// A review is additionally scaled by its rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionWeights {
    pub view: f64,
    pub purchase: f64,
    pub comment: f64,
    pub react: f64,
    pub review: f64,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        Self {
            view: 1.0,
            purchase: 5.0,
            comment: 2.0,
            react: 1.5,
            review: 1.0,
        }
    }
}

impl InteractionWeights {
    #[inline]
    pub fn kind_weight(&self, kind: InteractionKind) -> f64 {
        match kind {
            InteractionKind::View => self.view,
            InteractionKind::Purchase => self.purchase,
            InteractionKind::Comment => self.comment,
            InteractionKind::React => self.react,
            InteractionKind::Review => self.review,
        }
    }

    /// Scale applied to the target item's vector when folding `interaction`
    /// into a profile
    pub fn weight_of<K>(&self, interaction: &Interaction<K>) -> f64 {
        let base = self.kind_weight(interaction.kind());
        match interaction.kind() {
            InteractionKind::Review => base * interaction.rating().unwrap_or(0.0),
            _ => base,
        }
    }
}
