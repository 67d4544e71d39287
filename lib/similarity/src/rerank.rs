//! Reranker for gated archetype candidates
//!
//! Computes the weighted overall score of each candidate with a per-component
//! breakdown, then orders candidates best first.

use crate::distance::{
    bmi_compatibility, diagnostic_distance, index_similarity, semantic_match, MORPH_INDEX_SPAN,
    MUSCLE_INDEX_SPAN,
};
use crate::weights::ScoreWeights;
use morphmatch_core::{Archetype, MuscularityLevel, SemanticProfile};
use serde::{Deserialize, Serialize};

/// Weighted contribution of each score component
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub bmi: f64,
    pub morph: f64,
    pub muscle: f64,
    pub semantic: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.bmi + self.morph + self.muscle + self.semantic
    }
}

/// An archetype with its ranking score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArchetype {
    #[serde(flatten)]
    pub archetype: Archetype,
    /// Diagnostic penalty, lower is closer
    pub distance: f64,
    /// Ranking score in [0, 1], higher is better
    pub overall_score: f64,
    /// Fraction of categorical fields matching the profile
    pub semantic_match: f64,
    pub breakdown: ScoreBreakdown,
}

/// Scores archetypes against a profile
#[derive(Debug, Clone)]
pub struct Reranker {
    weights: ScoreWeights,
}

impl Default for Reranker {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl Reranker {
    /// Create a new reranker with the given weights
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score every candidate and sort by overall score descending
    ///
    /// The sort is stable: equal scores keep catalog order.
    pub fn rerank(
        &self,
        profile: &SemanticProfile,
        canonical: MuscularityLevel,
        candidates: &[&Archetype],
    ) -> Vec<ScoredArchetype> {
        let mut results: Vec<ScoredArchetype> = candidates
            .iter()
            .map(|archetype| self.score(archetype, profile, canonical))
            .collect();

        results.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
        results
    }

    /// Score a single archetype
    pub fn score(
        &self,
        archetype: &Archetype,
        profile: &SemanticProfile,
        canonical: MuscularityLevel,
    ) -> ScoredArchetype {
        let semantic = semantic_match(archetype, profile, canonical);
        let breakdown = ScoreBreakdown {
            bmi: self.weights.bmi * bmi_compatibility(profile.estimated_bmi, &archetype.bmi_range),
            morph: self.weights.morph
                * index_similarity(profile.morph_index, archetype.morph_index, MORPH_INDEX_SPAN),
            muscle: self.weights.muscle
                * index_similarity(profile.muscle_index, archetype.muscle_index, MUSCLE_INDEX_SPAN),
            semantic: self.weights.semantic * semantic,
        };

        ScoredArchetype {
            archetype: archetype.clone(),
            distance: diagnostic_distance(archetype, profile),
            overall_score: breakdown.total(),
            semantic_match: semantic,
            breakdown,
        }
    }
}
