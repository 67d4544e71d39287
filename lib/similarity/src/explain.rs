//! Selection output
//!
//! The ranked shortlist together with what happened on the way: which BMI
//! strategy produced it, how coherent it is with the profile, and how many
//! candidates survived each stage.

use crate::rerank::ScoredArchetype;
use morphmatch_core::{BmiStrategy, MatchCondition, MuscularityLevel};
use serde::{Deserialize, Serialize};

/// Candidate counts at each pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteringStats {
    /// Rows returned by the catalog
    pub total_fetched: usize,
    /// Rows rejected by validation
    pub invalid_skipped: usize,
    /// Rows whose gender did not match the profile
    pub gender_mismatch_skipped: usize,
    pub after_muscularity: usize,
    /// False when the permissive fallback skipped the gate
    pub muscularity_gate_applied: bool,
    pub compatible_levels: Vec<String>,
    pub after_bmi_strict: usize,
    /// Only set when the relaxed pass ran
    pub after_bmi_relaxed: Option<usize>,
    pub scored: usize,
    pub final_selected: usize,
    /// Fallbacks taken
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<MatchCondition>,
}

/// Result of one matching request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected_archetypes: Vec<ScoredArchetype>,
    pub strategy_used: BmiStrategy,
    pub semantic_coherence_score: f64,
    pub filtering_stats: FilteringStats,
    pub canonical_muscularity: MuscularityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_fingerprint: Option<String>,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.selected_archetypes.is_empty()
    }

    pub fn best(&self) -> Option<&ScoredArchetype> {
        self.selected_archetypes.first()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.selected_archetypes
            .iter()
            .map(|s| s.archetype.id.as_str())
            .collect()
    }
}

/// Mean categorical match fraction over the selection; 0.0 when empty
pub fn semantic_coherence(selected: &[ScoredArchetype]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }
    selected.iter().map(|s| s.semantic_match).sum::<f64>() / selected.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rerank::ScoreBreakdown;
    use morphmatch_core::{Archetype, BmiRange, Gender};

    fn scored(id: &str, score: f64, semantic: f64) -> ScoredArchetype {
        ScoredArchetype {
            archetype: Archetype::new(id, Gender::Feminine, BmiRange::new(19.0, 23.0).unwrap(), 0.0, 0.0),
            distance: 1.0 - score,
            overall_score: score,
            semantic_match: semantic,
            breakdown: ScoreBreakdown {
                bmi: score * 0.5,
                morph: score * 0.2,
                muscle: score * 0.2,
                semantic: score * 0.1,
            },
        }
    }

    #[test]
    fn test_coherence() {
        let selection = vec![scored("a", 0.9, 1.0), scored("b", 0.8, 0.5), scored("c", 0.7, 0.0)];
        assert!((semantic_coherence(&selection) - 0.5).abs() < 1e-12);
        assert_eq!(semantic_coherence(&[]), 0.0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = FilteringStats {
            total_fetched: 12,
            final_selected: 3,
            muscularity_gate_applied: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalFetched"], 12);
        assert_eq!(json["finalSelected"], 3);
        assert_eq!(json["muscularityGateApplied"], true);
        assert!(json["afterBmiRelaxed"].is_null());
        assert!(json.get("conditions").is_none());
    }

    #[test]
    fn test_result_serialization() {
        let result = SelectionResult {
            selected_archetypes: vec![scored("a", 0.9, 1.0)],
            strategy_used: BmiStrategy::BmiRelaxed,
            semantic_coherence_score: 1.0,
            filtering_stats: FilteringStats::default(),
            canonical_muscularity: MuscularityLevel::Normal,
            catalog_fingerprint: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy_used"], "bmi_relaxed");
        assert_eq!(json["selected_archetypes"][0]["id"], "a");
        assert_eq!(json["selected_archetypes"][0]["bmi_range"], serde_json::json!([19.0, 23.0]));
        assert!(json.get("catalog_fingerprint").is_none());
        assert_eq!(result.ids(), vec!["a"]);
    }
}
