//! Archetype selection pipeline
//!
//! ```text
//! Fetching → MuscularGating → BmiGating(strict) ─┬─────────────────────────→ Scoring → Ranking → Done
//!                                                 └→ BmiGating(relaxed) ─────┘
//! ```
//!
//! Only the catalog fetch can fail. Every later stage degrades through a
//! fallback recorded in [`FilteringStats`]:
//! - no compatible muscularity levels → the muscularity gate is skipped
//! - fewer than `min_candidates` strict BMI survivors → relaxed BMI pass over
//!   the full gender catalog, not the muscularity-gated subset

use crate::explain::{semantic_coherence, FilteringStats, SelectionResult};
use crate::rerank::Reranker;
use crate::weights::ScoreWeights;
use morphmatch_core::{
    normalize_with, Archetype, ArchetypeCatalog, ArchetypeRecord, BmiGate,
    CompatibilityMatrix, Error, Filter, MatchCondition, MatchObserver, MatchStage,
    MuscularityGate, Result, SemanticProfile, TracingObserver, DEFAULT_BMI_EPSILON,
    DEFAULT_BMI_RELAXATION,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_MIN_CANDIDATES: usize = 2;

/// Configuration for the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Tolerance added to both BMI bounds on every pass
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Extra widening of BMI ranges on the relaxed pass
    #[serde(default = "default_relaxation")]
    pub relaxation: f64,
    /// Strict survivors below this trigger the relaxed pass
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(skip)]
    pub matrix: CompatibilityMatrix,
}

fn default_epsilon() -> f64 {
    DEFAULT_BMI_EPSILON
}

fn default_relaxation() -> f64 {
    DEFAULT_BMI_RELAXATION
}

fn default_min_candidates() -> usize {
    DEFAULT_MIN_CANDIDATES
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_BMI_EPSILON,
            relaxation: DEFAULT_BMI_RELAXATION,
            min_candidates: DEFAULT_MIN_CANDIDATES,
            default_limit: DEFAULT_LIMIT,
            weights: ScoreWeights::default(),
            matrix: CompatibilityMatrix::default(),
        }
    }
}

impl MatcherConfig {
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    #[must_use]
    pub fn with_min_candidates(mut self, min_candidates: usize) -> Self {
        self.min_candidates = min_candidates;
        self
    }

    #[must_use]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_matrix(mut self, matrix: CompatibilityMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Check bounds and normalize weights in place
    pub fn validate(&mut self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be a non-negative number, got {}",
                self.epsilon
            )));
        }
        if !self.relaxation.is_finite() || self.relaxation < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "relaxation must be a non-negative number, got {}",
                self.relaxation
            )));
        }
        if self.min_candidates == 0 {
            return Err(Error::InvalidConfig(
                "min_candidates must be at least 1".to_string(),
            ));
        }
        self.weights
            .validate_and_normalize()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Selects the closest catalog archetypes for a semantic profile
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
    reranker: Reranker,
}

impl Default for Matcher {
    fn default() -> Self {
        let config = MatcherConfig::default();
        let reranker = Reranker::new(config.weights);
        Self { config, reranker }
    }
}

impl Matcher {
    pub fn new(mut config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let reranker = Reranker::new(config.weights);
        Ok(Self { config, reranker })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Fetch the profile's gender from `catalog` and rank it, logging through `tracing`
    pub fn match_archetypes(
        &self,
        catalog: &dyn ArchetypeCatalog,
        profile: &SemanticProfile,
        limit: Option<usize>,
    ) -> Result<SelectionResult> {
        self.match_archetypes_observed(catalog, profile, limit, &TracingObserver)
    }

    /// Same as [`Matcher::match_archetypes`], reporting to `observer`
    ///
    /// A fetch error or an empty gender catalog is
    /// [`Error::CatalogUnavailable`].
    pub fn match_archetypes_observed(
        &self,
        catalog: &dyn ArchetypeCatalog,
        profile: &SemanticProfile,
        limit: Option<usize>,
        observer: &dyn MatchObserver,
    ) -> Result<SelectionResult> {
        let records = catalog.fetch_archetypes(profile.sex.gender())?;
        self.rank_fetched(profile, records, limit, catalog.fingerprint(), observer)
    }

    /// Rank rows fetched by the caller; an empty fetch is
    /// [`Error::CatalogUnavailable`]
    pub fn rank_fetched(
        &self,
        profile: &SemanticProfile,
        records: Vec<ArchetypeRecord>,
        limit: Option<usize>,
        fingerprint: Option<String>,
        observer: &dyn MatchObserver,
    ) -> Result<SelectionResult> {
        if records.is_empty() {
            return Err(Error::CatalogUnavailable(format!(
                "catalog returned no archetypes for gender {}",
                profile.sex.gender()
            )));
        }

        let mut result = self.rank(profile, records, limit, observer);
        result.catalog_fingerprint = fingerprint;
        Ok(result)
    }

    /// Run every stage after fetching on rows already in hand
    pub fn rank(
        &self,
        profile: &SemanticProfile,
        records: Vec<ArchetypeRecord>,
        limit: Option<usize>,
        observer: &dyn MatchObserver,
    ) -> SelectionResult {
        let limit = limit.unwrap_or(self.config.default_limit);
        let gender = profile.sex.gender();
        let mut stats = FilteringStats {
            total_fetched: records.len(),
            ..Default::default()
        };

        // Fetching: validate rows and enforce the gender invariant
        let mut catalog: Vec<Archetype> = Vec::with_capacity(records.len());
        for record in records {
            match Archetype::try_from(record) {
                Ok(archetype) if archetype.gender == gender => catalog.push(archetype),
                Ok(archetype) => {
                    stats.gender_mismatch_skipped += 1;
                    observer.gender_mismatch(&archetype.id, gender);
                }
                Err(Error::InvalidArchetypeData { id, reason }) => {
                    stats.invalid_skipped += 1;
                    observer.invalid_archetype(&id, &reason);
                }
                Err(other) => {
                    stats.invalid_skipped += 1;
                    observer.invalid_archetype("<unknown>", &other.to_string());
                }
            }
        }
        let all: Vec<&Archetype> = catalog.iter().collect();
        observer.stage_completed(MatchStage::Fetching, all.len());

        // MuscularGating
        let canonical = normalize_with(profile.muscularity.as_deref(), observer);
        let gate = MuscularityGate::new(&self.config.matrix, canonical);
        stats.compatible_levels = gate
            .compatible_levels()
            .iter()
            .map(|level| level.label().to_string())
            .collect();
        let gated = if gate.is_effective() {
            stats.muscularity_gate_applied = true;
            gate.apply(&all)
        } else {
            let condition = MatchCondition::NoCompatibleMuscularity { level: canonical };
            observer.condition(&condition);
            stats.conditions.push(condition);
            all.clone()
        };
        stats.after_muscularity = gated.len();
        observer.stage_completed(MatchStage::MuscularGating, gated.len());

        // BmiGating(strict)
        let bmi = profile.estimated_bmi;
        let strict_gate = BmiGate::strict(bmi, self.config.epsilon);
        let strict = strict_gate.apply(&gated);
        stats.after_bmi_strict = strict.len();
        observer.stage_completed(MatchStage::BmiGatingStrict, strict.len());

        // BmiGating(relaxed), against the full gender catalog
        let (gate, survivors) = if strict.len() < self.config.min_candidates {
            let condition = MatchCondition::InsufficientCandidatesAfterBmiFilter {
                found: strict.len(),
                required: self.config.min_candidates,
            };
            observer.condition(&condition);
            stats.conditions.push(condition);

            let relaxed_gate = BmiGate::relaxed(bmi, self.config.epsilon, self.config.relaxation);
            let relaxed = relaxed_gate.apply(&all);
            stats.after_bmi_relaxed = Some(relaxed.len());
            observer.stage_completed(MatchStage::BmiGatingRelaxed, relaxed.len());
            (relaxed_gate, relaxed)
        } else {
            (strict_gate, strict)
        };
        let strategy = gate.strategy();

        // Scoring
        let mut ranked = self.reranker.rerank(profile, canonical, &survivors);
        stats.scored = ranked.len();
        observer.stage_completed(MatchStage::Scoring, ranked.len());

        // Ranking
        ranked.truncate(limit);
        observer.stage_completed(MatchStage::Ranking, ranked.len());

        // Done
        let coherence = semantic_coherence(&ranked);
        stats.final_selected = ranked.len();
        observer.stage_completed(MatchStage::Done, ranked.len());
        observer.selection_complete(ranked.len(), strategy, coherence);

        SelectionResult {
            selected_archetypes: ranked,
            strategy_used: strategy,
            semantic_coherence_score: coherence,
            filtering_stats: stats,
            canonical_muscularity: canonical,
            catalog_fingerprint: None,
        }
    }
}
