//! # morphmatch Similarity
//!
//! Scoring, ranking and selection of body-shape archetypes.
//!
//! ## Features
//!
//! - **Score Weights**: BMI centering, morph index, muscle index and categorical matches
//! - **Multi-criteria Reranking**: Stable, explainable ordering of gated candidates
//! - **Selection Pipeline**: Gating, adaptive BMI relaxation, top-K truncation
//! - **Explainability**: Per-component breakdown and per-stage candidate counts
//!
//! ## Example
//!
//! ```rust
//! use morphmatch_core::{Archetype, ArchetypeRecord, BmiRange, Gender, NoopObserver, SemanticProfile, Sex};
//! use morphmatch_similarity::{BmiStrategy, Matcher};
//!
//! let rows: Vec<ArchetypeRecord> = [(21.0, 25.0), (22.0, 26.0)]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, (min, max))| {
//!         let archetype = Archetype::new(
//!             format!("M-{}", i),
//!             Gender::Masculine,
//!             BmiRange::new(*min, *max).unwrap(),
//!             0.1,
//!             0.3,
//!         )
//!         .with_labels("Normal", "Musclé", "Intermédiaire", "Mésomorphe");
//!         ArchetypeRecord::from(&archetype)
//!     })
//!     .collect();
//!
//! let profile = SemanticProfile::new(Sex::Male, 23.0).with_muscularity("musclé");
//! let result = Matcher::default().rank(&profile, rows, Some(5), &NoopObserver);
//!
//! assert_eq!(result.strategy_used, BmiStrategy::Strict);
//! assert_eq!(result.ids(), vec!["M-0", "M-1"]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────>│   Gates     │────>│  Reranker   │
//! │ (by gender) │     │ (musc, BMI) │     │  (weights)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            │ too few           │
//!                            v                   v
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │ Relaxed BMI │────>│  Selection  │
//!                     │   (full)    │     │  (explain)  │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod distance;
pub mod explain;
pub mod rerank;
pub mod select;
pub mod weights;

// Re-export main types for convenience
pub use explain::{semantic_coherence, FilteringStats, SelectionResult};
pub use morphmatch_core::BmiStrategy;
pub use rerank::{Reranker, ScoreBreakdown, ScoredArchetype};
pub use select::{Matcher, MatcherConfig, DEFAULT_LIMIT, DEFAULT_MIN_CANDIDATES};
pub use weights::{ScoreWeights, WeightsError};
