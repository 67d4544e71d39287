//! # morphmatch
//!
//! Body-scan archetype matching: given a user's estimated body-shape profile,
//! select the closest entries from a catalog of predefined morphological
//! archetypes.
//!
//! ## Pipeline
//!
//! 1. **Normalize** the free-form muscularity label onto the catalog vocabulary
//! 2. **Gate** candidates on compatible muscularity levels
//! 3. **Gate** on BMI range (± epsilon), relaxing when fewer than two survive
//! 4. **Score** each survivor: BMI centering, morph/muscle index similarity,
//!    exact categorical matches
//! 5. **Rank** by score (stable) and keep the top K
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! morphmatch serve --catalog data/archetypes.json --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use morphmatch::prelude::*;
//!
//! let catalog = InMemoryCatalog::from_archetypes(&[
//!     Archetype::new("M-01", Gender::Masculine, BmiRange::new(21.0, 25.0).unwrap(), 0.15, 0.35)
//!         .with_labels("Normal", "Musclé", "Intermédiaire", "Mésomorphe"),
//!     Archetype::new("M-02", Gender::Masculine, BmiRange::new(22.0, 26.0).unwrap(), 0.0, 0.0)
//!         .with_labels("Normal", "Musclé", "Intermédiaire", "Mésomorphe"),
//! ]);
//!
//! let profile = SemanticProfile::new(Sex::Male, 23.0)
//!     .with_muscularity("musclé")
//!     .with_indices(0.1, 0.3);
//!
//! let result = match_archetypes(&catalog, &profile, None).unwrap();
//! assert_eq!(result.strategy_used, BmiStrategy::Strict);
//! assert_eq!(result.best().unwrap().archetype.id, "M-01");
//! ```
//!
//! ## Crate Structure
//!
//! - `morphmatch-core` - Data model, normalization, compatibility matrix, gates
//! - `morphmatch-similarity` - Scoring, ranking and the selection pipeline
//! - `morphmatch-storage` - In-memory and JSON file catalogs
//! - `morphmatch-api` - Match service and REST API

// Re-export core types
pub use morphmatch_core::{
    normalize, Archetype, ArchetypeCatalog, ArchetypeRecord, BmiRange, BmiStrategy,
    CompatibilityMatrix, Error, Gender, MatchObserver, MuscularityLevel, Result,
    SemanticProfile, Sex, TracingObserver,
};

// Re-export similarity
pub use morphmatch_similarity::{
    FilteringStats, Matcher, MatcherConfig, ScoreWeights, ScoredArchetype, SelectionResult,
};

// Re-export storage
pub use morphmatch_storage::{InMemoryCatalog, JsonFileCatalog};

// Re-export API
pub use morphmatch_api::{MatchService, RestApi};

/// Match `profile` against `catalog` with the default configuration
///
/// `limit` defaults to 5.
pub fn match_archetypes(
    catalog: &dyn ArchetypeCatalog,
    profile: &SemanticProfile,
    limit: Option<usize>,
) -> Result<SelectionResult> {
    Matcher::default().match_archetypes(catalog, profile, limit)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        match_archetypes, normalize, Archetype, ArchetypeCatalog, ArchetypeRecord, BmiRange,
        BmiStrategy, CompatibilityMatrix, Error, Gender, InMemoryCatalog, JsonFileCatalog,
        MatchObserver, MatchService, Matcher, MatcherConfig, MuscularityLevel, RestApi, Result,
        ScoreWeights, ScoredArchetype, SelectionResult, SemanticProfile, Sex,
    };
}
