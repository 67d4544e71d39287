//! # morphmatch Core
//!
//! Core library for the morphmatch archetype matching engine.
//!
//! This crate provides the data model and the deterministic building blocks
//! of the matching pipeline:
//!
//! - [`SemanticProfile`] - The user's estimated body-shape profile
//! - [`ArchetypeRecord`] / [`Archetype`] - Raw and validated catalog rows
//! - [`normalize`] - Free-form muscularity label → [`MuscularityLevel`]
//! - [`CompatibilityMatrix`] - Acceptable archetype levels per canonical level
//! - [`BmiGate`] / [`MuscularityGate`] - Hard filters applied before scoring
//! - [`ArchetypeCatalog`] - The storage collaborator interface
//! - [`MatchObserver`] - Injectable observability
//!
//! ## Example
//!
//! ```rust
//! use morphmatch_core::{normalize, CompatibilityMatrix, MuscularityLevel};
//!
//! let level = normalize(Some("  musclé "));
//! assert_eq!(level, MuscularityLevel::Muscular);
//!
//! let matrix = CompatibilityMatrix::default();
//! assert!(matrix.permits(level, "Athlétique"));
//! ```

pub mod archetype;
pub mod catalog;
pub mod compat;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod observer;
pub mod profile;

pub use archetype::{Archetype, ArchetypeRecord, BmiRange, Gender};
pub use catalog::ArchetypeCatalog;
pub use compat::{CompatibilityMatrix, COMPATIBILITY_TABLE_VERSION, DEFAULT_COMPATIBILITY};
pub use error::{CatalogError, Error, Result};
pub use filter::{
    in_range, BmiGate, BmiStrategy, Filter, MuscularityGate, DEFAULT_BMI_EPSILON,
    DEFAULT_BMI_RELAXATION,
};
pub use normalize::{normalize, normalize_with, MuscularityLevel};
pub use observer::{
    MatchCondition, MatchObserver, MatchStage, NoopObserver, ObservedEvent, RecordingObserver,
    TracingObserver,
};
pub use profile::{SemanticProfile, Sex};
