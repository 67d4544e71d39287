//! Distance and similarity functions for archetype scoring
//!
//! Every similarity returns a score in range [0.0, 1.0] where 1.0 means
//! identical. The diagnostic distance goes the other way (0.0 = identical)
//! and is never used for ranking.

use morphmatch_core::{Archetype, BmiRange, MuscularityLevel, SemanticProfile};

/// Typical maximum morph-index difference between a user and a good match
pub const MORPH_INDEX_SPAN: f64 = 0.5;

/// Typical maximum muscle-index difference between a user and a good match
pub const MUSCLE_INDEX_SPAN: f64 = 1.0;

/// Number of categorical fields compared for the semantic bonus
pub const SEMANTIC_FIELDS: usize = 4;

const DISTANCE_MORPH_WEIGHT: f64 = 0.4;
const DISTANCE_MUSCLE_WEIGHT: f64 = 0.35;
const DISTANCE_BMI_WEIGHT: f64 = 0.25;

/// Distance from the range center in half-widths.
///
/// A zero-width range uses 1 as the denominator.
pub fn bmi_distance(bmi: f64, range: &BmiRange) -> f64 {
    let half_width = range.half_width();
    let denominator = if half_width == 0.0 { 1.0 } else { half_width };
    (bmi - range.center()).abs() / denominator
}

/// How well `bmi` sits inside `range`: 1.0 at the center, 0.0 at the edges and beyond
pub fn bmi_compatibility(bmi: f64, range: &BmiRange) -> f64 {
    let score = 1.0 - bmi_distance(bmi, range);
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}

/// Linear similarity decaying to zero at `span`
pub fn index_similarity(a: f64, b: f64, span: f64) -> f64 {
    let score = 1.0 - (a - b).abs() / span;
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}

/// Trimmed, case-insensitive label equality; empty labels never match
fn label_matches(profile: Option<&str>, archetype: &str) -> bool {
    match profile {
        Some(p) => {
            let p = p.trim();
            !p.is_empty() && p.to_lowercase() == archetype.trim().to_lowercase()
        }
        None => false,
    }
}

fn is_present(label: Option<&str>) -> bool {
    label.is_some_and(|l| !l.trim().is_empty())
}

/// Fraction of the four categorical fields matching exactly
///
/// Muscularity is compared through the profile's canonical level, the other
/// labels as given. A profile without a muscularity label never matches on
/// muscularity, even though it gates as `Normal`.
pub fn semantic_match(
    archetype: &Archetype,
    profile: &SemanticProfile,
    canonical: MuscularityLevel,
) -> f64 {
    let matches = [
        label_matches(profile.obesity.as_deref(), &archetype.obesity),
        is_present(profile.muscularity.as_deref())
            && canonical.label() == archetype.muscularity.trim(),
        label_matches(profile.level.as_deref(), &archetype.level),
        label_matches(profile.morphotype.as_deref(), &archetype.morphotype),
    ];
    matches.iter().filter(|m| **m).count() as f64 / SEMANTIC_FIELDS as f64
}

/// Weighted penalty kept for diagnostics, lower is closer
pub fn diagnostic_distance(archetype: &Archetype, profile: &SemanticProfile) -> f64 {
    let distance = DISTANCE_MORPH_WEIGHT * (profile.morph_index - archetype.morph_index).abs()
        + DISTANCE_MUSCLE_WEIGHT * (profile.muscle_index - archetype.muscle_index).abs()
        + DISTANCE_BMI_WEIGHT * bmi_distance(profile.estimated_bmi, &archetype.bmi_range);
    if distance.is_finite() {
        distance
    } else {
        f64::MAX
    }
}
