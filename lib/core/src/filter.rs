// Hard gates applied to validated archetypes before scoring
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::archetype::Archetype;
use crate::compat::CompatibilityMatrix;
use crate::normalize::MuscularityLevel;

pub const DEFAULT_BMI_EPSILON: f64 = 0.5;
pub const DEFAULT_BMI_RELAXATION: f64 = 8.0;

pub trait Filter {
    fn matches(&self, archetype: &Archetype) -> bool;

    /// Keep the archetypes that pass, preserving catalog order
    fn apply<'a>(&self, candidates: &[&'a Archetype]) -> Vec<&'a Archetype> {
        candidates
            .iter()
            .copied()
            .filter(|a| self.matches(a))
            .collect()
    }
}

/// Closed-interval membership with tolerance on both bounds
#[inline]
pub fn in_range(bmi: f64, min: f64, max: f64, epsilon: f64) -> bool {
    bmi >= min - epsilon && bmi <= max + epsilon
}

/// Which BMI pass produced the final candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiStrategy {
    Strict,
    BmiRelaxed,
}

impl BmiStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            BmiStrategy::Strict => "strict",
            BmiStrategy::BmiRelaxed => "bmi_relaxed",
        }
    }
}

impl fmt::Display for BmiStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps archetypes whose muscularity label is compatible with `level`
pub struct MuscularityGate<'m> {
    matrix: &'m CompatibilityMatrix,
    level: MuscularityLevel,
}

impl<'m> MuscularityGate<'m> {
    pub fn new(matrix: &'m CompatibilityMatrix, level: MuscularityLevel) -> Self {
        Self { matrix, level }
    }

    /// False when the matrix has nothing for this level; the gate must then be skipped
    pub fn is_effective(&self) -> bool {
        !self.matrix.compatible_levels(self.level).is_empty()
    }

    pub fn compatible_levels(&self) -> &[MuscularityLevel] {
        self.matrix.compatible_levels(self.level)
    }
}

impl Filter for MuscularityGate<'_> {
    fn matches(&self, archetype: &Archetype) -> bool {
        self.matrix.permits(self.level, &archetype.muscularity)
    }
}

/// Keeps archetypes whose declared BMI range contains the user's BMI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiGate {
    bmi: f64,
    epsilon: f64,
    relaxation: f64,
    strategy: BmiStrategy,
}

impl BmiGate {
    pub fn strict(bmi: f64, epsilon: f64) -> Self {
        Self {
            bmi,
            epsilon,
            relaxation: 0.0,
            strategy: BmiStrategy::Strict,
        }
    }

    /// Ranges widened by `relaxation` on each side, epsilon still applied on top
    pub fn relaxed(bmi: f64, epsilon: f64, relaxation: f64) -> Self {
        Self {
            bmi,
            epsilon,
            relaxation,
            strategy: BmiStrategy::BmiRelaxed,
        }
    }

    pub fn strategy(&self) -> BmiStrategy {
        self.strategy
    }
}

impl Filter for BmiGate {
    fn matches(&self, archetype: &Archetype) -> bool {
        let range = archetype.bmi_range.widened(self.relaxation);
        in_range(self.bmi, range.min(), range.max(), self.epsilon)
    }
}
