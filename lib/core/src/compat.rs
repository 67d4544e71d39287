//! Muscularity compatibility matrix
//!
//! For each canonical level, the archetype levels acceptable as substitutes.
//! The sets are empirically tuned: they overlap across bands (a `Normal` BMI
//! profile with real muscle mass may still match `Moyennement musclé`) and
//! are deliberately asymmetric (`Athlétique` reaches out less than `Normal`).

use smallvec::SmallVec;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::normalize::MuscularityLevel;

/// Bumped whenever [`DEFAULT_COMPATIBILITY`] changes
pub const COMPATIBILITY_TABLE_VERSION: u32 = 1;

use MuscularityLevel::*;

pub const DEFAULT_COMPATIBILITY: &[(MuscularityLevel, &[MuscularityLevel])] = &[
    (SevereAtrophy, &[SevereAtrophy, Atrophied]),
    (Atrophied, &[Atrophied, SevereAtrophy, SlightlyAtrophied]),
    (SlightlyAtrophied, &[SlightlyAtrophied, Atrophied, Normal]),
    (Normal, &[Normal, SlightlyAtrophied, NormalStocky, MediumMuscled]),
    (NormalStocky, &[NormalStocky, Normal, MediumMuscled]),
    (MediumMuscled, &[MediumMuscled, Normal, Muscular]),
    (Muscular, &[Muscular, MediumMuscled, Athletic]),
    (Athletic, &[Athletic, Muscular]),
    (LessMuscledFeminine, &[LessMuscledFeminine, SlightlyAtrophied, Normal]),
    (
        MediumMuscledFeminine,
        &[MediumMuscledFeminine, LessMuscledFeminine, MoreMuscledFeminine, Normal],
    ),
    (MoreMuscledFeminine, &[MoreMuscledFeminine, MediumMuscledFeminine, Athletic]),
];

type LevelSet = SmallVec<[MuscularityLevel; 4]>;

/// Lookup table from canonical level to its compatible levels
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityMatrix {
    entries: Vec<(MuscularityLevel, LevelSet)>,
}

impl Default for CompatibilityMatrix {
    fn default() -> Self {
        Self::from_table(DEFAULT_COMPATIBILITY)
    }
}

impl CompatibilityMatrix {
    pub fn from_table(table: &[(MuscularityLevel, &[MuscularityLevel])]) -> Self {
        Self {
            entries: table
                .iter()
                .map(|(level, levels)| (*level, levels.iter().copied().collect()))
                .collect(),
        }
    }

    /// A matrix with no entries: every lookup is empty
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build from catalog labels, e.g. a JSON config object
    ///
    /// Unknown labels on either side are rejected.
    pub fn from_labels(map: &HashMap<String, Vec<String>>) -> Result<Self> {
        let parse = |label: &str| {
            MuscularityLevel::from_label(label).ok_or_else(|| {
                Error::InvalidConfig(format!("unknown muscularity label '{}'", label))
            })
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, values) in map {
            let level = parse(key)?;
            let set = values
                .iter()
                .map(|v| parse(v))
                .collect::<Result<LevelSet>>()?;
            entries.push((level, set));
        }
        entries.sort_by_key(|(level, _)| *level);
        Ok(Self { entries })
    }

    /// Replace or add the entry for `level`
    #[must_use]
    pub fn with_entry(mut self, level: MuscularityLevel, levels: &[MuscularityLevel]) -> Self {
        self.entries.retain(|(l, _)| *l != level);
        self.entries.push((level, levels.iter().copied().collect()));
        self
    }

    /// Drop the entry for `level`, so lookups for it return an empty set
    #[must_use]
    pub fn without_entry(mut self, level: MuscularityLevel) -> Self {
        self.entries.retain(|(l, _)| *l != level);
        self
    }

    /// Compatible levels for `level`; empty when the table has no entry
    pub fn compatible_levels(&self, level: MuscularityLevel) -> &[MuscularityLevel] {
        self.entries
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, set)| set.as_slice())
            .unwrap_or(&[])
    }

    /// Whether an archetype labelled `archetype_label` is acceptable for `level`
    pub fn permits(&self, level: MuscularityLevel, archetype_label: &str) -> bool {
        let label = archetype_label.trim();
        self.compatible_levels(level)
            .iter()
            .any(|allowed| allowed.label() == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
