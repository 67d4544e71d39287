//! Semantic body profile produced by the upstream estimation step.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::archetype::Gender;

/// Biological sex of the scanned user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[serde(alias = "m", alias = "masculine", alias = "masculin", alias = "homme")]
    Male,
    #[serde(
        alias = "f",
        alias = "feminine",
        alias = "feminin",
        alias = "féminin",
        alias = "femme"
    )]
    Female,
}

impl Sex {
    /// Catalog gender for this sex
    pub fn gender(self) -> Gender {
        match self {
            Sex::Male => Gender::Masculine,
            Sex::Female => Gender::Feminine,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Estimated body-shape profile of a user
///
/// Absent labels never match categorically, an absent muscularity label
/// normalizes to `Normal`, and absent indices are `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticProfile {
    pub sex: Sex,
    /// Free-form muscularity label, canonicalized before gating
    #[serde(default, deserialize_with = "lenient_label")]
    pub muscularity: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub obesity: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub morphotype: Option<String>,
    #[serde(alias = "bmi")]
    pub estimated_bmi: f64,
    #[serde(default)]
    pub morph_index: f64,
    #[serde(default)]
    pub muscle_index: f64,
}

impl SemanticProfile {
    pub fn new(sex: Sex, estimated_bmi: f64) -> Self {
        Self {
            sex,
            muscularity: None,
            obesity: None,
            level: None,
            morphotype: None,
            estimated_bmi,
            morph_index: 0.0,
            muscle_index: 0.0,
        }
    }

    #[must_use]
    pub fn with_muscularity(mut self, label: impl Into<String>) -> Self {
        self.muscularity = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_obesity(mut self, label: impl Into<String>) -> Self {
        self.obesity = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, label: impl Into<String>) -> Self {
        self.level = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_morphotype(mut self, label: impl Into<String>) -> Self {
        self.morphotype = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_indices(mut self, morph_index: f64, muscle_index: f64) -> Self {
        self.morph_index = morph_index;
        self.muscle_index = muscle_index;
        self
    }
}

/// Accepts any JSON value for a label; only strings are kept.
pub(crate) fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
