use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::TryFrom;
use std::fmt;

use crate::error::Error;
use crate::profile::{lenient_label, Sex};

/// Catalog gender of an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "male", alias = "m", alias = "masculin", alias = "homme")]
    Masculine,
    #[serde(
        alias = "female",
        alias = "f",
        alias = "feminin",
        alias = "féminin",
        alias = "femme"
    )]
    Feminine,
}

impl Gender {
    pub fn sex(self) -> Sex {
        match self {
            Gender::Masculine => Sex::Male,
            Gender::Feminine => Sex::Female,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Masculine => "masculine",
            Gender::Feminine => "feminine",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculine" | "male" | "masculin" | "m" | "homme" => Ok(Gender::Masculine),
            "feminine" | "female" | "feminin" | "féminin" | "f" | "femme" => {
                Ok(Gender::Feminine)
            }
            other => Err(Error::InvalidConfig(format!("unknown gender '{}'", other))),
        }
    }
}

/// Closed BMI interval `[min, max]` declared by an archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct BmiRange {
    min: f64,
    max: f64,
}

impl BmiRange {
    /// Both bounds must be finite and `min <= max`
    pub fn new(min: f64, max: f64) -> Result<Self, String> {
        if !min.is_finite() || !max.is_finite() {
            return Err(format!("non-finite bmi_range [{}, {}]", min, max));
        }
        if min > max {
            return Err(format!("inverted bmi_range [{}, {}]", min, max));
        }
        Ok(Self { min, max })
    }

    /// Parse a raw catalog value.
    ///
    /// Accepts a 2-element numeric array or an object with numeric `min` and
    /// `max`. Anything else is malformed.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) if items.len() == 2 => {
                match (items[0].as_f64(), items[1].as_f64()) {
                    (Some(min), Some(max)) => Self::new(min, max),
                    _ => Err("bmi_range bounds must be numbers".to_string()),
                }
            }
            Value::Array(items) => Err(format!(
                "bmi_range must have 2 elements, got {}",
                items.len()
            )),
            Value::Object(map) => {
                match (
                    map.get("min").and_then(Value::as_f64),
                    map.get("max").and_then(Value::as_f64),
                ) {
                    (Some(min), Some(max)) => Self::new(min, max),
                    _ => Err("bmi_range object needs numeric min and max".to_string()),
                }
            }
            Value::Null => Err("missing bmi_range".to_string()),
            other => Err(format!("bmi_range has unsupported shape: {}", other)),
        }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Half of the interval width; zero for a degenerate range
    #[inline]
    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    /// Same interval grown by `amount` on both sides
    #[must_use]
    pub fn widened(&self, amount: f64) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }
}

impl From<BmiRange> for [f64; 2] {
    fn from(range: BmiRange) -> Self {
        [range.min, range.max]
    }
}

impl TryFrom<[f64; 2]> for BmiRange {
    type Error = String;

    fn try_from(bounds: [f64; 2]) -> Result<Self, Self::Error> {
        BmiRange::new(bounds[0], bounds[1])
    }
}

/// A catalog row as returned by storage, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeRecord {
    #[serde(default)]
    pub id: Value,
    /// Raw gender; parsed during validation so one bad row cannot fail a load
    #[serde(default)]
    pub gender: Value,
    #[serde(default, deserialize_with = "lenient_label")]
    pub obesity: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub muscularity: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub morphotype: Option<String>,
    #[serde(default)]
    pub morph_index: Option<Value>,
    #[serde(default)]
    pub muscle_index: Option<Value>,
    #[serde(default)]
    pub bmi_range: Value,
    /// Morphological parameters, never inspected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ArchetypeRecord {
    /// Best-effort identifier used in diagnostics
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            Value::Null => "<missing>".to_string(),
            other => other.to_string(),
        }
    }

    /// Parsed gender, `None` when missing or unrecognized
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_str().and_then(|raw| raw.parse().ok())
    }

    /// Whether a fetch for `gender` should return this row.
    ///
    /// Rows without a recognizable gender are returned for both genders so
    /// that validation reports them instead of storage hiding them.
    pub fn belongs_to(&self, gender: Gender) -> bool {
        self.gender().map_or(true, |g| g == gender)
    }
}

/// A validated catalog archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: String,
    pub gender: Gender,
    #[serde(default)]
    pub obesity: String,
    #[serde(default)]
    pub muscularity: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub morphotype: String,
    pub morph_index: f64,
    pub muscle_index: f64,
    pub bmi_range: BmiRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Archetype {
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        gender: Gender,
        bmi_range: BmiRange,
        morph_index: f64,
        muscle_index: f64,
    ) -> Self {
        Self {
            id: id.into(),
            gender,
            obesity: String::new(),
            muscularity: String::new(),
            level: String::new(),
            morphotype: String::new(),
            morph_index,
            muscle_index,
            bmi_range,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_labels(
        mut self,
        obesity: &str,
        muscularity: &str,
        level: &str,
        morphotype: &str,
    ) -> Self {
        self.obesity = obesity.to_string();
        self.muscularity = muscularity.to_string();
        self.level = level.to_string();
        self.morphotype = morphotype.to_string();
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

fn finite_index(id: &str, name: &str, value: Option<&Value>) -> Result<f64, Error> {
    let invalid = |reason: String| Error::InvalidArchetypeData {
        id: id.to_string(),
        reason,
    };
    match value {
        Some(v) => match v.as_f64() {
            Some(x) if x.is_finite() => Ok(x),
            Some(x) => Err(invalid(format!("{} is not finite ({})", name, x))),
            None => Err(invalid(format!("{} is not a number: {}", name, v))),
        },
        None => Err(invalid(format!("missing {}", name))),
    }
}

impl TryFrom<ArchetypeRecord> for Archetype {
    type Error = Error;

    fn try_from(record: ArchetypeRecord) -> Result<Self, Self::Error> {
        let id = match &record.id {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(Error::InvalidArchetypeData {
                    id: record.id_string(),
                    reason: "missing or empty id".to_string(),
                })
            }
        };

        let gender = match &record.gender {
            Value::Null => Err("missing gender".to_string()),
            Value::String(raw) => raw
                .parse::<Gender>()
                .map_err(|_| format!("unknown gender '{}'", raw)),
            other => Err(format!("gender is not a string: {}", other)),
        }
        .map_err(|reason| Error::InvalidArchetypeData {
            id: id.clone(),
            reason,
        })?;

        let bmi_range = BmiRange::from_value(&record.bmi_range).map_err(|reason| {
            Error::InvalidArchetypeData {
                id: id.clone(),
                reason,
            }
        })?;

        let morph_index = finite_index(&id, "morph_index", record.morph_index.as_ref())?;
        let muscle_index = finite_index(&id, "muscle_index", record.muscle_index.as_ref())?;

        Ok(Archetype {
            id,
            gender,
            obesity: record.obesity.unwrap_or_default(),
            muscularity: record.muscularity.unwrap_or_default(),
            level: record.level.unwrap_or_default(),
            morphotype: record.morphotype.unwrap_or_default(),
            morph_index,
            muscle_index,
            bmi_range,
            payload: record.payload,
        })
    }
}

impl From<&Archetype> for ArchetypeRecord {
    fn from(archetype: &Archetype) -> Self {
        Self {
            id: Value::String(archetype.id.clone()),
            gender: Value::String(archetype.gender.as_str().to_string()),
            obesity: Some(archetype.obesity.clone()),
            muscularity: Some(archetype.muscularity.clone()),
            level: Some(archetype.level.clone()),
            morphotype: Some(archetype.morphotype.clone()),
            morph_index: Some(Value::from(archetype.morph_index)),
            muscle_index: Some(Value::from(archetype.muscle_index)),
            bmi_range: serde_json::json!([archetype.bmi_range.min(), archetype.bmi_range.max()]),
            payload: archetype.payload.clone(),
        }
    }
}
