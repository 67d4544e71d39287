//! Score weights
//!
//! Relative importance of the four sub-scores that make up an archetype's
//! overall score. Weights are validated and normalized to sum to 1.0 so
//! the overall score stays in `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Weights of the overall score components
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    /// BMI-band centering
    #[serde(default = "default_bmi")]
    pub bmi: f64,
    /// Morph-index similarity
    #[serde(default = "default_morph")]
    pub morph: f64,
    /// Muscle-index similarity
    #[serde(default = "default_muscle")]
    pub muscle: f64,
    /// Exact categorical matches
    #[serde(default = "default_semantic")]
    pub semantic: f64,
}

fn default_bmi() -> f64 {
    0.30
}

fn default_morph() -> f64 {
    0.25
}

fn default_muscle() -> f64 {
    0.25
}

fn default_semantic() -> f64 {
    0.20
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            bmi: default_bmi(),
            morph: default_morph(),
            muscle: default_muscle(),
            semantic: default_semantic(),
        }
    }
}

impl ScoreWeights {
    pub fn new(bmi: f64, morph: f64, muscle: f64, semantic: f64) -> Self {
        Self {
            bmi,
            morph,
            muscle,
            semantic,
        }
    }

    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("bmi", self.bmi),
            ("morph", self.morph),
            ("muscle", self.muscle),
            ("semantic", self.semantic),
        ]
    }

    /// Validate the weights
    /// - Checks that weights are finite and non-negative
    /// - Normalizes weights to sum to 1.0 if they don't
    pub fn validate_and_normalize(&mut self) -> Result<(), WeightsError> {
        for (name, weight) in self.named() {
            if !weight.is_finite() {
                return Err(WeightsError::NonFinite(name));
            }
            if weight < 0.0 {
                return Err(WeightsError::NegativeWeight(name));
            }
        }

        let weight_sum = self.bmi + self.morph + self.muscle + self.semantic;
        if weight_sum <= 0.0 {
            return Err(WeightsError::ZeroTotalWeight);
        }

        if (weight_sum - 1.0).abs() > 0.001 {
            self.bmi /= weight_sum;
            self.morph /= weight_sum;
            self.muscle /= weight_sum;
            self.semantic /= weight_sum;
        }

        Ok(())
    }
}

/// Errors that can occur during weight validation
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum WeightsError {
    #[error("Weight '{0}' is negative")]
    NegativeWeight(&'static str),

    #[error("Weight '{0}' is not finite")]
    NonFinite(&'static str),

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let mut weights = ScoreWeights::default();
        let before = weights;
        weights.validate_and_normalize().unwrap();
        assert_eq!(weights, before);
    }

    #[test]
    fn test_normalization() {
        let mut weights = ScoreWeights::new(2.0, 1.0, 1.0, 0.0);
        weights.validate_and_normalize().unwrap();

        assert!((weights.bmi - 0.5).abs() < 1e-9);
        assert!((weights.morph - 0.25).abs() < 1e-9);
        assert_eq!(weights.semantic, 0.0);
    }

    #[test]
    fn test_negative_weight_error() {
        let mut weights = ScoreWeights::new(0.3, -0.1, 0.4, 0.4);
        assert_eq!(
            weights.validate_and_normalize(),
            Err(WeightsError::NegativeWeight("morph"))
        );
    }

    #[test]
    fn test_zero_and_nan_weights() {
        let mut zero = ScoreWeights::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(zero.validate_and_normalize(), Err(WeightsError::ZeroTotalWeight));

        let mut nan = ScoreWeights::new(f64::NAN, 0.2, 0.2, 0.2);
        assert_eq!(nan.validate_and_normalize(), Err(WeightsError::NonFinite("bmi")));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let weights: ScoreWeights = serde_json::from_str(r#"{"semantic": 0.5}"#).unwrap();
        assert_eq!(weights.bmi, 0.30);
        assert_eq!(weights.semantic, 0.5);
    }
}
