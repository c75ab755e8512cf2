//! Accuracy scoring for an estimate run.
//!
//! The score is a weighted blend of three data-quality signals:
//! photo confidence (weight 0.4), measured-dimension completeness
//! (weight 0.4), and pricing locality (weight 0.2). Weights sum to 1, so
//! the score stays in [0, 1].

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Data-quality signals gathered over one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracySignals {
    /// Vision confidence, if any photo analysis produced a usable result.
    pub photo_confidence: Option<f64>,
    /// Fraction of dimension fields flagged as measured, in [0, 1].
    pub measured_fraction: f64,
    /// Whether regional or user pricing is in effect instead of the
    /// shipped defaults.
    pub local_pricing: bool,
}

/// Combines data-quality signals into a single confidence score.
pub struct AccuracyScorer {
    photo_weight: f64,
    measurement_weight: f64,
    pricing_weight: f64,
}

impl AccuracyScorer {
    /// Default weighting: 0.4 photo, 0.4 measurement, 0.2 pricing.
    pub fn new() -> Self {
        Self {
            photo_weight: 0.4,
            measurement_weight: 0.4,
            pricing_weight: 0.2,
        }
    }

    /// Score a run's signals.
    ///
    /// Fails with [`EstimateError::InsufficientData`] when photo confidence
    /// is absent and nothing was measured; there is no information to score.
    pub fn score(&self, signals: &AccuracySignals) -> Result<f64, EstimateError> {
        if signals.photo_confidence.is_none() && signals.measured_fraction <= 0.0 {
            return Err(EstimateError::InsufficientData);
        }

        let confidence = signals.photo_confidence.unwrap_or(0.0).clamp(0.0, 1.0);
        let measured = signals.measured_fraction.clamp(0.0, 1.0);
        let pricing = if signals.local_pricing { 1.0 } else { 0.0 };

        let score = self.photo_weight * confidence
            + self.measurement_weight * measured
            + self.pricing_weight * pricing;

        Ok(score.clamp(0.0, 1.0))
    }
}

impl Default for AccuracyScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_signals_outscore_worst() {
        let scorer = AccuracyScorer::new();

        let best = scorer
            .score(&AccuracySignals {
                photo_confidence: Some(1.0),
                measured_fraction: 1.0,
                local_pricing: true,
            })
            .unwrap();
        assert_eq!(best, 1.0);

        let worst = scorer
            .score(&AccuracySignals {
                photo_confidence: Some(0.0),
                measured_fraction: 0.0,
                local_pricing: false,
            })
            .unwrap();
        assert!(best > worst);
        assert_eq!(worst, 0.0);
    }

    #[test]
    fn test_score_always_in_unit_interval() {
        let scorer = AccuracyScorer::new();
        // Out-of-range inputs are clamped, not propagated
        let s = scorer
            .score(&AccuracySignals {
                photo_confidence: Some(3.0),
                measured_fraction: 2.0,
                local_pricing: true,
            })
            .unwrap();
        assert!((0.0..=1.0).contains(&s));
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_insufficient_data() {
        let scorer = AccuracyScorer::new();
        let err = scorer
            .score(&AccuracySignals {
                photo_confidence: None,
                measured_fraction: 0.0,
                local_pricing: true,
            })
            .unwrap_err();
        assert!(matches!(err, EstimateError::InsufficientData));

        // Measured dimensions alone are enough to score
        assert!(
            scorer
                .score(&AccuracySignals {
                    photo_confidence: None,
                    measured_fraction: 1.0,
                    local_pricing: false,
                })
                .is_ok()
        );
    }

    #[test]
    fn test_local_pricing_raises_score() {
        let scorer = AccuracyScorer::new();
        let signals = |local| AccuracySignals {
            photo_confidence: Some(0.8),
            measured_fraction: 0.5,
            local_pricing: local,
        };
        let with_local = scorer.score(&signals(true)).unwrap();
        let without = scorer.score(&signals(false)).unwrap();
        assert!(with_local > without);
        assert!((with_local - without - 0.2).abs() < 1e-9);
    }
}
