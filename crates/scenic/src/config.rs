//! Configuration types for Scenic layout and scoring.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and scoring settings.
//! - [`LayoutParameters`] - Constants of the force simulation.
//! - [`ScoringConfig`] - Sub-score weights and the style alignment tolerance.
//!
//! # Example
//!
//! ```
//! # use scenic::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.scoring().alignment_tolerance(), 5.0);
//! assert!(config.layout().enable_force_directed());
//! ```

use serde::Deserialize;

pub use crate::layout::LayoutParameters;
pub use crate::score::ScoreWeights;

/// Top-level application configuration combining layout and scoring settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Force simulation section.
    #[serde(default)]
    layout: LayoutParameters,

    /// Quality scoring section.
    #[serde(default)]
    scoring: ScoringConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and scoring configurations.
    ///
    /// # Arguments
    ///
    /// * `layout` - Force simulation constants.
    /// * `scoring` - Weights and tolerances of the quality scorer.
    pub fn new(layout: LayoutParameters, scoring: ScoringConfig) -> Self {
        Self { layout, scoring }
    }

    /// Returns the layout parameters.
    pub fn layout(&self) -> &LayoutParameters {
        &self.layout
    }

    /// Returns the scoring configuration.
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }
}

/// Quality scorer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringConfig {
    /// Weights of the sub-scores in the composite score.
    #[serde(default)]
    weights: ScoreWeights,

    /// Maximum center offset, in canvas units, for two objects to count as
    /// aligned on an axis.
    #[serde(default = "default_alignment_tolerance")]
    alignment_tolerance: f64,
}

fn default_alignment_tolerance() -> f64 {
    5.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            alignment_tolerance: default_alignment_tolerance(),
        }
    }
}

impl ScoringConfig {
    /// Creates a new [`ScoringConfig`].
    ///
    /// A negative or non-finite `alignment_tolerance` is treated as zero.
    pub fn new(weights: ScoreWeights, alignment_tolerance: f64) -> Self {
        Self {
            weights,
            alignment_tolerance,
        }
    }

    /// Returns the sub-score weights.
    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Returns the alignment tolerance, never negative.
    pub fn alignment_tolerance(&self) -> f64 {
        if self.alignment_tolerance.is_finite() {
            self.alignment_tolerance.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"layout": {"ideal_edge_length": 80.0}, "scoring": {"weights": {"physics": 0.5}}}"#,
        )
        .unwrap();

        assert_eq!(config.layout().ideal_edge_length(), 80.0);
        assert_eq!(config.layout().max_iterations(), 300);
        assert_eq!(config.scoring().alignment_tolerance(), 5.0);
        assert_eq!(
            config.scoring().weights(),
            ScoreWeights::new(0.3, 0.25, 0.2, 0.5)
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.layout(), AppConfig::default().layout());
        assert_eq!(config.scoring(), &ScoringConfig::default());
    }

    #[test]
    fn test_negative_tolerance_reads_as_zero() {
        let config = ScoringConfig::new(ScoreWeights::default(), -3.0);
        assert_eq!(config.alignment_tolerance(), 0.0);
    }
}
