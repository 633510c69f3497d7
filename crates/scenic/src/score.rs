//! Diagram quality scoring
//!
//! The scorer rates a scene on four independent criteria, each in `[0, 100]`:
//!
//! - [`layout`]: overlap between objects and evenness of their spacing
//! - [`connectivity`]: relationships whose straight line crosses a third object
//! - [`style`]: alignment and size consistency among objects of the same type
//! - [`physics`]: domain rules looked up in a [`PhysicsRegistry`]
//!
//! and combines them into a weighted composite. Scoring never mutates the
//! scene and never fails on a structurally valid one.

pub mod connectivity;
pub mod layout;
pub mod physics;
pub mod style;

pub use physics::{PhysicsRegistry, PhysicsRule, RuleOutcome};

use log::debug;
use serde::{Deserialize, Serialize};

use scenic_core::scene::{Scene, SceneIndex};

use crate::config::ScoringConfig;

/// Relative weights of the sub-scores in the composite quality score.
///
/// The composite divides by the sum of the weights, so weights need not add
/// up to one. Negative weights count as zero; if nothing positive remains the
/// default weights are used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    layout: f64,
    connectivity: f64,
    style: f64,
    physics: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            layout: 0.3,
            connectivity: 0.25,
            style: 0.2,
            physics: 0.25,
        }
    }
}

impl ScoreWeights {
    /// Creates weights for layout, connectivity, style and physics
    pub fn new(layout: f64, connectivity: f64, style: f64, physics: f64) -> Self {
        Self {
            layout,
            connectivity,
            style,
            physics,
        }
    }

    /// Weights scaled to sum to one
    fn normalized(self) -> Self {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let weights = Self::new(
            clean(self.layout),
            clean(self.connectivity),
            clean(self.style),
            clean(self.physics),
        );

        let total = weights.layout + weights.connectivity + weights.style + weights.physics;
        if total <= 0.0 {
            return Self::default();
        }

        Self::new(
            weights.layout / total,
            weights.connectivity / total,
            weights.style / total,
            weights.physics / total,
        )
    }
}

/// Sub-scores and composite quality score of a scene, all in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    layout_score: f64,
    connectivity_score: f64,
    style_score: f64,
    physics_score: f64,
    quality_score: f64,
}

impl QualityReport {
    /// Overlap and spacing quality
    pub fn layout_score(&self) -> f64 {
        self.layout_score
    }

    /// Share of relationships whose straight edge clears other objects
    pub fn connectivity_score(&self) -> f64 {
        self.connectivity_score
    }

    /// Alignment and size consistency within object types
    pub fn style_score(&self) -> f64 {
        self.style_score
    }

    /// Domain rule compliance; 100 when no rules apply
    pub fn physics_score(&self) -> f64 {
        self.physics_score
    }

    /// Weighted composite of the four sub-scores
    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }
}

/// Computes [`QualityReport`]s with a fixed set of weights and rules.
pub struct Scorer {
    weights: ScoreWeights,
    alignment_tolerance: f64,
    physics: PhysicsRegistry,
}

impl Scorer {
    /// Creates a scorer from configuration, with the built-in physics rules
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights().normalized(),
            alignment_tolerance: config.alignment_tolerance(),
            physics: PhysicsRegistry::default(),
        }
    }

    /// Replaces the physics rule registry
    pub fn with_physics_registry(mut self, registry: PhysicsRegistry) -> Self {
        self.physics = registry;
        self
    }

    /// Scores `scene`. `index` must come from `scene` or from the scene it
    /// was laid out from.
    pub fn score(&self, scene: &Scene, index: &SceneIndex<'_>) -> QualityReport {
        let layout_score = layout::layout_score(scene);
        let connectivity_score = connectivity::connectivity_score(scene, index);
        let style_score = style::style_score(scene, self.alignment_tolerance);
        let physics_score = self.physics.score(scene, index);

        let w = self.weights;
        let quality_score = (w.layout * layout_score
            + w.connectivity * connectivity_score
            + w.style * style_score
            + w.physics * physics_score)
            .clamp(0.0, 100.0);

        debug!(
            layout_score,
            connectivity_score,
            style_score,
            physics_score,
            quality_score;
            "Scene scored"
        );

        QualityReport {
            layout_score,
            connectivity_score,
            style_score,
            physics_score,
            quality_score,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

/// Population standard deviation divided by the mean.
///
/// Zero for fewer than two values or a (near) zero mean.
pub(crate) fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    if mean.abs() < f64::EPSILON {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    variance.sqrt() / mean.abs()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use scenic_core::{
        geometry::{Point, Size},
        scene::{DiagramObject, Relationship},
    };

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn object_strategy() -> impl Strategy<Value = (f64, f64, f64, f64, usize)> {
        (
            -100.0f64..900.0,
            -100.0f64..700.0,
            1.0f64..200.0,
            1.0f64..200.0,
            0usize..3,
        )
    }

    fn scene_strategy() -> impl Strategy<Value = Scene> {
        (
            prop::collection::vec(object_strategy(), 0..12),
            prop::collection::vec((0usize..12, 0usize..12), 0..12),
            prop::sample::select(vec!["physics", "electrical", "chemistry"]),
        )
            .prop_map(|(objects, edges, domain)| {
                let types = ["force", "wire", "resistor"];
                let mut scene = Scene::new("prop", Size::new(800.0, 600.0)).with_domain(domain);
                for (i, (x, y, w, h, kind)) in objects.iter().enumerate() {
                    scene = scene.with_object(
                        DiagramObject::new(
                            format!("o{i}"),
                            types[*kind],
                            Point::new(*x, *y),
                            Size::new(*w, *h),
                        )
                        .with_property("rotation", *x),
                    );
                }
                if !objects.is_empty() {
                    for (i, (s, t)) in edges.iter().enumerate() {
                        let source = format!("o{}", s % objects.len());
                        let target = format!("o{}", t % objects.len());
                        scene = scene.with_relationship(Relationship::new(
                            format!("r{i}"),
                            "connects",
                            source,
                            target,
                        ));
                    }
                }
                scene
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every score stays within [0, 100] and is finite.
    fn check_scores_are_bounded(scene: Scene) -> Result<(), TestCaseError> {
        let index = SceneIndex::new(&scene).unwrap();
        let report = Scorer::default().score(&scene, &index);

        for value in [
            report.layout_score(),
            report.connectivity_score(),
            report.style_score(),
            report.physics_score(),
            report.quality_score(),
        ] {
            prop_assert!(value.is_finite());
            prop_assert!((0.0..=100.0).contains(&value), "score out of range: {value}");
        }
        Ok(())
    }

    /// Scoring the same scene twice gives identical results.
    fn check_scoring_is_deterministic(scene: Scene) -> Result<(), TestCaseError> {
        let index = SceneIndex::new(&scene).unwrap();
        let scorer = Scorer::default();
        prop_assert_eq!(scorer.score(&scene, &index), scorer.score(&scene, &index));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn scores_are_bounded(scene in scene_strategy()) {
            check_scores_are_bounded(scene)?;
        }

        #[test]
        fn scoring_is_deterministic(scene in scene_strategy()) {
            check_scoring_is_deterministic(scene)?;
        }
    }
}
