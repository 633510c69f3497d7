//! Scenic - layout optimization and quality scoring for diagram scenes.
//!
//! A scene is a canvas holding positioned objects and the relationships
//! between them. Scenic rearranges objects with a force-directed simulation
//! and rates the result on layout, connectivity, style and domain-specific
//! physics rules.
//!
//! The [`SceneOptimizer`] is the entry point for Rust callers; [`api`] wraps
//! it in the JSON request/response contract used by the command line tool.

pub mod api;
pub mod config;
pub mod layout;
pub mod score;

mod error;

pub use scenic_core::{geometry, scene};

pub use error::ScenicError;

use log::{debug, info};

use config::AppConfig;
use layout::{DivergedLayout, ForceEngine, LayoutEngine, LayoutParameters, LayoutStats};
use scene::Scene;
use score::{PhysicsRegistry, QualityReport, Scorer};

/// Optimizes and scores scenes.
///
/// Every call is independent; the optimizer only holds configuration, so one
/// instance can be shared between threads.
///
/// # Examples
///
/// ```
/// use scenic::{
///     SceneOptimizer,
///     geometry::{Point, Size},
///     layout::LayoutParameters,
///     scene::{DiagramObject, Relationship, Scene},
/// };
///
/// let scene = Scene::new("demo", Size::new(800.0, 600.0))
///     .with_object(DiagramObject::new("a", "box", Point::new(150.0, 300.0), Size::new(80.0, 40.0)))
///     .with_object(DiagramObject::new("b", "box", Point::new(650.0, 300.0), Size::new(80.0, 40.0)))
///     .with_relationship(Relationship::new("link", "connects", "a", "b"));
///
/// let optimizer = SceneOptimizer::default();
/// let optimized = optimizer
///     .optimize_layout(&scene, &LayoutParameters::default())
///     .expect("valid scene");
///
/// let a = optimized.scene().objects()[0].center();
/// let b = optimized.scene().objects()[1].center();
/// assert!((a.distance(b) - 150.0).abs() < 5.0);
/// assert!(optimized.divergence().is_none());
/// ```
#[derive(Default)]
pub struct SceneOptimizer {
    config: AppConfig,
    scorer: Scorer,
}

impl SceneOptimizer {
    /// Create a new optimizer with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout parameters and scoring settings
    pub fn new(config: AppConfig) -> Self {
        let scorer = Scorer::new(config.scoring());
        Self { config, scorer }
    }

    /// Replaces the physics rules used when scoring
    pub fn with_physics_registry(mut self, registry: PhysicsRegistry) -> Self {
        self.scorer = self.scorer.with_physics_registry(registry);
        self
    }

    /// Configuration the optimizer was built with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lay out `scene` with the configured parameters.
    ///
    /// # Errors
    ///
    /// See [`optimize_layout`](Self::optimize_layout).
    pub fn optimize(&self, scene: &Scene) -> Result<Optimized, ScenicError> {
        self.optimize_layout(scene, self.config.layout())
    }

    /// Lay out `scene` with a force-directed simulation and score the result.
    ///
    /// The input is validated before anything runs. Divergence of the
    /// simulation is not an error: the last finite positions are kept and the
    /// divergence is reported through [`Optimized::divergence`].
    ///
    /// # Arguments
    ///
    /// * `scene` - The scene to arrange; it is not modified
    /// * `params` - Simulation constants for this run
    ///
    /// # Errors
    ///
    /// Returns [`ScenicError::Structure`] for malformed scenes and
    /// [`ScenicError::InvalidParameters`] for parameters the simulation
    /// cannot run with.
    pub fn optimize_layout(
        &self,
        scene: &Scene,
        params: &LayoutParameters,
    ) -> Result<Optimized, ScenicError> {
        info!(
            scene_id = scene.id(),
            objects = scene.objects().len(),
            relationships = scene.relationships().len();
            "Optimizing layout"
        );

        let index = scene.index()?;
        params.validate()?;

        let engine = ForceEngine::new(params.clone());
        let (laid_out, stats, divergence) = engine.calculate(scene, &index).into_parts();

        let report = self.scorer.score(&laid_out, &index);
        info!(
            quality_score = report.quality_score(),
            iterations = stats.iterations(),
            converged = stats.converged();
            "Layout optimized"
        );

        Ok(Optimized {
            scene: laid_out,
            report,
            stats,
            divergence,
        })
    }

    /// Score `scene` without moving anything.
    ///
    /// # Errors
    ///
    /// Returns [`ScenicError::Structure`] for malformed scenes.
    ///
    /// # Examples
    ///
    /// ```
    /// use scenic::{SceneOptimizer, geometry::Size, scene::Scene};
    ///
    /// let report = SceneOptimizer::default()
    ///     .validate_diagram(&Scene::new("empty", Size::new(100.0, 100.0)))
    ///     .expect("valid scene");
    /// assert!((report.quality_score() - 100.0).abs() < 1e-9);
    /// ```
    pub fn validate_diagram(&self, scene: &Scene) -> Result<QualityReport, ScenicError> {
        info!(scene_id = scene.id(), domain = scene.domain(); "Validating diagram");

        let index = scene.index()?;
        let report = self.scorer.score(scene, &index);

        debug!(quality_score = report.quality_score(); "Diagram validated");
        Ok(report)
    }
}

/// Result of [`SceneOptimizer::optimize_layout`].
#[derive(Debug, Clone)]
pub struct Optimized {
    scene: Scene,
    report: QualityReport,
    stats: LayoutStats,
    divergence: Option<DivergedLayout>,
}

impl Optimized {
    /// The rearranged scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scores of the rearranged scene
    pub fn report(&self) -> &QualityReport {
        &self.report
    }

    /// Iteration count and convergence of the simulation
    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Set when the simulation blew up and earlier positions were kept
    pub fn divergence(&self) -> Option<&DivergedLayout> {
        self.divergence.as_ref()
    }

    /// Takes the rearranged scene
    pub fn into_scene(self) -> Scene {
        self.scene
    }
}
