//! Layout engines
//!
//! A layout engine takes a validated [`Scene`] and returns a new scene with
//! updated object positions. Only positions change; ids, sizes, metadata and
//! the order of objects and relationships are preserved, so the
//! [`SceneIndex`] of the input keeps describing the output.

mod force;
mod params;

pub use force::Engine as ForceEngine;
pub use params::{LayoutParameters, ParameterError};

use thiserror::Error;

use scenic_core::scene::{Scene, SceneIndex};

/// Trait defining the interface for scene layout engines
pub trait LayoutEngine {
    /// Calculate a new arrangement of `scene`.
    ///
    /// - `scene`: The scene to lay out; it is never modified in place
    /// - `index`: The index built while validating `scene`
    fn calculate(&self, scene: &Scene, index: &SceneIndex<'_>) -> LayoutOutcome;
}

/// Numerical blow-up detected during a simulation step.
///
/// The layout is reverted to the positions before the failing step, so this
/// is reported next to a usable scene rather than instead of one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "layout diverged at iteration {iteration} (object `{object_id}`); \
     kept positions from iteration {}",
    .iteration.saturating_sub(1)
)]
pub struct DivergedLayout {
    iteration: usize,
    object_id: String,
}

impl DivergedLayout {
    pub(crate) fn new(iteration: usize, object_id: impl Into<String>) -> Self {
        Self {
            iteration,
            object_id: object_id.into(),
        }
    }

    /// The iteration (1-based) whose result contained non-finite coordinates
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The first object whose position became non-finite
    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

/// Summary of a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutStats {
    iterations: usize,
    converged: bool,
    final_energy: f64,
}

impl LayoutStats {
    /// Number of iterations whose result was kept
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the kinetic energy fell below the convergence threshold
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Total kinetic energy (sum of squared velocities) after the last kept
    /// iteration
    pub fn final_energy(&self) -> f64 {
        self.final_energy
    }
}

/// Result of a layout engine run.
#[derive(Debug, Clone)]
pub struct LayoutOutcome {
    scene: Scene,
    stats: LayoutStats,
    divergence: Option<DivergedLayout>,
}

impl LayoutOutcome {
    /// The arranged scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Iteration count and convergence of the run
    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Set when the simulation had to fall back to an earlier snapshot
    pub fn divergence(&self) -> Option<&DivergedLayout> {
        self.divergence.as_ref()
    }

    /// Splits the outcome into its parts
    pub fn into_parts(self) -> (Scene, LayoutStats, Option<DivergedLayout>) {
        (self.scene, self.stats, self.divergence)
    }
}
