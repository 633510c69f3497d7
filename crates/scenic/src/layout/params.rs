//! Tunable constants of the force simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected [`LayoutParameters`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("damping must be in (0, 1], got {0}")]
    Damping(f64),

    #[error("max_iterations must be positive")]
    ZeroIterations,

    #[error("{name} must be a non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Parameters of one force-directed layout run.
///
/// Every field has a default, so a partial TOML or JSON table is enough to
/// override individual values:
///
/// ```
/// # use scenic::layout::LayoutParameters;
/// let params: LayoutParameters = serde_json::from_str(r#"{"max_iterations": 50}"#).unwrap();
/// assert_eq!(params.max_iterations(), 50);
/// assert_eq!(params.damping(), LayoutParameters::default().damping());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParameters {
    repulsion_constant: f64,
    spring_constant: f64,
    ideal_edge_length: f64,
    damping: f64,
    max_iterations: usize,
    convergence_epsilon: f64,
    boundary_margin: f64,
    boundary_stiffness: f64,
    boundary_force_cap: f64,
    enable_force_directed: bool,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            repulsion_constant: 1000.0,
            spring_constant: 0.1,
            ideal_edge_length: 150.0,
            damping: 0.5,
            max_iterations: 300,
            convergence_epsilon: 0.01,
            boundary_margin: 20.0,
            boundary_stiffness: 0.5,
            boundary_force_cap: 10.0,
            enable_force_directed: true,
        }
    }
}

impl LayoutParameters {
    /// Set the repulsion constant between every pair of objects
    pub fn with_repulsion_constant(mut self, constant: f64) -> Self {
        self.repulsion_constant = constant;
        self
    }

    /// Set the spring constant of relationship edges
    pub fn with_spring_constant(mut self, constant: f64) -> Self {
        self.spring_constant = constant;
        self
    }

    /// Set the rest length used by relationships without their own
    pub fn with_ideal_edge_length(mut self, length: f64) -> Self {
        self.ideal_edge_length = length;
        self
    }

    /// Set the velocity damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the kinetic energy per object below which the simulation stops
    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.convergence_epsilon = epsilon;
        self
    }

    /// Set the distance from the canvas border where the boundary force starts
    pub fn with_boundary_margin(mut self, margin: f64) -> Self {
        self.boundary_margin = margin;
        self
    }

    /// Set the gain of the boundary force
    pub fn with_boundary_stiffness(mut self, stiffness: f64) -> Self {
        self.boundary_stiffness = stiffness;
        self
    }

    /// Set the maximum magnitude of the boundary force
    pub fn with_boundary_force_cap(mut self, cap: f64) -> Self {
        self.boundary_force_cap = cap;
        self
    }

    /// Enable or disable the simulation altogether
    pub fn with_force_directed(mut self, enabled: bool) -> Self {
        self.enable_force_directed = enabled;
        self
    }

    /// Repulsion constant `k` in `k / d²`
    pub fn repulsion_constant(&self) -> f64 {
        self.repulsion_constant
    }

    /// Spring constant of relationship edges
    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    /// Rest length of relationships without an override
    pub fn ideal_edge_length(&self) -> f64 {
        self.ideal_edge_length
    }

    /// Velocity damping factor in `(0, 1]`
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Iteration budget
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Kinetic energy per object below which the simulation stops
    pub fn convergence_epsilon(&self) -> f64 {
        self.convergence_epsilon
    }

    /// Distance from the canvas border where the boundary force starts
    pub fn boundary_margin(&self) -> f64 {
        self.boundary_margin
    }

    /// Gain of the boundary force
    pub fn boundary_stiffness(&self) -> f64 {
        self.boundary_stiffness
    }

    /// Maximum magnitude of the boundary force
    pub fn boundary_force_cap(&self) -> f64 {
        self.boundary_force_cap
    }

    /// Whether the simulation runs at all
    pub fn enable_force_directed(&self) -> bool {
        self.enable_force_directed
    }

    /// Checks that the parameters describe a simulation that can run.
    ///
    /// Infinite constants are accepted; they show up as a diverged layout
    /// rather than as a parameter error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] found.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ParameterError::Damping(self.damping));
        }
        if self.max_iterations == 0 {
            return Err(ParameterError::ZeroIterations);
        }

        let constants = [
            ("repulsion_constant", self.repulsion_constant),
            ("spring_constant", self.spring_constant),
            ("ideal_edge_length", self.ideal_edge_length),
            ("convergence_epsilon", self.convergence_epsilon),
            ("boundary_margin", self.boundary_margin),
            ("boundary_stiffness", self.boundary_stiffness),
            ("boundary_force_cap", self.boundary_force_cap),
        ];
        for (name, value) in constants {
            // NaN fails this comparison as well
            if !(value >= 0.0) {
                return Err(ParameterError::Negative { name, value });
            }
        }

        Ok(())
    }
}
