//! Force-directed layout engine
//!
//! This module implements a discrete-time spring-electrical simulation:
//! every pair of objects repels, every relationship acts as a spring, and
//! objects near the canvas border are pushed back inside. The run is fully
//! deterministic: objects and relationships are visited in insertion order
//! and coincident objects are separated along a direction derived from their
//! indices.

use log::{debug, trace, warn};

use scenic_core::{
    geometry::{DISTANCE_EPSILON, Point, Size},
    scene::{Endpoints, Scene, SceneIndex},
};

use super::{DivergedLayout, LayoutEngine, LayoutOutcome, LayoutParameters, LayoutStats};

/// Distance floor for the repulsion magnitude
const MIN_REPULSION_DISTANCE: f64 = 1.0;

/// π·(3 − √5), spreads tie-break directions evenly around the circle
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Force layout engine for scenes
///
/// Positions are updated with `velocity = (velocity + force) * damping`
/// followed by `position += velocity` until the total kinetic energy drops
/// below the convergence threshold or the iteration budget runs out. The
/// threshold is `convergence_epsilon` per object.
pub struct Engine {
    params: LayoutParameters,
}

impl Engine {
    /// Create a new force layout engine with the given parameters
    pub fn new(params: LayoutParameters) -> Self {
        Self { params }
    }

    /// Parameters the engine runs with
    pub fn parameters(&self) -> &LayoutParameters {
        &self.params
    }

    /// Run the simulation and return the final (unclamped) positions
    fn run_force_simulation(
        &self,
        scene: &Scene,
        index: &SceneIndex<'_>,
        sizes: &[Size],
    ) -> (Vec<Point>, LayoutStats, Option<DivergedLayout>) {
        let ideal_lengths: Vec<f64> = scene
            .relationships()
            .iter()
            .map(|relationship| {
                relationship
                    .ideal_length()
                    .unwrap_or(self.params.ideal_edge_length())
            })
            .collect();

        let canvas = scene.canvas_size();
        let mut positions: Vec<Point> = scene.objects().iter().map(|o| o.center()).collect();
        let mut velocities = vec![Point::default(); positions.len()];
        let mut forces = vec![Point::default(); positions.len()];
        let mut stats = LayoutStats::default();
        let threshold = self.params.convergence_epsilon() * positions.len() as f64;

        for iteration in 1..=self.params.max_iterations() {
            forces.fill(Point::default());
            self.add_repulsion(&positions, &mut forces);
            self.add_springs(&positions, index.endpoints(), &ideal_lengths, &mut forces);
            self.add_boundary(&positions, sizes, canvas, &mut forces);

            // Integrate into fresh buffers so a bad step leaves the last
            // finite state untouched
            let next_velocities: Vec<Point> = velocities
                .iter()
                .zip(&forces)
                .map(|(velocity, force)| velocity.add_point(*force).scale(self.params.damping()))
                .collect();
            let next_positions: Vec<Point> = positions
                .iter()
                .zip(&next_velocities)
                .map(|(position, velocity)| position.add_point(*velocity))
                .collect();

            if let Some(bad) = next_positions.iter().position(|p| !p.is_finite()) {
                let object_id = scene.objects()[bad].id();
                warn!(
                    iteration,
                    object_id;
                    "Force simulation diverged, reverting to last finite positions"
                );
                return (
                    positions,
                    stats,
                    Some(DivergedLayout::new(iteration, object_id)),
                );
            }

            let energy: f64 = next_velocities.iter().map(|v| v.length_squared()).sum();
            positions = next_positions;
            velocities = next_velocities;

            stats.iterations = iteration;
            stats.final_energy = energy;
            trace!(iteration, energy; "Force simulation step");

            if energy < threshold {
                stats.converged = true;
                break;
            }
        }

        (positions, stats, None)
    }

    /// Add pairwise repulsion `k / d²` along the line between centers
    fn add_repulsion(&self, positions: &[Point], forces: &mut [Point]) {
        let constant = self.params.repulsion_constant();

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let delta = positions[i].sub_point(positions[j]);
                let distance = delta.hypot();

                let (direction, distance) = if distance < DISTANCE_EPSILON {
                    (tie_break_direction(i, j), MIN_REPULSION_DISTANCE)
                } else {
                    (
                        delta.scale(1.0 / distance),
                        distance.max(MIN_REPULSION_DISTANCE),
                    )
                };

                let push = direction.scale(constant / (distance * distance));
                forces[i] = forces[i].add_point(push);
                forces[j] = forces[j].sub_point(push);
            }
        }
    }

    /// Add spring forces `k · (d − L)` pulling (or pushing) related objects
    fn add_springs(
        &self,
        positions: &[Point],
        endpoints: &[Endpoints],
        ideal_lengths: &[f64],
        forces: &mut [Point],
    ) {
        let constant = self.params.spring_constant();

        for (ends, &ideal_length) in endpoints.iter().zip(ideal_lengths) {
            if ends.is_self_loop() {
                continue;
            }

            let delta = positions[ends.target].sub_point(positions[ends.source]);
            let direction = delta.normalize_or_zero();
            let pull = direction.scale(constant * (delta.hypot() - ideal_length));

            forces[ends.source] = forces[ends.source].add_point(pull);
            forces[ends.target] = forces[ends.target].sub_point(pull);
        }
    }

    /// Add the inward boundary force for objects close to (or past) the border
    fn add_boundary(&self, positions: &[Point], sizes: &[Size], canvas: Size, forces: &mut [Point]) {
        for ((position, size), force) in positions.iter().zip(sizes).zip(forces.iter_mut()) {
            *force = force.add_point(self.boundary_force(*position, *size, canvas));
        }
    }

    fn boundary_force(&self, center: Point, size: Size, canvas: Size) -> Point {
        let margin = self.params.boundary_margin();
        let push = |gap: f64| {
            if gap < margin {
                (self.params.boundary_stiffness() * (margin - gap))
                    .min(self.params.boundary_force_cap())
            } else {
                0.0
            }
        };

        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;

        let left = push(center.x() - half_width);
        let right = push(canvas.width() - (center.x() + half_width));
        let top = push(center.y() - half_height);
        let bottom = push(canvas.height() - (center.y() + half_height));

        Point::new(left - right, top - bottom)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(LayoutParameters::default())
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, scene: &Scene, index: &SceneIndex<'_>) -> LayoutOutcome {
        let mut arranged = scene.clone();

        if !self.params.enable_force_directed() || scene.objects().len() <= 1 {
            debug!(
                enabled = self.params.enable_force_directed(),
                object_count = scene.objects().len();
                "Skipping force simulation"
            );
            return LayoutOutcome {
                scene: arranged,
                stats: LayoutStats::default(),
                divergence: None,
            };
        }

        let sizes: Vec<Size> = scene.objects().iter().map(|o| o.size()).collect();
        let (positions, stats, divergence) = self.run_force_simulation(scene, index, &sizes);

        debug!(
            iterations = stats.iterations(),
            converged = stats.converged(),
            energy = stats.final_energy(),
            diverged = divergence.is_some();
            "Force simulation finished"
        );

        // Hard post-condition: every rectangle ends up inside the canvas
        let canvas = scene.canvas_bounds();
        for ((object, position), size) in arranged
            .objects_mut()
            .iter_mut()
            .zip(positions)
            .zip(&sizes)
        {
            object.set_center(canvas.clamp_center(position, *size));
        }

        LayoutOutcome {
            scene: arranged,
            stats,
            divergence,
        }
    }
}

/// Unit direction used to separate two coincident objects `i < j`
fn tie_break_direction(i: usize, j: usize) -> Point {
    let step = (31 * i + j + 1) as f64;
    let angle = GOLDEN_ANGLE * step;
    Point::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use scenic_core::scene::{DiagramObject, Relationship};

    use super::*;

    fn object(id: &str, x: f64, y: f64, width: f64, height: f64) -> DiagramObject {
        DiagramObject::new(id, "box", Point::new(x, y), Size::new(width, height))
    }

    fn run(scene: &Scene, params: LayoutParameters) -> LayoutOutcome {
        let index = SceneIndex::new(scene).unwrap();
        Engine::new(params).calculate(scene, &index)
    }

    fn centers(scene: &Scene) -> Vec<Point> {
        scene.objects().iter().map(|o| o.center()).collect()
    }

    #[test]
    fn test_disabled_engine_is_noop() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 400.0, 300.0, 100.0, 100.0))
            .with_object(object("b", 400.0, 300.0, 100.0, 100.0));

        let outcome = run(&scene, LayoutParameters::default().with_force_directed(false));
        assert_eq!(outcome.scene(), &scene);
        assert_eq!(outcome.stats().iterations(), 0);
    }

    #[test]
    fn test_single_object_is_untouched() {
        // Outside the canvas on purpose: the no-op path does not clamp
        let scene =
            Scene::new("s", Size::new(100.0, 100.0)).with_object(object("a", -50.0, 20.0, 10.0, 10.0));

        let outcome = run(&scene, LayoutParameters::default());
        assert_eq!(outcome.scene(), &scene);
    }

    #[test]
    fn test_spring_reaches_ideal_length() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 150.0, 300.0, 80.0, 40.0))
            .with_object(object("b", 650.0, 300.0, 80.0, 40.0))
            .with_relationship(Relationship::new("r", "connects", "a", "b").with_ideal_length(150.0));

        let outcome = run(&scene, LayoutParameters::default().with_max_iterations(500));
        let positions = centers(outcome.scene());

        assert!(outcome.stats().converged());
        assert!((positions[0].distance(positions[1]) - 150.0).abs() < 5.0);
        // Symmetric forces keep the midpoint fixed and the order intact
        assert_approx_eq!(f64, positions[0].x() + positions[1].x(), 800.0, epsilon = 1e-6);
        assert!(positions[0].x() < positions[1].x());
        assert_approx_eq!(f64, positions[0].y(), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_eight_box_chain_converges_with_defaults() {
        let mut scene = Scene::new("chain", Size::new(600.0, 400.0));
        for i in 0..8 {
            let x = 100.0 + (i % 4) as f64 * 130.0;
            let y = 120.0 + (i / 4) as f64 * 160.0;
            scene = scene.with_object(object(&format!("n{i}"), x, y, 60.0, 40.0));
        }
        for i in 1..8 {
            let (source, target) = (format!("n{}", i - 1), format!("n{i}"));
            scene = scene.with_relationship(Relationship::new(
                format!("e{i}"),
                "connects",
                source,
                target,
            ));
        }

        let params = LayoutParameters::default();
        let outcome = run(&scene, params.clone());

        assert!(outcome.stats().converged());
        assert!(outcome.stats().iterations() < params.max_iterations());
        assert!(outcome.stats().final_energy() < 8.0 * params.convergence_epsilon());
    }

    #[test]
    fn test_relationship_without_override_uses_default_length() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 300.0, 300.0, 40.0, 40.0))
            .with_object(object("b", 500.0, 300.0, 40.0, 40.0))
            .with_relationship(Relationship::new("r", "connects", "a", "b"));

        let params = LayoutParameters::default()
            .with_ideal_edge_length(100.0)
            .with_max_iterations(500);
        let positions = centers(run(&scene, params).scene());

        assert!((positions[0].distance(positions[1]) - 100.0).abs() < 5.0);
    }

    #[test]
    fn test_coincident_objects_are_separated() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 400.0, 300.0, 100.0, 100.0))
            .with_object(object("b", 400.0, 300.0, 100.0, 100.0));

        let outcome = run(&scene, LayoutParameters::default());
        let arranged = outcome.scene();

        let a = arranged.objects()[0].bounds();
        let b = arranged.objects()[1].bounds();
        assert_eq!(a.overlap_area(&b), 0.0);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        assert_eq!(tie_break_direction(0, 1), tie_break_direction(0, 1));
        assert_ne!(tie_break_direction(0, 1), tie_break_direction(0, 2));
        assert_approx_eq!(f64, tie_break_direction(3, 7).hypot(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_self_loop_contributes_nothing() {
        let base = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 300.0, 300.0, 40.0, 40.0))
            .with_object(object("b", 500.0, 300.0, 40.0, 40.0));
        let looped = base
            .clone()
            .with_relationship(Relationship::new("loop", "connects", "a", "a"));

        let params = LayoutParameters::default();
        assert_eq!(
            centers(run(&base, params.clone()).scene()),
            centers(run(&looped, params).scene())
        );
    }

    #[test]
    fn test_result_is_clamped_inside_canvas() {
        let scene = Scene::new("s", Size::new(400.0, 300.0))
            .with_object(object("a", -200.0, 50.0, 60.0, 40.0))
            .with_object(object("b", 900.0, 900.0, 60.0, 40.0));

        let outcome = run(&scene, LayoutParameters::default().with_max_iterations(3));
        let canvas = outcome.scene().canvas_bounds();
        for object in outcome.scene().objects() {
            assert!(canvas.contains_bounds(&object.bounds()), "{object:?}");
        }
    }

    #[test]
    fn test_boundary_force_is_capped_and_inward() {
        let engine = Engine::default();
        let canvas = Size::new(200.0, 200.0);
        let size = Size::new(20.0, 20.0);

        // Far outside on the left: capped push to the right
        let force = engine.boundary_force(Point::new(-1000.0, 100.0), size, canvas);
        assert_eq!(force, Point::new(10.0, 0.0));

        // Well inside: no force
        let force = engine.boundary_force(Point::new(100.0, 100.0), size, canvas);
        assert!(force.is_zero());

        // Inside the bottom margin by 10 units: linear push upwards
        let force = engine.boundary_force(Point::new(100.0, 180.0), size, canvas);
        assert_approx_eq!(f64, force.y(), -5.0);
        assert_eq!(force.x(), 0.0);
    }

    #[test]
    fn test_divergence_reverts_to_original_positions() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 400.0, 300.0, 50.0, 50.0))
            .with_object(object("b", 401.0, 300.0, 50.0, 50.0))
            .with_object(object("c", 402.0, 300.0, 50.0, 50.0));

        let outcome = run(
            &scene,
            LayoutParameters::default().with_repulsion_constant(f64::MAX),
        );

        let divergence = outcome.divergence().expect("layout should diverge");
        assert_eq!(divergence.iteration(), 1);
        assert_eq!(divergence.object_id(), "a");
        assert_eq!(outcome.stats().iterations(), 0);
        assert_eq!(centers(outcome.scene()), centers(&scene));
    }

    #[test]
    fn test_runs_are_identical() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(object("a", 100.0, 100.0, 60.0, 40.0))
            .with_object(object("b", 120.0, 110.0, 60.0, 40.0))
            .with_object(object("c", 500.0, 400.0, 60.0, 40.0))
            .with_relationship(Relationship::new("r1", "connects", "a", "c"))
            .with_relationship(Relationship::new("r2", "connects", "b", "c"));

        let first = run(&scene, LayoutParameters::default());
        let second = run(&scene, LayoutParameters::default());
        assert_eq!(first.scene(), second.scene());
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn test_only_positions_change() {
        let scene = Scene::new("s", Size::new(800.0, 600.0))
            .with_object(
                object("a", 390.0, 300.0, 60.0, 40.0)
                    .with_label("A")
                    .with_property("rotation", 15.0),
            )
            .with_object(object("b", 410.0, 300.0, 60.0, 40.0));

        let outcome = run(&scene, LayoutParameters::default());
        for (before, after) in scene.objects().iter().zip(outcome.scene().objects()) {
            assert_eq!(before.id(), after.id());
            assert_eq!(before.size(), after.size());
            assert_eq!(before.label(), after.label());
            assert_eq!(before.properties(), after.properties());
            assert_eq!(before.position().z, after.position().z);
        }
        assert_ne!(centers(&scene), centers(outcome.scene()));
    }
}
