//! Relationship routing score.

use log::trace;

use scenic_core::{
    geometry::{Bounds, Point},
    scene::{Endpoints, Scene, SceneIndex},
};

/// Percentage of relationships whose straight segment between endpoint
/// centers avoids every object other than its endpoints.
///
/// Self-loops never cross anything. A scene without relationships scores 100.
pub fn connectivity_score(scene: &Scene, index: &SceneIndex<'_>) -> f64 {
    let endpoints = index.endpoints();
    if endpoints.is_empty() {
        return 100.0;
    }

    let objects = scene.objects();
    let centers: Vec<Point> = objects.iter().map(|object| object.center()).collect();
    let bounds: Vec<Bounds> = objects.iter().map(|object| object.bounds()).collect();

    let clear = endpoints
        .iter()
        .zip(scene.relationships())
        .filter(|(ends, relationship)| {
            let crossed = crosses_third_object(**ends, &centers, &bounds);
            if crossed {
                trace!(relationship = relationship.id(); "Relationship crosses an object");
            }
            !crossed
        })
        .count();

    100.0 * clear as f64 / endpoints.len() as f64
}

fn crosses_third_object(ends: Endpoints, centers: &[Point], bounds: &[Bounds]) -> bool {
    if ends.is_self_loop() {
        return false;
    }

    let start = centers[ends.source];
    let end = centers[ends.target];
    bounds
        .iter()
        .enumerate()
        .any(|(k, rect)| !ends.touches(k) && rect.intersects_segment(start, end))
}
