//! Overlap and spacing score.

use scenic_core::{
    geometry::{Bounds, Point},
    scene::Scene,
};

use super::coefficient_of_variation;

/// Points lost at most to overlapping objects
const OVERLAP_PENALTY: f64 = 60.0;

/// Overlap ratio is scaled by this factor before saturating at one, so a
/// tenth of the canvas covered twice costs the full penalty
const OVERLAP_SCALE: f64 = 10.0;

/// Points lost at most to uneven spacing
const SPACING_PENALTY: f64 = 40.0;

/// Scores how cleanly the objects of `scene` are arranged.
///
/// The score starts at 100 and loses up to 60 points for the summed pairwise
/// overlap area relative to the canvas area, and up to 40 points for the
/// coefficient of variation of nearest-neighbor center distances. Scenes with
/// fewer than two objects score 100.
pub fn layout_score(scene: &Scene) -> f64 {
    let objects = scene.objects();
    if objects.len() < 2 {
        return 100.0;
    }

    let bounds: Vec<Bounds> = objects.iter().map(|object| object.bounds()).collect();
    let centers: Vec<Point> = objects.iter().map(|object| object.center()).collect();

    let overlap_ratio = total_overlap(&bounds) / scene.canvas_size().area();
    let spacing_variation = coefficient_of_variation(&nearest_neighbor_distances(&centers));

    let score = 100.0
        - OVERLAP_PENALTY * (OVERLAP_SCALE * overlap_ratio).min(1.0)
        - SPACING_PENALTY * spacing_variation.min(1.0);
    score.clamp(0.0, 100.0)
}

/// Sum of the overlap areas of every unordered pair
fn total_overlap(bounds: &[Bounds]) -> f64 {
    bounds
        .iter()
        .enumerate()
        .flat_map(|(i, a)| bounds[i + 1..].iter().map(move |b| a.overlap_area(b)))
        .sum()
}

/// Distance from each center to the closest other center
fn nearest_neighbor_distances(centers: &[Point]) -> Vec<f64> {
    centers
        .iter()
        .enumerate()
        .map(|(i, center)| {
            centers
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| center.distance(*other))
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}
