//! Alignment and size consistency score.

use indexmap::IndexMap;

use scenic_core::scene::{DiagramObject, Scene};

use super::coefficient_of_variation;

const ALIGNMENT_WEIGHT: f64 = 0.6;
const CONSISTENCY_WEIGHT: f64 = 0.4;

/// Scores visual regularity among objects that share a type.
///
/// Only types with at least two objects take part. An object is aligned when
/// another object of its type has a center x or y within `tolerance`.
/// Consistency is one minus the mean coefficient of variation of widths and
/// heights per type, floored at zero. Each part defaults to 1 when no type
/// qualifies; the score is `100 * (0.6 * alignment + 0.4 * consistency)`.
pub fn style_score(scene: &Scene, tolerance: f64) -> f64 {
    let groups: Vec<Vec<&DiagramObject>> = group_by_type(scene.objects())
        .into_values()
        .filter(|group| group.len() >= 2)
        .collect();

    if groups.is_empty() {
        return 100.0;
    }

    let alignment = alignment_ratio(&groups, tolerance);
    let consistency = size_consistency(&groups);

    (100.0 * (ALIGNMENT_WEIGHT * alignment + CONSISTENCY_WEIGHT * consistency)).clamp(0.0, 100.0)
}

/// Groups objects by type, in order of first appearance
fn group_by_type(objects: &[DiagramObject]) -> IndexMap<&str, Vec<&DiagramObject>> {
    let mut groups: IndexMap<&str, Vec<&DiagramObject>> = IndexMap::new();
    for object in objects {
        groups.entry(object.object_type()).or_default().push(object);
    }
    groups
}

fn alignment_ratio(groups: &[Vec<&DiagramObject>], tolerance: f64) -> f64 {
    let mut members = 0usize;
    let mut aligned = 0usize;

    for group in groups {
        for (i, object) in group.iter().enumerate() {
            members += 1;
            let center = object.center();
            let has_partner = group.iter().enumerate().any(|(j, other)| {
                let other = other.center();
                j != i
                    && ((center.x() - other.x()).abs() <= tolerance
                        || (center.y() - other.y()).abs() <= tolerance)
            });
            if has_partner {
                aligned += 1;
            }
        }
    }

    if members == 0 {
        1.0
    } else {
        aligned as f64 / members as f64
    }
}

fn size_consistency(groups: &[Vec<&DiagramObject>]) -> f64 {
    if groups.is_empty() {
        return 1.0;
    }

    let total_variation: f64 = groups
        .iter()
        .map(|group| {
            let widths: Vec<f64> = group.iter().map(|object| object.size().width()).collect();
            let heights: Vec<f64> = group.iter().map(|object| object.size().height()).collect();
            (coefficient_of_variation(&widths) + coefficient_of_variation(&heights)) / 2.0
        })
        .sum();

    1.0 - (total_variation / groups.len() as f64).min(1.0)
}
