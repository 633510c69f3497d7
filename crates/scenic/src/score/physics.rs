//! Domain rule checks.
//!
//! Rules are grouped by scene domain in a [`PhysicsRegistry`]. Each rule
//! reports how many things it checked and how many of them violate it; the
//! physics score is the share of checks that passed. Scenes whose domain has
//! no rules score 100.

use indexmap::IndexMap;
use log::trace;

use scenic_core::{
    geometry::{DISTANCE_EPSILON, Point},
    scene::{DiagramObject, Scene, SceneIndex},
};

const MECHANICS_DOMAINS: [&str; 2] = ["physics", "mechanics"];
const ELECTRICAL_DOMAINS: [&str; 3] = ["electrical", "circuit", "electronics"];

/// Object type of force arrows
const FORCE_TYPE: &str = "force";

/// Object types that carry current between components
const CONDUCTOR_TYPES: [&str; 3] = ["wire", "node", "junction"];

/// Object types that annotate a diagram and are never wired
const ANNOTATION_TYPES: [&str; 3] = ["label", "text", "annotation"];

/// Checked and violated counts of one or more rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    checked: usize,
    violations: usize,
}

impl RuleOutcome {
    /// Violations are capped at `checked`
    pub fn new(checked: usize, violations: usize) -> Self {
        Self {
            checked,
            violations: violations.min(checked),
        }
    }

    /// Number of checks performed
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// Number of failed checks
    pub fn violations(&self) -> usize {
        self.violations
    }

    /// Records one check
    fn record(&mut self, passed: bool) {
        self.checked += 1;
        if !passed {
            self.violations += 1;
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            checked: self.checked + other.checked,
            violations: self.violations + other.violations,
        }
    }

    /// Share of passed checks as a percentage, 100 when nothing was checked
    pub fn score(&self) -> f64 {
        if self.checked == 0 {
            return 100.0;
        }
        100.0 * (1.0 - self.violations as f64 / self.checked as f64)
    }
}

/// A domain-specific consistency check.
pub trait PhysicsRule: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Checks `scene` and counts the violations found
    fn check(&self, scene: &Scene, index: &SceneIndex<'_>) -> RuleOutcome;
}

/// Rules keyed by lowercase domain name.
pub struct PhysicsRegistry {
    rules: IndexMap<String, Vec<Box<dyn PhysicsRule>>>,
}

impl PhysicsRegistry {
    /// Creates a registry without any rules
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Adds `rule` to the rules checked for `domain`
    pub fn register(&mut self, domain: &str, rule: Box<dyn PhysicsRule>) {
        self.rules
            .entry(domain.to_ascii_lowercase())
            .or_default()
            .push(rule);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_rule(mut self, domain: &str, rule: Box<dyn PhysicsRule>) -> Self {
        self.register(domain, rule);
        self
    }

    /// Returns true if at least one rule is registered for `domain`
    pub fn has_rules_for(&self, domain: &str) -> bool {
        self.rules
            .get(&domain.to_ascii_lowercase())
            .is_some_and(|rules| !rules.is_empty())
    }

    /// Combined outcome of every rule registered for the scene's domain
    pub fn evaluate(&self, scene: &Scene, index: &SceneIndex<'_>) -> RuleOutcome {
        let Some(rules) = self.rules.get(&scene.domain().to_ascii_lowercase()) else {
            return RuleOutcome::default();
        };

        rules.iter().fold(RuleOutcome::default(), |total, rule| {
            let outcome = rule.check(scene, index);
            trace!(
                rule = rule.name(),
                checked = outcome.checked(),
                violations = outcome.violations();
                "Physics rule checked"
            );
            total.merge(outcome)
        })
    }

    /// Physics score of `scene` in `[0, 100]`
    pub fn score(&self, scene: &Scene, index: &SceneIndex<'_>) -> f64 {
        self.evaluate(scene, index).score()
    }
}

impl Default for PhysicsRegistry {
    /// Registry with the built-in mechanics and electrical rules
    fn default() -> Self {
        let mut registry = Self::empty();
        for domain in MECHANICS_DOMAINS {
            registry.register(domain, Box::new(ForceDirectionRule));
            registry.register(domain, Box::new(PositiveMassRule));
        }
        for domain in ELECTRICAL_DOMAINS {
            registry.register(domain, Box::new(WireAnchoringRule));
            registry.register(domain, Box::new(ConnectedComponentsRule));
        }
        registry
    }
}

fn is_type(object: &DiagramObject, kind: &str) -> bool {
    object.object_type().eq_ignore_ascii_case(kind)
}

fn is_any_type(object: &DiagramObject, kinds: &[&str]) -> bool {
    kinds.iter().any(|kind| is_type(object, kind))
}

/// Force arrows must point away from the body they act on.
///
/// The body of a force is the first non-force object it is related to, or
/// else the nearest non-force object. The arrow direction comes from the
/// `rotation` property in degrees (0 points along +x, default 0). A force
/// whose center coincides with its body is not checked.
pub struct ForceDirectionRule;

impl ForceDirectionRule {
    fn body_of(scene: &Scene, index: &SceneIndex<'_>, force: usize) -> Option<usize> {
        let objects = scene.objects();

        let related = index
            .incident(force)
            .iter()
            .map(|&relationship| index.endpoints()[relationship].other(force))
            .find(|&other| other != force && !is_type(&objects[other], FORCE_TYPE));
        if related.is_some() {
            return related;
        }

        let center = objects[force].center();
        objects
            .iter()
            .enumerate()
            .filter(|(_, object)| !is_type(object, FORCE_TYPE))
            .map(|(i, object)| (i, center.distance(object.center())))
            .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                Some((_, distance)) if distance <= candidate.1 => best,
                _ => Some(candidate),
            })
            .map(|(i, _)| i)
    }
}

impl PhysicsRule for ForceDirectionRule {
    fn name(&self) -> &'static str {
        "force_direction"
    }

    fn check(&self, scene: &Scene, index: &SceneIndex<'_>) -> RuleOutcome {
        let objects = scene.objects();
        let mut outcome = RuleOutcome::default();

        for (i, force) in objects.iter().enumerate() {
            if !is_type(force, FORCE_TYPE) {
                continue;
            }
            let Some(body) = Self::body_of(scene, index, i) else {
                continue;
            };

            let offset = force.center().sub_point(objects[body].center());
            if offset.hypot() < DISTANCE_EPSILON {
                continue;
            }

            let direction = Point::from_angle_degrees(force.rotation().unwrap_or(0.0));
            outcome.record(direction.dot(offset) >= 0.0);
        }

        outcome
    }
}

/// Every numeric `mass` property must be strictly positive.
pub struct PositiveMassRule;

impl PhysicsRule for PositiveMassRule {
    fn name(&self) -> &'static str {
        "positive_mass"
    }

    fn check(&self, scene: &Scene, _index: &SceneIndex<'_>) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        for mass in scene.objects().iter().filter_map(DiagramObject::mass) {
            outcome.record(mass > 0.0);
        }
        outcome
    }
}

/// In scenes that draw conductors, every relationship must attach to one.
pub struct WireAnchoringRule;

impl PhysicsRule for WireAnchoringRule {
    fn name(&self) -> &'static str {
        "wire_anchoring"
    }

    fn check(&self, scene: &Scene, index: &SceneIndex<'_>) -> RuleOutcome {
        let objects = scene.objects();
        let mut outcome = RuleOutcome::default();

        if !objects.iter().any(|object| is_any_type(object, &CONDUCTOR_TYPES)) {
            return outcome;
        }

        for ends in index.endpoints() {
            let anchored = is_any_type(&objects[ends.source], &CONDUCTOR_TYPES)
                || is_any_type(&objects[ends.target], &CONDUCTOR_TYPES);
            outcome.record(anchored);
        }
        outcome
    }
}

/// In wired scenes, every component must take part in a relationship.
///
/// Conductors and annotations are exempt. Scenes without any relationship
/// are not checked.
pub struct ConnectedComponentsRule;

impl PhysicsRule for ConnectedComponentsRule {
    fn name(&self) -> &'static str {
        "connected_components"
    }

    fn check(&self, scene: &Scene, index: &SceneIndex<'_>) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        if index.endpoints().is_empty() {
            return outcome;
        }

        for (i, object) in scene.objects().iter().enumerate() {
            if is_any_type(object, &CONDUCTOR_TYPES) || is_any_type(object, &ANNOTATION_TYPES) {
                continue;
            }
            outcome.record(index.is_connected(i));
        }
        outcome
    }
}
