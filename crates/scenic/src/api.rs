//! JSON request/response contract.
//!
//! These functions never return `Err`: failures are reported inside the
//! response with `success: false`, the same way a service endpoint would
//! answer. Scenes travel as [`serde_json::Value`] so that a scene which fails
//! to deserialize can still be echoed back unchanged.
//!
//! ```
//! use serde_json::json;
//!
//! let scene = json!({
//!     "id": "s",
//!     "canvas_width": 400.0,
//!     "canvas_height": 300.0,
//!     "objects": [],
//!     "relationships": []
//! });
//!
//! let response = scenic::api::validate(&scenic::SceneOptimizer::default(), scene);
//! assert!(response.success);
//! assert_eq!(response.connectivity_score, 100.0);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ScenicError, SceneOptimizer, scene::Scene};

/// Response of [`optimize_layout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeLayoutResponse {
    pub success: bool,

    /// The optimized scene, or the input unchanged on failure
    pub scene: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Set when the layout diverged and earlier positions were kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Response of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub quality_score: f64,
    pub layout_score: f64,
    pub connectivity_score: f64,
    pub style_score: f64,
    pub physics_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateResponse {
    fn failure(error: &ScenicError) -> Self {
        Self {
            success: false,
            quality_score: 0.0,
            layout_score: 0.0,
            connectivity_score: 0.0,
            style_score: 0.0,
            physics_score: 0.0,
            error: Some(error.to_string()),
        }
    }
}

/// Optimizes the layout of a JSON scene.
///
/// The optimizer's configured layout parameters are used, with the
/// simulation switched on or off by `enable_force_directed`.
pub fn optimize_layout(
    optimizer: &SceneOptimizer,
    scene: Value,
    enable_force_directed: bool,
) -> OptimizeLayoutResponse {
    let params = optimizer
        .config()
        .layout()
        .clone()
        .with_force_directed(enable_force_directed);

    let result = serde_json::from_value::<Scene>(scene.clone())
        .map_err(ScenicError::from)
        .and_then(|parsed| optimizer.optimize_layout(&parsed, &params))
        .and_then(|optimized| {
            let warning = optimized.divergence().map(ToString::to_string);
            let value = serde_json::to_value(optimized.scene())?;
            Ok((value, warning))
        });

    match result {
        Ok((optimized, warning)) => OptimizeLayoutResponse {
            success: true,
            scene: optimized,
            error: None,
            warning,
        },
        Err(err) => {
            warn!(error:% = err; "Layout optimization failed");
            OptimizeLayoutResponse {
                success: false,
                scene,
                error: Some(err.to_string()),
                warning: None,
            }
        }
    }
}

/// Scores a JSON scene without changing it.
pub fn validate(optimizer: &SceneOptimizer, scene: Value) -> ValidateResponse {
    let result = serde_json::from_value::<Scene>(scene)
        .map_err(ScenicError::from)
        .and_then(|parsed| optimizer.validate_diagram(&parsed));

    match result {
        Ok(report) => ValidateResponse {
            success: true,
            quality_score: report.quality_score(),
            layout_score: report.layout_score(),
            connectivity_score: report.connectivity_score(),
            style_score: report.style_score(),
            physics_score: report.physics_score(),
            error: None,
        },
        Err(err) => {
            warn!(error:% = err; "Diagram validation failed");
            ValidateResponse::failure(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dangling_scene() -> Value {
        json!({
            "id": "broken",
            "canvas_width": 400.0,
            "canvas_height": 300.0,
            "objects": [
                {
                    "id": "a",
                    "object_type": "box",
                    "position": {"x": 100.0, "y": 100.0, "z": 0.0},
                    "dimensions": {"width": 20.0, "height": 20.0, "depth": 0.0}
                }
            ],
            "relationships": [
                {"id": "r", "type": "connects", "source_id": "a", "target_id": "ghost"}
            ]
        })
    }

    #[test]
    fn test_optimize_failure_echoes_input() {
        let input = dangling_scene();
        let response = optimize_layout(&SceneOptimizer::default(), input.clone(), true);

        assert!(!response.success);
        assert_eq!(response.scene, input);
        assert!(response.error.unwrap().contains("ghost"));
        assert!(response.warning.is_none());
    }

    #[test]
    fn test_validate_failure_zeroes_scores() {
        let response = validate(&SceneOptimizer::default(), dangling_scene());

        assert!(!response.success);
        assert_eq!(response.quality_score, 0.0);
        assert_eq!(response.physics_score, 0.0);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let input = json!({"id": "no canvas"});
        let response = optimize_layout(&SceneOptimizer::default(), input.clone(), true);

        assert!(!response.success);
        assert_eq!(response.scene, input);
        assert!(response.error.unwrap().starts_with("invalid scene JSON"));
    }

    #[test]
    fn test_disabled_simulation_returns_scene_unchanged() {
        let input = json!({
            "id": "s",
            "domain": "generic",
            "canvas_width": 400.0,
            "canvas_height": 300.0,
            "objects": [
                {
                    "id": "a",
                    "object_type": "box",
                    "position": {"x": 100.0, "y": 100.0, "z": 1.0},
                    "dimensions": {"width": 20.0, "height": 20.0, "depth": 0.0},
                    "label": "A",
                    "properties": {"mass": 2.0},
                    "style": {}
                },
                {
                    "id": "b",
                    "object_type": "box",
                    "position": {"x": 110.0, "y": 100.0, "z": 0.0},
                    "dimensions": {"width": 20.0, "height": 20.0, "depth": 0.0},
                    "label": "B",
                    "properties": {},
                    "style": {"color": "red"}
                }
            ],
            "relationships": []
        });

        let response = optimize_layout(&SceneOptimizer::default(), input.clone(), false);
        assert!(response.success);
        assert_eq!(response.scene["objects"], input["objects"]);
    }

    #[test]
    fn test_response_omits_absent_fields() {
        let response = OptimizeLayoutResponse {
            success: true,
            scene: json!({}),
            error: None,
            warning: None,
        };
        let text = serde_json::to_string(&response).unwrap();
        assert_eq!(text, r#"{"success":true,"scene":{}}"#);
    }
}
