//! Error adapter for converting ScenicError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error gets a
//! stable diagnostic code and, where the fix is clear, a help text.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use scenic::{ScenicError, scene::StructureError};

/// Adapter rendering a [`ScenicError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a ScenicError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(error_code(self.0)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        error_help(self.0).map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Stable diagnostic code for an error
pub fn error_code(err: &ScenicError) -> &'static str {
    match err {
        ScenicError::Io(_) => "scenic::io",
        ScenicError::Json(_) => "scenic::json",
        ScenicError::Structure(structure) => match structure {
            StructureError::DuplicateObjectId { .. } => "scenic::structure::duplicate_object_id",
            StructureError::DanglingRelationship { .. } => {
                "scenic::structure::dangling_relationship"
            }
            StructureError::NonPositiveDimension { .. } => {
                "scenic::structure::non_positive_dimension"
            }
            StructureError::NonPositiveCanvas { .. } => "scenic::structure::non_positive_canvas",
            StructureError::NonFinitePosition { .. } => "scenic::structure::non_finite_position",
        },
        ScenicError::InvalidParameters(_) => "scenic::parameters",
        ScenicError::Config(_) => "scenic::config",
    }
}

fn error_help(err: &ScenicError) -> Option<&'static str> {
    let help = match err {
        ScenicError::Io(_) => return None,
        ScenicError::Json(_) => {
            "a scene needs `id`, `canvas_width` and `canvas_height`; objects need `id`, `object_type`, `position` and `dimensions`"
        }
        ScenicError::Structure(structure) => match structure {
            StructureError::DuplicateObjectId { .. } => "give every object a unique `id`",
            StructureError::DanglingRelationship { .. } => {
                "`source_id` and `target_id` must name objects of the same scene"
            }
            StructureError::NonPositiveDimension { .. } => {
                "object `width` and `height` must be greater than zero"
            }
            StructureError::NonPositiveCanvas { .. } => {
                "`canvas_width` and `canvas_height` must be greater than zero"
            }
            StructureError::NonFinitePosition { .. } => "object positions must be finite numbers",
        },
        ScenicError::InvalidParameters(_) => {
            "check the [layout] table of the configuration file"
        }
        ScenicError::Config(_) => "pass a valid TOML file with --config, or remove it to use defaults",
    };
    Some(help)
}
