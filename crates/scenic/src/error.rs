//! Error types for Scenic operations.
//!
//! This module provides the main error type [`ScenicError`] which wraps the
//! conditions that stop a scene from being optimized or scored.

use std::io;

use thiserror::Error;

use scenic_core::scene::StructureError;

use crate::layout::ParameterError;

/// The main error type for Scenic operations.
///
/// A [`DivergedLayout`](crate::layout::DivergedLayout) is not an error: the
/// optimizer recovers from it and reports it next to the result.
#[derive(Debug, Error)]
pub enum ScenicError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    Structure(#[from] StructureError),

    #[error("invalid layout parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    #[error("configuration error: {0}")]
    Config(String),
}
