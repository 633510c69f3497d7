//! Scenic Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Scenic layout
//! optimizer and quality scorer:
//!
//! - **Geometry**: points, sizes and axis-aligned rectangles ([`geometry`] module)
//! - **Scene**: the diagram data model, its id index and structural
//!   validation ([`scene`] module)

pub mod geometry;
pub mod scene;
