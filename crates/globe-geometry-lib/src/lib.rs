//! Globe Geometry Library - Geometry Helpers for Virtual Globe Renderers
//!
//! This library prepares geographic shapes for flat 2D rendering and indexes screen-space
//! objects for hit testing. Polygons drawn continuously across the antimeridian or around a
//! pole are split into pieces that stay within `[-180, 180]` longitude, and a bounded-depth
//! quadtree keeps on-screen rectangles queryable by region.
//!
//! # Architecture
//!
//! - **[`Location`]**: Latitude/longitude point plus antimeridian helpers
//! - **[`PolygonSplitter`]**: Antimeridian and pole aware polygon splitting
//! - **[`Winding`]**: Ring orientation, also across the seam and around poles
//! - **[`QuadTree`]**: Screen-space spatial index over [`Bounds`] rectangles
//!
//! # Performance Characteristics
//!
//! - **Split**: O(N + C log C) per contour (N=points, C=antimeridian crossings)
//! - **Batch split**: polygons are independent and split in parallel
//! - **Quadtree query**: O(D + K) where D=depth, K=candidates

pub mod location;
mod quadtree;
mod splitter;
pub mod utils;
pub mod winding;

// Public API exports
pub use location::{Contour, Location, Pole, Polygon};
pub use quadtree::{Bounds, QuadTree, QuadTreeConfig, QuadTreeItem, Quadrant};
pub use splitter::{ContourSplit, PolygonSplitter, Split, is_full_sphere, validate_contours};
pub use winding::Winding;

/// Error types for the geometry library
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid contour {index}: {reason}")]
    InvalidContour { index: usize, reason: String },

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
