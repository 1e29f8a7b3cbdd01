//! Conversions between the crate's geographic types and `geo` geometries
//!
//! Locations map to planar coordinates with `x = longitude` and `y = latitude`.

use crate::Location;
use geo::{Coord, LineString, Polygon};

/// Build a closed `geo` ring from a contour (the closing point is added by `geo`)
#[inline]
pub fn contour_to_line_string(contour: &[Location]) -> LineString<f64> {
    LineString::from(
        contour
            .iter()
            .map(|&location| Coord::from(location))
            .collect::<Vec<_>>(),
    )
}

/// Build a hole-free `geo` polygon from a contour
#[inline]
pub fn contour_to_polygon(contour: &[Location]) -> Polygon<f64> {
    Polygon::new(contour_to_line_string(contour), vec![])
}

/// Build a `geo` polygon from an outer contour and its holes
pub fn polygon_to_geo(contours: &[Vec<Location>]) -> Option<Polygon<f64>> {
    let (outer, holes) = contours.split_first()?;
    Some(Polygon::new(
        contour_to_line_string(outer),
        holes.iter().map(|hole| contour_to_line_string(hole)).collect(),
    ))
}
