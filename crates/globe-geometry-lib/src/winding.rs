//! Winding direction of contours in longitude/latitude space
//!
//! Signed areas follow the usual planar convention with `x = longitude` and
//! `y = latitude`: positive means counter-clockwise.
//!
//! Contours that cross the antimeridian are measured after unwrapping their
//! longitudes into a continuous range. A contour enclosing a pole does not
//! close after unwrapping (its ends are 360 degrees apart), so it is closed
//! along the pole latitude before measuring.

use crate::location::{ANTIMERIDIAN_LONGITUDE, Location, Pole, edge_crosses_antimeridian};
use crate::utils;
use geo::Area;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Traversal direction of a ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// Winding matching the sign of an area, `None` for zero (degenerate ring)
    #[inline]
    pub fn from_signed_area(area: f64) -> Option<Self> {
        if area > 0.0 {
            Some(Winding::CounterClockwise)
        } else if area < 0.0 {
            Some(Winding::Clockwise)
        } else {
            None
        }
    }
}

/// Planar signed area of a contour, taken exactly as given
#[inline]
pub fn signed_area(contour: &[Location]) -> f64 {
    utils::contour_to_polygon(contour).signed_area()
}

/// Winding of a contour, taken exactly as given
#[inline]
pub fn winding(contour: &[Location]) -> Option<Winding> {
    Winding::from_signed_area(signed_area(contour))
}

/// Longitudes of a contour made continuous across the antimeridian.
///
/// Every crossing edge shifts the following longitudes by 360 degrees in the
/// direction of travel. Returns the unwrapped longitudes together with the
/// net shift accumulated after walking the closing edge as well (non-zero
/// for rings that wind around a pole).
pub fn unwrapped_longitudes(contour: &[Location]) -> (Vec<f64>, f64) {
    let mut longitudes = Vec::with_capacity(contour.len());
    let mut offset = 0.0;

    for (i, location) in contour.iter().enumerate() {
        if i > 0 {
            offset += crossing_shift(contour[i - 1], *location);
        }
        longitudes.push(location.longitude + offset);
    }

    if let (Some(&last), Some(&first)) = (contour.last(), contour.first()) {
        if contour.len() > 1 {
            offset += crossing_shift(last, first);
        }
    }

    (longitudes, offset)
}

/// Signed area of a contour once unwrapped and, when `pole` is set, closed
/// along the pole latitude.
///
/// For a ring around the north pole this is positive when the ring travels
/// east; around the south pole, when it travels west.
pub fn capped_signed_area(contour: &[Location], pole: Pole) -> f64 {
    let (longitudes, net_shift) = unwrapped_longitudes(contour);
    let mut ring: Vec<Location> = contour
        .iter()
        .zip(&longitudes)
        .map(|(location, &longitude)| Location::new(location.latitude, longitude))
        .collect();

    if let (Some(pole_latitude), Some(first)) = (pole.latitude(), ring.first().copied()) {
        // Walk the closing edge, then run along the pole back to the start
        let closed_longitude = first.longitude + net_shift;
        ring.push(Location::new(first.latitude, closed_longitude));
        ring.push(Location::new(pole_latitude, closed_longitude));
        ring.push(Location::new(pole_latitude, first.longitude));
    }

    signed_area(&ring)
}

#[inline]
fn crossing_shift(a: Location, b: Location) -> f64 {
    if !edge_crosses_antimeridian(a, b) {
        0.0
    } else if a.longitude > 0.0 {
        // Eastward: +180 continues as -180
        2.0 * ANTIMERIDIAN_LONGITUDE
    } else {
        -2.0 * ANTIMERIDIAN_LONGITUDE
    }
}
