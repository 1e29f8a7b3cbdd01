//! Geographic locations and antimeridian helpers
//!
//! Latitudes and longitudes are stored in degrees. Longitudes may arrive
//! unnormalized (e.g. `190.0` for a path drawn continuously across the
//! dateline); [`normalized_longitude`] folds them back into `[-180, 180]`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Latitude of the north pole in degrees
pub const NORTH_POLE_LATITUDE: f64 = 90.0;

/// Latitude of the south pole in degrees
pub const SOUTH_POLE_LATITUDE: f64 = -90.0;

/// Longitude of the antimeridian in degrees (the seam lies at both +180 and -180)
pub const ANTIMERIDIAN_LONGITUDE: f64 = 180.0;

/// A geographic point in degrees
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A closed ring of locations. The first point is not repeated at the end.
pub type Contour = Vec<Location>;

/// An outer contour followed by zero or more hole contours
pub type Polygon = Vec<Contour>;

/// Which geographic pole a contour encloses, if any
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pole {
    #[default]
    None,
    North,
    South,
}

impl Location {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Copy of this location with the longitude folded into `[-180, 180]`
    #[inline]
    pub fn with_normalized_longitude(&self) -> Self {
        Self::new(self.latitude, normalized_longitude(self.longitude))
    }
}

impl From<Location> for geo::Coord<f64> {
    #[inline]
    fn from(location: Location) -> Self {
        geo::Coord {
            x: location.longitude,
            y: location.latitude,
        }
    }
}

impl From<geo::Coord<f64>> for Location {
    #[inline]
    fn from(coord: geo::Coord<f64>) -> Self {
        Location::new(coord.y, coord.x)
    }
}

impl Pole {
    /// Latitude of the pole, `None` for [`Pole::None`]
    #[inline]
    pub fn latitude(self) -> Option<f64> {
        match self {
            Pole::None => None,
            Pole::North => Some(NORTH_POLE_LATITUDE),
            Pole::South => Some(SOUTH_POLE_LATITUDE),
        }
    }

    /// Pick the pole enclosed by a ring that crosses the antimeridian an odd
    /// number of times, based on its latitude extent.
    pub fn from_latitude_range(min_latitude: f64, max_latitude: f64) -> Self {
        if min_latitude > 0.0 {
            Pole::North
        } else if max_latitude < 0.0 {
            Pole::South
        } else if max_latitude.abs() >= min_latitude.abs() {
            // Spans the equator, reaching further north than south
            Pole::North
        } else {
            Pole::South
        }
    }
}

/// Fold a longitude into `[-180, 180]`. In-range values (including both
/// seam values) are returned untouched.
#[inline]
pub fn normalized_longitude(degrees: f64) -> f64 {
    let lon = degrees % 360.0;
    if lon > ANTIMERIDIAN_LONGITUDE {
        lon - 360.0
    } else if lon < -ANTIMERIDIAN_LONGITUDE {
        lon + 360.0
    } else {
        lon
    }
}

#[inline]
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether the edge `a -> b` wraps across the antimeridian.
///
/// The test is deliberately on the raw longitude delta: the endpoints must
/// have opposite signs and lie more than 180 (but less than 360) degrees
/// apart. An edge spanning exactly 360 degrees runs along the seam itself and
/// does not count. A genuinely wide edge spanning more than 180 degrees is
/// reported as a crossing too.
#[inline]
pub fn edge_crosses_antimeridian(a: Location, b: Location) -> bool {
    if sign(a.longitude) == sign(b.longitude) {
        return false;
    }
    let delta = (a.longitude - b.longitude).abs();
    delta > ANTIMERIDIAN_LONGITUDE && delta < 2.0 * ANTIMERIDIAN_LONGITUDE
}

/// Whether any consecutive pair in an open path crosses the antimeridian
pub fn locations_cross_antimeridian(locations: &[Location]) -> bool {
    locations
        .windows(2)
        .any(|pair| edge_crosses_antimeridian(pair[0], pair[1]))
}

/// Latitude at which the segment `a -> b` meets `meridian`, interpolating
/// linearly in longitudes shifted into `[0, 360)`.
///
/// Returns `None` when both endpoints share the same shifted longitude.
pub fn meridian_intersection(a: Location, b: Location, meridian: f64) -> Option<f64> {
    let shift = |lon: f64| if lon < 0.0 { lon + 360.0 } else { lon };
    let lon1 = shift(a.longitude);
    let lon2 = shift(b.longitude);
    if lon1 == lon2 {
        return None;
    }
    let target = shift(meridian);
    let slope = (b.latitude - a.latitude) / (lon2 - lon1);
    Some(a.latitude + slope * (target - lon1))
}
