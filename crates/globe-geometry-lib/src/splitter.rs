//! Antimeridian and pole aware polygon splitting
//!
//! Rings drawn continuously across the dateline (or around a pole) cannot be
//! drawn on a flat equirectangular map as-is. The splitter rewrites them as
//! rings that stay within `[-180, 180]` longitude:
//!
//! - every edge crossing the antimeridian gets two synthesized seam points,
//!   one at +180 and one at -180, at the latitude where the edge crosses;
//! - a ring crossing an odd number of times encloses a pole, and one of its
//!   crossings is closed along the pole latitude instead (the polar cap);
//! - the remaining seam points are paired along the seam by latitude and the
//!   ring is re-traced into one piece per side region.
//!
//! Holes are split the same way and each hole piece is attached to the outer
//! piece that contains it.

use crate::location::{
    ANTIMERIDIAN_LONGITUDE, Contour, Location, NORTH_POLE_LATITUDE, Pole, Polygon,
    SOUTH_POLE_LATITUDE, edge_crosses_antimeridian, meridian_intersection,
};
use crate::winding::{self, Winding};
use crate::{GeometryError, Result, utils};
use geo::{Contains, InteriorPoint};
use rayon::prelude::*;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of splitting one polygon
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Split {
    /// Nothing crossed the antimeridian or enclosed a pole. Holds the input
    /// contours (longitudes folded into range) as a single polygon.
    Unsplit(Polygon),
    /// The outer contour spans the whole globe; passed through untouched.
    FullSphere(Polygon),
    /// One or more polygons, none of which cross the antimeridian
    Split(Vec<Polygon>),
}

/// Outcome of splitting a single contour
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContourSplit {
    /// Resulting rings, in the order they were traced
    pub pieces: Vec<Contour>,
    /// Number of edges that crossed the antimeridian
    pub crossings: usize,
    /// Pole enclosed by the contour
    pub pole: Pole,
    /// Index into `pieces` of the ring closed along the pole latitude
    pub pole_piece: Option<usize>,
    /// Direction of the contour (unwrapped, and capped when enclosing a pole)
    pub winding: Option<Winding>,
}

/// Antimeridian crossing found on the edge leaving `vertex`
#[derive(Clone, Copy, Debug)]
struct EdgeCrossing {
    vertex: usize,
    latitude: f64,
    /// Seam longitude on the side being left (+180 or -180)
    exit_longitude: f64,
}

/// Crossing materialized as two seam points in the traced point list
#[derive(Clone, Copy, Debug)]
struct SeamCrossing {
    exit: usize,
    entry: usize,
    latitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SeamRole {
    Exit,
    Entry,
}

#[derive(Clone, Copy, Debug)]
struct SeamPoint {
    role: SeamRole,
    /// For exits, the entry point on the same seam side the trace jumps to
    link: Option<usize>,
    visited: bool,
}

impl Split {
    /// Whether any contour was split or capped
    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self, Split::Split(_))
    }

    /// Resulting polygons (a single one unless split)
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Split::Unsplit(polygon) | Split::FullSphere(polygon) => std::slice::from_ref(polygon),
            Split::Split(polygons) => polygons,
        }
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        match self {
            Split::Unsplit(polygon) | Split::FullSphere(polygon) => vec![polygon],
            Split::Split(polygons) => polygons,
        }
    }
}

impl ContourSplit {
    /// Whether the contour needed rewriting
    #[inline]
    pub fn is_split(&self) -> bool {
        self.crossings > 0
    }
}

/// Splits polygons at the antimeridian and closes pole-enclosing rings.
///
/// Stateless; every call allocates its own working state, so calls may run
/// concurrently.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolygonSplitter;

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PolygonSplitter {
    /// Split a polygon (outer contour first, then holes).
    ///
    /// Never fails: malformed contours (fewer than 3 points, self
    /// intersections) produce meaningless rings rather than an error. Use
    /// [`PolygonSplitter::try_split_contours`] to reject them up front.
    pub fn split_contours(contours: &[Contour]) -> Split {
        #[cfg(feature = "profiling")]
        profiling::scope!("splitter::split_contours");

        if contours.first().is_some_and(|outer| is_full_sphere(outer)) {
            tracing::debug!("Full sphere contour, passing through unsplit");
            return Split::FullSphere(contours.to_vec());
        }

        let mut splits = contours
            .iter()
            .map(|contour| Self::split_contour(contour))
            .collect::<Vec<_>>()
            .into_iter();

        if !splits.as_slice().iter().any(ContourSplit::is_split) {
            return Split::Unsplit(
                splits
                    .map(|split| split.pieces.into_iter().next().unwrap_or_default())
                    .collect(),
            );
        }

        let Some(outer) = splits.next() else {
            return Split::Unsplit(Vec::new());
        };
        let mut polygons: Vec<Polygon> = outer.pieces.into_iter().map(|piece| vec![piece]).collect();
        let outlines: Vec<geo::Polygon<f64>> = polygons
            .iter()
            .map(|polygon| utils::contour_to_polygon(&polygon[0]))
            .collect();

        for hole in splits {
            for piece in hole.pieces {
                let target = containing_outline(&outlines, &piece);
                if let Some(polygon) = polygons.get_mut(target) {
                    polygon.push(piece);
                }
            }
        }

        tracing::debug!(
            "Split polygon with {} contours into {} polygons",
            contours.len(),
            polygons.len()
        );
        Split::Split(polygons)
    }

    /// Like [`PolygonSplitter::split_contours`], but rejects contours with
    /// fewer than 3 points or non-finite coordinates.
    pub fn try_split_contours(contours: &[Contour]) -> Result<Split> {
        validate_contours(contours)?;
        Ok(Self::split_contours(contours))
    }

    /// Append the split result to a caller-owned buffer.
    ///
    /// The buffer is never cleared. Returns whether anything was split.
    pub fn split_contours_into(contours: &[Contour], output: &mut Vec<Polygon>) -> bool {
        let split = Self::split_contours(contours);
        let did_split = split.is_split();
        output.extend(split.into_polygons());
        did_split
    }

    /// Split many independent polygons in parallel
    pub fn split_batch(polygons: &[Polygon]) -> Vec<Split> {
        #[cfg(feature = "profiling")]
        profiling::scope!("splitter::split_batch");

        polygons
            .par_iter()
            .map(|contours| Self::split_contours(contours))
            .collect()
    }

    /// Split a single contour into rings that do not cross the antimeridian
    pub fn split_contour(contour: &[Location]) -> ContourSplit {
        let ring: Vec<Location> = contour
            .iter()
            .map(Location::with_normalized_longitude)
            .collect();

        let (crossings, min_latitude, max_latitude) = find_crossings(&ring);
        if crossings.is_empty() {
            let winding = winding::winding(&ring);
            return ContourSplit {
                pieces: vec![ring],
                crossings: 0,
                pole: Pole::None,
                pole_piece: None,
                winding,
            };
        }

        let pole = if crossings.len() % 2 == 1 {
            Pole::from_latitude_range(min_latitude, max_latitude)
        } else {
            Pole::None
        };
        let winding = Winding::from_signed_area(winding::capped_signed_area(&ring, pole));
        let polar = polar_crossing(&crossings, pole, winding);

        let trace = SeamTrace::build(&ring, &crossings, polar.map(|index| (index, pole)));
        let (pieces, pole_piece) = trace.into_pieces();

        tracing::debug!(
            "Contour with {} points crossed the antimeridian {} times ({:?}), {} pieces",
            contour.len(),
            crossings.len(),
            pole,
            pieces.len()
        );

        ContourSplit {
            pieces,
            crossings: crossings.len(),
            pole,
            pole_piece,
            winding,
        }
    }
}

/// Check every contour has at least 3 finite points
pub fn validate_contours(contours: &[Contour]) -> Result<()> {
    for (index, contour) in contours.iter().enumerate() {
        if contour.len() < 3 {
            return Err(GeometryError::InvalidContour {
                index,
                reason: format!("expected at least 3 points, found {}", contour.len()),
            });
        }
        if let Some(point) = contour.iter().position(|location| !location.is_finite()) {
            return Err(GeometryError::InvalidContour {
                index,
                reason: format!("non-finite coordinate at point {point}"),
            });
        }
    }
    Ok(())
}

/// A contour tracing the border of the full latitude/longitude sector.
///
/// Such a ring runs along the seam and over the poles, which the crossing
/// test would otherwise misread once its border is subdivided.
pub fn is_full_sphere(contour: &[Location]) -> bool {
    if contour.len() < 4 {
        return false;
    }

    let on_border = |location: &Location| {
        location.latitude.abs() == NORTH_POLE_LATITUDE
            || location.longitude.abs() == ANTIMERIDIAN_LONGITUDE
    };

    contour.iter().all(on_border)
        && contour.iter().any(|l| l.latitude == NORTH_POLE_LATITUDE)
        && contour.iter().any(|l| l.latitude == SOUTH_POLE_LATITUDE)
        && contour.iter().any(|l| l.longitude == ANTIMERIDIAN_LONGITUDE)
        && contour.iter().any(|l| l.longitude == -ANTIMERIDIAN_LONGITUDE)
}

/// Walk the ring's edges (including the closing one) and record crossings,
/// along with the ring's latitude extent.
fn find_crossings(ring: &[Location]) -> (SmallVec<[EdgeCrossing; 4]>, f64, f64) {
    let mut crossings = SmallVec::new();
    let mut min_latitude = f64::INFINITY;
    let mut max_latitude = f64::NEG_INFINITY;

    for (vertex, &current) in ring.iter().enumerate() {
        min_latitude = min_latitude.min(current.latitude);
        max_latitude = max_latitude.max(current.latitude);

        let next = ring[(vertex + 1) % ring.len()];
        if !edge_crosses_antimeridian(current, next) {
            continue;
        }

        let latitude = meridian_intersection(current, next, ANTIMERIDIAN_LONGITUDE)
            .unwrap_or((current.latitude + next.latitude) / 2.0);
        crossings.push(EdgeCrossing {
            vertex,
            latitude,
            exit_longitude: ANTIMERIDIAN_LONGITUDE.copysign(current.longitude),
        });
    }

    (crossings, min_latitude, max_latitude)
}

/// Pick the crossing to close along the pole.
///
/// The winding fixes the direction the ring travels around the pole, hence
/// the seam side it leaves through; among crossings in that direction the
/// one closest to the pole is used.
fn polar_crossing(crossings: &[EdgeCrossing], pole: Pole, winding: Option<Winding>) -> Option<usize> {
    let exit_longitude = match (pole, winding) {
        (Pole::None, _) => return None,
        (Pole::North, Some(Winding::CounterClockwise))
        | (Pole::South, Some(Winding::Clockwise)) => Some(ANTIMERIDIAN_LONGITUDE),
        (Pole::North, Some(Winding::Clockwise)) | (Pole::South, Some(Winding::CounterClockwise)) => {
            Some(-ANTIMERIDIAN_LONGITUDE)
        }
        (_, None) => None,
    };

    closest_to_pole(crossings, pole, |crossing| {
        exit_longitude.is_none_or(|lon| crossing.exit_longitude == lon)
    })
    .or_else(|| closest_to_pole(crossings, pole, |_| true))
}

fn closest_to_pole(
    crossings: &[EdgeCrossing],
    pole: Pole,
    matching: impl Fn(&EdgeCrossing) -> bool,
) -> Option<usize> {
    let candidates = crossings
        .iter()
        .enumerate()
        .filter(|&(_, crossing)| matching(crossing));
    let by_latitude = |(_, a): &(usize, &EdgeCrossing), (_, b): &(usize, &EdgeCrossing)| {
        a.latitude.total_cmp(&b.latitude)
    };
    let closest = match pole {
        Pole::South => candidates.min_by(by_latitude),
        _ => candidates.max_by(by_latitude),
    };
    closest.map(|(index, _)| index)
}

/// Ring points with seam points (and the polar cap) spliced in, ready to be
/// re-traced into pieces.
struct SeamTrace {
    points: Vec<Location>,
    seams: Vec<Option<SeamPoint>>,
    /// Index of the first cap point, if a pole was closed
    cap: Option<usize>,
}

impl SeamTrace {
    fn build(
        ring: &[Location],
        crossings: &[EdgeCrossing],
        polar: Option<(usize, Pole)>,
    ) -> Self {
        let capacity = ring.len() + 2 * crossings.len() + 2;
        let mut points = Vec::with_capacity(capacity);
        let mut seams = Vec::with_capacity(capacity);
        let mut seam_crossings: SmallVec<[SeamCrossing; 4]> = SmallVec::new();
        let mut cap = None;
        let mut pending = crossings.iter().enumerate().peekable();

        for (vertex, &location) in ring.iter().enumerate() {
            points.push(location);
            seams.push(None);

            let Some((index, crossing)) = pending.next_if(|(_, c)| c.vertex == vertex) else {
                continue;
            };

            let exit = points.len();
            points.push(Location::new(crossing.latitude, crossing.exit_longitude));

            match polar {
                Some((polar_index, pole)) if polar_index == index => {
                    // Close along the pole instead of jumping across the seam
                    let pole_latitude = pole.latitude().unwrap_or(NORTH_POLE_LATITUDE);
                    seams.push(None);
                    cap = Some(points.len());
                    points.push(Location::new(pole_latitude, crossing.exit_longitude));
                    points.push(Location::new(pole_latitude, -crossing.exit_longitude));
                    seams.push(None);
                    seams.push(None);
                    points.push(Location::new(crossing.latitude, -crossing.exit_longitude));
                    seams.push(None);
                }
                _ => {
                    points.push(Location::new(crossing.latitude, -crossing.exit_longitude));
                    seams.push(Some(SeamPoint {
                        role: SeamRole::Exit,
                        link: None,
                        visited: false,
                    }));
                    seams.push(Some(SeamPoint {
                        role: SeamRole::Entry,
                        link: None,
                        visited: false,
                    }));
                    seam_crossings.push(SeamCrossing {
                        exit,
                        entry: exit + 1,
                        latitude: crossing.latitude,
                    });
                }
            }
        }

        // Consecutive crossings along the seam bound a stretch of the
        // interior; each exit continues at the entry on its own side.
        seam_crossings.sort_by(|a, b| b.latitude.total_cmp(&a.latitude));
        for pair in seam_crossings.chunks_exact(2) {
            let (upper, lower) = (pair[0], pair[1]);
            if let Some(seam) = &mut seams[upper.exit] {
                seam.link = Some(lower.entry);
            }
            if let Some(seam) = &mut seams[lower.exit] {
                seam.link = Some(upper.entry);
            }
        }

        Self { points, seams, cap }
    }

    /// Trace one piece per unvisited entry point. Returns the pieces and the
    /// index of the piece holding the polar cap.
    fn into_pieces(mut self) -> (Vec<Contour>, Option<usize>) {
        let len = self.points.len();
        let has_entries = self
            .seams
            .iter()
            .any(|seam| matches!(seam, Some(s) if s.role == SeamRole::Entry));

        if !has_entries {
            // Only the polar crossing: the capped ring is the single piece
            let pole_piece = self.cap.map(|_| 0);
            return (vec![self.points], pole_piece);
        }

        let mut pieces = Vec::new();
        let mut pole_piece = None;

        for start in 0..len {
            match self.seams[start] {
                Some(SeamPoint {
                    role: SeamRole::Entry,
                    visited: false,
                    ..
                }) => {}
                _ => continue,
            }

            let mut piece = Vec::new();
            let mut holds_cap = false;
            let mut index = start;
            let mut closed = false;

            for _ in 0..len {
                if let Some(seam) = &mut self.seams[index] {
                    if seam.visited {
                        break;
                    }
                    seam.visited = true;
                }
                piece.push(self.points[index]);
                holds_cap |= self.cap == Some(index);

                index = match self.seams[index] {
                    Some(SeamPoint {
                        role: SeamRole::Exit,
                        link: Some(link),
                        ..
                    }) => link,
                    _ => (index + 1) % len,
                };
                if index == start {
                    closed = true;
                    break;
                }
            }

            if !closed {
                tracing::warn!(
                    "Traced ring did not close after {} points; contour is likely malformed",
                    piece.len()
                );
            }
            if piece.is_empty() {
                continue;
            }
            if holds_cap {
                pole_piece = Some(pieces.len());
            }
            pieces.push(piece);
        }

        (pieces, pole_piece)
    }
}

/// Index of the outline containing a hole piece
fn containing_outline(outlines: &[geo::Polygon<f64>], piece: &[Location]) -> usize {
    if outlines.len() < 2 {
        return 0;
    }

    let found = utils::contour_to_polygon(piece)
        .interior_point()
        .and_then(|point| outlines.iter().position(|outline| outline.contains(&point)));

    found.unwrap_or_else(|| {
        tracing::warn!(
            "Hole piece with {} points lies in no outer piece; attaching to the first",
            piece.len()
        );
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn loc(latitude: f64, longitude: f64) -> Location {
        Location::new(latitude, longitude)
    }

    fn contour(points: &[(f64, f64)]) -> Contour {
        points.iter().map(|&(lat, lon)| loc(lat, lon)).collect()
    }

    fn total_area(polygons: &[Polygon]) -> f64 {
        polygons
            .iter()
            .filter_map(|polygon| utils::polygon_to_geo(polygon))
            .map(|polygon| polygon.unsigned_area())
            .sum()
    }

    fn dateline_square() -> Contour {
        contour(&[(-10.0, 170.0), (10.0, 170.0), (10.0, -170.0), (-10.0, -170.0)])
    }

    /// An "E" whose spine sits west of the dateline and whose two prongs
    /// reach across it, so the outline crosses four times.
    fn comb() -> Contour {
        contour(&[
            (0.0, 170.0),
            (0.0, -170.0),
            (10.0, -170.0),
            (10.0, 175.0),
            (20.0, 175.0),
            (20.0, -170.0),
            (30.0, -170.0),
            (30.0, 170.0),
        ])
    }

    #[test]
    fn test_no_crossing_is_unsplit() {
        let input = vec![contour(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])];
        let split = PolygonSplitter::split_contours(&input);

        assert!(!split.is_split());
        assert_eq!(split, Split::Unsplit(input.clone()));
        assert_eq!(split.polygons(), &[input]);
    }

    #[test]
    fn test_split_square_crossing_dateline() {
        let split = PolygonSplitter::split_contours(&[dateline_square()]);
        assert!(split.is_split());

        let polygons = split.into_polygons();
        assert_eq!(polygons.len(), 2);
        assert_eq!(
            polygons[0],
            vec![contour(&[
                (10.0, -180.0),
                (10.0, -170.0),
                (-10.0, -170.0),
                (-10.0, -180.0)
            ])]
        );
        assert_eq!(
            polygons[1],
            vec![contour(&[
                (-10.0, 180.0),
                (-10.0, 170.0),
                (10.0, 170.0),
                (10.0, 180.0)
            ])]
        );
        assert!((total_area(&polygons) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_unwrapped_input_matches_wrapped() {
        let unwrapped = contour(&[(-10.0, 170.0), (10.0, 170.0), (10.0, 190.0), (-10.0, 190.0)]);
        assert_eq!(
            PolygonSplitter::split_contours(&[unwrapped]),
            PolygonSplitter::split_contours(&[dateline_square()])
        );
    }

    #[test]
    fn test_split_comb_crossing_four_times() {
        let result = PolygonSplitter::split_contour(&comb());
        assert_eq!(result.crossings, 4);
        assert_eq!(result.pole, Pole::None);
        assert_eq!(result.pole_piece, None);
        assert_eq!(
            result.pieces,
            vec![
                contour(&[(0.0, -180.0), (0.0, -170.0), (10.0, -170.0), (10.0, -180.0)]),
                contour(&[
                    (10.0, 180.0),
                    (10.0, 175.0),
                    (20.0, 175.0),
                    (20.0, 180.0),
                    (30.0, 180.0),
                    (30.0, 170.0),
                    (0.0, 170.0),
                    (0.0, 180.0),
                ]),
                contour(&[(20.0, -180.0), (20.0, -170.0), (30.0, -170.0), (30.0, -180.0)]),
            ]
        );

        let polygons: Vec<Polygon> = result.pieces.into_iter().map(|piece| vec![piece]).collect();
        // 20x30 outline minus the 15x10 notch between the prongs
        assert!((total_area(&polygons) - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_crossing_dateline_is_split_and_distributed() {
        let outer = contour(&[(-20.0, 160.0), (20.0, 160.0), (20.0, -160.0), (-20.0, -160.0)]);
        let hole = contour(&[(-5.0, 175.0), (5.0, 175.0), (5.0, -175.0), (-5.0, -175.0)]);
        let split = PolygonSplitter::split_contours(&[outer, hole]);

        assert_eq!(
            split,
            Split::Split(vec![
                vec![
                    contour(&[(20.0, -180.0), (20.0, -160.0), (-20.0, -160.0), (-20.0, -180.0)]),
                    contour(&[(5.0, -180.0), (5.0, -175.0), (-5.0, -175.0), (-5.0, -180.0)]),
                ],
                vec![
                    contour(&[(-20.0, 180.0), (-20.0, 160.0), (20.0, 160.0), (20.0, 180.0)]),
                    contour(&[(-5.0, 180.0), (-5.0, 175.0), (5.0, 175.0), (5.0, 180.0)]),
                ],
            ])
        );
        // 40x40 outline minus the 10x10 hole
        assert!((total_area(split.polygons()) - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_not_crossing_stays_on_its_side() {
        let outer = contour(&[(-20.0, 160.0), (20.0, 160.0), (20.0, -160.0), (-20.0, -160.0)]);
        let hole = contour(&[(-5.0, 165.0), (5.0, 165.0), (5.0, 170.0), (-5.0, 170.0)]);
        let split = PolygonSplitter::split_contours(&[outer, hole.clone()]);

        assert!(split.is_split());
        let polygons = split.into_polygons();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 1);
        assert_eq!(polygons[1].len(), 2);
        assert_eq!(polygons[1][1], hole);
    }

    #[test]
    fn test_full_sphere_passes_through() {
        let sector = vec![contour(&[
            (-90.0, -180.0),
            (90.0, -180.0),
            (90.0, 180.0),
            (-90.0, 180.0),
        ])];
        let split = PolygonSplitter::split_contours(&sector);
        assert!(!split.is_split());
        assert_eq!(split, Split::FullSphere(sector));
    }

    #[test]
    fn test_subdivided_full_sphere_is_not_split() {
        // The top edge alone would read as a crossing (-100 -> 100)
        let sector = vec![contour(&[
            (-90.0, -180.0),
            (0.0, -180.0),
            (90.0, -180.0),
            (90.0, -100.0),
            (90.0, 100.0),
            (90.0, 180.0),
            (0.0, 180.0),
            (-90.0, 180.0),
        ])];
        assert!(edge_crosses_antimeridian(loc(90.0, -100.0), loc(90.0, 100.0)));

        let split = PolygonSplitter::split_contours(&sector);
        assert_eq!(split, Split::FullSphere(sector));
    }

    #[test]
    fn test_north_pole_ring_is_capped() {
        let ring = contour(&[(70.0, -120.0), (70.0, 0.0), (70.0, 120.0)]);
        let result = PolygonSplitter::split_contour(&ring);

        assert_eq!(result.crossings, 1);
        assert_eq!(result.pole, Pole::North);
        assert_eq!(result.winding, Some(Winding::CounterClockwise));
        assert_eq!(result.pole_piece, Some(0));
        assert_eq!(
            result.pieces,
            vec![contour(&[
                (70.0, -120.0),
                (70.0, 0.0),
                (70.0, 120.0),
                (70.0, 180.0),
                (90.0, 180.0),
                (90.0, -180.0),
                (70.0, -180.0),
            ])]
        );
    }

    #[test]
    fn test_westward_pole_ring_caps_in_reverse() {
        let ring = contour(&[(70.0, 120.0), (70.0, 0.0), (70.0, -120.0)]);
        let result = PolygonSplitter::split_contour(&ring);

        assert_eq!(result.pole, Pole::North);
        assert_eq!(result.winding, Some(Winding::Clockwise));
        assert_eq!(
            result.pieces[0][3..],
            contour(&[(70.0, -180.0), (90.0, -180.0), (90.0, 180.0), (70.0, 180.0)])[..]
        );
    }

    #[test]
    fn test_south_pole_ring_has_cap_at_both_seam_sides() {
        let input = vec![contour(&[(-60.0, -120.0), (-60.0, 0.0), (-60.0, 120.0)])];
        let split = PolygonSplitter::split_contours(&input);
        assert!(split.is_split());

        let polygons = split.into_polygons();
        assert_eq!(polygons.len(), 1);
        let outline = &polygons[0][0];
        assert!(outline.contains(&loc(-90.0, 180.0)));
        assert!(outline.contains(&loc(-90.0, -180.0)));
        assert_eq!(
            outline[3..],
            contour(&[(-60.0, 180.0), (-90.0, 180.0), (-90.0, -180.0), (-60.0, -180.0)])[..]
        );
        // The 30 degree band down to the pole
        assert!((total_area(&polygons) - 360.0 * 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_pole_ring_with_extra_crossings() {
        // Ring around the north pole with a lobe dipping south across the
        // dateline: three crossings, the highest eastward one is capped.
        let ring = contour(&[
            (60.0, -120.0),
            (60.0, 0.0),
            (60.0, 150.0),
            (10.0, 150.0),
            (10.0, -170.0),
            (30.0, -170.0),
            (30.0, 170.0),
            (60.0, -170.0),
        ]);
        let result = PolygonSplitter::split_contour(&ring);

        assert_eq!(result.crossings, 3);
        assert_eq!(result.pole, Pole::North);
        assert_eq!(result.pole_piece, Some(1));
        assert_eq!(
            result.pieces,
            vec![
                contour(&[(10.0, -180.0), (10.0, -170.0), (30.0, -170.0), (30.0, -180.0)]),
                contour(&[
                    (30.0, 180.0),
                    (30.0, 170.0),
                    (45.0, 180.0),
                    (90.0, 180.0),
                    (90.0, -180.0),
                    (45.0, -180.0),
                    (60.0, -170.0),
                    (60.0, -120.0),
                    (60.0, 0.0),
                    (60.0, 150.0),
                    (10.0, 150.0),
                    (10.0, 180.0),
                ]),
            ]
        );
    }

    #[test]
    fn test_split_output_is_idempotent() {
        let inputs = vec![
            vec![dateline_square()],
            vec![comb()],
            vec![contour(&[(70.0, -120.0), (70.0, 0.0), (70.0, 120.0)])],
            vec![contour(&[(-60.0, -120.0), (-60.0, 0.0), (-60.0, 120.0)])],
        ];

        for input in inputs {
            for polygon in PolygonSplitter::split_contours(&input).into_polygons() {
                let again = PolygonSplitter::split_contours(&polygon);
                assert!(!again.is_split(), "re-split {polygon:?}");
                assert_eq!(again, Split::Unsplit(polygon));
            }
        }
    }

    #[test]
    fn test_split_contours_into_appends() {
        let mut output = vec![vec![dateline_square()]];

        assert!(PolygonSplitter::split_contours_into(&[dateline_square()], &mut output));
        assert_eq!(output.len(), 3);
        assert_eq!(output[0], vec![dateline_square()]);

        let plain = vec![contour(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)])];
        assert!(!PolygonSplitter::split_contours_into(&plain, &mut output));
        assert_eq!(output.len(), 4);
        assert_eq!(output[3], plain);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = vec![dateline_square()];
        let before = input.clone();
        let _ = PolygonSplitter::split_contours(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_try_split_rejects_malformed_contours() {
        let short = vec![contour(&[(0.0, 0.0), (0.0, 10.0)])];
        match PolygonSplitter::try_split_contours(&short) {
            Err(GeometryError::InvalidContour { index, .. }) => assert_eq!(index, 0),
            other => panic!("unexpected result: {other:?}"),
        }

        let nan = vec![
            dateline_square(),
            contour(&[(0.0, 0.0), (f64::NAN, 10.0), (10.0, 10.0)]),
        ];
        match PolygonSplitter::try_split_contours(&nan) {
            Err(GeometryError::InvalidContour { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("point 1"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(PolygonSplitter::try_split_contours(&[dateline_square()]).is_ok());
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        let inputs = vec![
            vec![],
            vec![vec![]],
            vec![contour(&[(0.0, 170.0)])],
            vec![contour(&[(0.0, 170.0), (0.0, -170.0)])],
            vec![contour(&[(0.0, 170.0), (f64::NAN, -170.0), (5.0, 175.0)])],
        ];
        for input in inputs {
            let _ = PolygonSplitter::split_contours(&input);
        }
    }

    #[test]
    fn test_wide_edge_is_treated_as_crossing() {
        // A triangle whose first edge spans 200 degrees without wrapping is
        // still read as crossing the dateline.
        let triangle = contour(&[(0.0, -100.0), (0.0, 100.0), (10.0, 0.0)]);
        let result = PolygonSplitter::split_contour(&triangle);
        assert_eq!(result.crossings, 1);
        assert!(result.is_split());
    }

    #[test]
    fn test_split_batch_matches_sequential() {
        let polygons = vec![
            vec![dateline_square()],
            vec![comb()],
            vec![contour(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)])],
        ];
        let batch = PolygonSplitter::split_batch(&polygons);
        let sequential: Vec<Split> = polygons
            .iter()
            .map(|polygon| PolygonSplitter::split_contours(polygon))
            .collect();
        assert_eq!(batch, sequential);
    }
}
