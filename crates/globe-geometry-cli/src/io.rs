//! JSON documents read and written by the command line tool
//!
//! Locations travel as `[latitude, longitude]` pairs so that documents stay
//! compact and match the usual GeoJSON-like nesting of rings and polygons.

use globe_geometry_lib::{Bounds, Contour, GeometryError, Location, Polygon, Split};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// Error types for the command line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// `[latitude, longitude]`
pub type LocationPair = [f64; 2];

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SplitInput {
    pub contours: Vec<Vec<LocationPair>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SplitOutput {
    pub split: bool,
    pub full_sphere: bool,
    pub polygons: Vec<Vec<Vec<LocationPair>>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HitTestInput {
    pub bounds: Bounds,
    pub objects: Vec<HitTestObject>,
}

/// A screen rectangle with an opaque identifier (any JSON value)
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HitTestObject {
    #[serde(flatten)]
    pub bounds: Bounds,
    pub id: serde_json::Value,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HitTestOutput {
    pub ids: Vec<serde_json::Value>,
}

impl SplitInput {
    pub fn to_contours(&self) -> Vec<Contour> {
        self.contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|&[latitude, longitude]| Location::new(latitude, longitude))
                    .collect()
            })
            .collect()
    }
}

impl From<&Split> for SplitOutput {
    fn from(split: &Split) -> Self {
        Self {
            split: split.is_split(),
            full_sphere: matches!(split, Split::FullSphere(_)),
            polygons: split.polygons().iter().map(polygon_to_pairs).collect(),
        }
    }
}

fn polygon_to_pairs(polygon: &Polygon) -> Vec<Vec<LocationPair>> {
    polygon
        .iter()
        .map(|contour| {
            contour
                .iter()
                .map(|location| [location.latitude, location.longitude])
                .collect()
        })
        .collect()
}

/// Read a whole document from a file, or from stdin when `path` is `-`
pub fn read_document(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Serialize `value` as one JSON document followed by a newline
pub fn write_document<T: Serialize>(mut writer: impl Write, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}
