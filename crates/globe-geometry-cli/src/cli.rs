use clap::{Args, Parser, Subcommand};
use globe_geometry_lib::{Bounds, QuadTreeConfig};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Globe Geometry - Split polygons at the antimeridian and hit test screen rectangles
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split polygon contours so that no piece crosses the antimeridian
    Split(SplitArgs),
    /// Index screen rectangles in a quadtree and list those under a query region
    HitTest(HitTestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// JSON document `{"contours": [[[lat, lon], ...], ...]}` ("-" reads stdin)
    #[clap(short, long, value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Reject contours with fewer than 3 points or non-finite coordinates
    #[clap(long, default_value = "false")]
    pub validate: bool,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HitTestArgs {
    /// JSON document `{"bounds": {...}, "objects": [{"x", "y", "width", "height", "id"}]}` ("-" reads stdin)
    #[clap(short, long, value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Left edge of the query rectangle
    #[clap(long, allow_negative_numbers = true)]
    pub x: f64,

    /// Top edge of the query rectangle
    #[clap(long, allow_negative_numbers = true)]
    pub y: f64,

    /// Width of the query rectangle (0 queries a single point)
    #[clap(long, default_value = "0")]
    pub width: f64,

    /// Height of the query rectangle (0 queries a single point)
    #[clap(long, default_value = "0")]
    pub height: f64,

    /// Maximum objects per quadtree node before subdivision
    #[clap(long, default_value = "10")]
    pub max_objects: usize,

    /// Maximum quadtree depth
    #[clap(long, default_value = "4")]
    pub max_levels: u32,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

impl HitTestArgs {
    pub fn query(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn config(&self) -> QuadTreeConfig {
        QuadTreeConfig {
            max_objects: self.max_objects,
            max_levels: self.max_levels,
        }
    }
}
