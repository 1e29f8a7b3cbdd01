//! Quadtree spatial index for screen-space bounding boxes
//!
//! Objects are axis-aligned rectangles (`x`, `y`, `width`, `height`, with `y`
//! growing downwards as on screen) carrying an arbitrary payload. A node keeps
//! objects locally until it holds more than `max_objects`, then splits into
//! four equal quadrants and pushes down every object that fits entirely inside
//! one of them. Objects straddling a midpoint stay with the parent.
//!
//! Queries return candidates: everything stored along the path to the queried
//! region. Callers needing exact hits filter with
//! [`QuadTree::retrieve_overlapping`].

use crate::{GeometryError, Result};
use geo::{Coord, Intersects, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in a screen-like coordinate system
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Quadtree tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadTreeConfig {
    /// Objects a node holds before it considers splitting
    pub max_objects: usize,
    /// Depth at which nodes stop splitting (the root is level 0)
    pub max_levels: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            max_levels: 4,
        }
    }
}

/// An inserted rectangle and its payload
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadTreeItem<T> {
    pub bounds: Bounds,
    pub data: T,
}

/// Quadrant of a node, numbered as the classic screen-space quadtree does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    TopRight = 0,
    TopLeft = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

/// Root container of the quadtree
#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    root: QuadTreeNode<T>,
    config: QuadTreeConfig,
    len: usize,
}

#[derive(Clone, Debug)]
struct QuadTreeNode<T> {
    bounds: Bounds,
    /// Depth level in the tree (0 = root)
    level: u32,
    contents: NodeContents<T>,
}

#[derive(Clone, Debug)]
enum NodeContents<T> {
    Leaf {
        objects: Vec<QuadTreeItem<T>>,
    },
    Internal {
        /// Children in [`Quadrant`] order
        children: Box<[QuadTreeNode<T>; 4]>,
        /// Objects straddling a midpoint of this node
        objects: Vec<QuadTreeItem<T>>,
    },
}

impl Bounds {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// All fields finite and the size non-negative
    pub fn validate(self) -> Result<Self> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite());
        if !finite {
            return Err(GeometryError::InvalidBounds(format!(
                "non-finite field in {self:?}"
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(GeometryError::InvalidBounds(format!(
                "negative size in {self:?}"
            )));
        }
        Ok(self)
    }

    /// Whether the point lies inside or on the edge
    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Whether the two rectangles share any point (touching edges count)
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        Rect::from(*self).intersects(&Rect::from(*other))
    }

    #[inline]
    fn vertical_midpoint(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    fn horizontal_midpoint(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

impl From<Bounds> for Rect<f64> {
    fn from(bounds: Bounds) -> Self {
        Rect::new(
            Coord {
                x: bounds.x,
                y: bounds.y,
            },
            Coord {
                x: bounds.x + bounds.width,
                y: bounds.y + bounds.height,
            },
        )
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Bounds::new(rect.min().x, rect.min().y, rect.width(), rect.height())
    }
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopRight,
        Quadrant::TopLeft,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The single quadrant of `node` that strictly contains `rect`, if any.
    ///
    /// Rectangles touching or crossing a midpoint belong to no quadrant.
    pub fn of(node: &Bounds, rect: &Bounds) -> Option<Self> {
        let vertical_midpoint = node.vertical_midpoint();
        let horizontal_midpoint = node.horizontal_midpoint();

        let top = rect.y < horizontal_midpoint && rect.y + rect.height < horizontal_midpoint;
        let bottom = rect.y > horizontal_midpoint;

        if rect.x < vertical_midpoint && rect.x + rect.width < vertical_midpoint {
            if top {
                return Some(Quadrant::TopLeft);
            } else if bottom {
                return Some(Quadrant::BottomLeft);
            }
        } else if rect.x > vertical_midpoint {
            if top {
                return Some(Quadrant::TopRight);
            } else if bottom {
                return Some(Quadrant::BottomRight);
            }
        }
        None
    }

    /// Bounds of this quadrant within `node`
    pub fn bounds_within(self, node: &Bounds) -> Bounds {
        let half_width = node.width / 2.0;
        let half_height = node.height / 2.0;
        let (x, y) = match self {
            Quadrant::TopRight => (node.x + half_width, node.y),
            Quadrant::TopLeft => (node.x, node.y),
            Quadrant::BottomLeft => (node.x, node.y + half_height),
            Quadrant::BottomRight => (node.x + half_width, node.y + half_height),
        };
        Bounds::new(x, y, half_width, half_height)
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<T> QuadTree<T> {
    /// Create an empty quadtree with the default limits (10 objects, 4 levels)
    pub fn new(bounds: Bounds) -> Result<Self> {
        Self::with_config(bounds, QuadTreeConfig::default())
    }

    /// Create an empty quadtree with explicit limits
    pub fn with_config(bounds: Bounds, config: QuadTreeConfig) -> Result<Self> {
        Ok(Self {
            root: QuadTreeNode::new(bounds.validate()?, 0),
            config,
            len: 0,
        })
    }

    /// Insert a rectangle with its payload
    pub fn insert(&mut self, bounds: Bounds, data: T) -> Result<()> {
        let bounds = bounds.validate()?;
        self.root.insert(QuadTreeItem { bounds, data }, &self.config);
        self.len += 1;
        Ok(())
    }

    /// Candidate objects for a region: everything stored on the path to it.
    ///
    /// Never misses an object overlapping `bounds`, but may include objects
    /// that do not.
    pub fn retrieve(&self, bounds: &Bounds) -> Vec<&QuadTreeItem<T>> {
        let mut results = Vec::new();
        self.root.retrieve(bounds, &mut results);
        results
    }

    /// Objects actually overlapping `bounds`
    pub fn retrieve_overlapping(&self, bounds: &Bounds) -> Vec<&QuadTreeItem<T>> {
        let mut results = self.retrieve(bounds);
        results.retain(|item| item.bounds.overlaps(bounds));
        results
    }

    /// Objects containing the point `(x, y)`
    pub fn hit_test(&self, x: f64, y: f64) -> Vec<&QuadTreeItem<T>> {
        let mut results = self.retrieve(&Bounds::new(x, y, 0.0, 0.0));
        results.retain(|item| item.bounds.contains_point(x, y));
        results
    }

    /// Remove every object and discard all child nodes
    pub fn clear(&mut self) {
        self.root = QuadTreeNode::new(self.root.bounds, 0);
        self.len = 0;
    }

    /// Number of inserted objects
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the root has been split into quadrants
    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.root.contents, NodeContents::Internal { .. })
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.root.bounds
    }

    #[inline]
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }
}

impl<T> QuadTreeNode<T> {
    fn new(bounds: Bounds, level: u32) -> Self {
        Self {
            bounds,
            level,
            contents: NodeContents::Leaf {
                objects: Vec::new(),
            },
        }
    }

    fn objects(&self) -> &[QuadTreeItem<T>] {
        match &self.contents {
            NodeContents::Leaf { objects } | NodeContents::Internal { objects, .. } => objects,
        }
    }

    fn objects_mut(&mut self) -> &mut Vec<QuadTreeItem<T>> {
        match &mut self.contents {
            NodeContents::Leaf { objects } | NodeContents::Internal { objects, .. } => objects,
        }
    }

    fn insert(&mut self, item: QuadTreeItem<T>, config: &QuadTreeConfig) {
        if let NodeContents::Internal { children, .. } = &mut self.contents {
            if let Some(quadrant) = Quadrant::of(&self.bounds, &item.bounds) {
                children[quadrant.index()].insert(item, config);
                return;
            }
        }

        self.objects_mut().push(item);

        if self.objects().len() > config.max_objects && self.level < config.max_levels {
            self.subdivide();
            self.redistribute(config);
        }
    }

    /// Turn a leaf into an internal node with four empty children
    fn subdivide(&mut self) {
        let NodeContents::Leaf { objects } = &mut self.contents else {
            return; // Already subdivided
        };
        let objects = std::mem::take(objects);

        let bounds = self.bounds;
        let child_level = self.level + 1;
        let children = Quadrant::ALL
            .map(|quadrant| QuadTreeNode::new(quadrant.bounds_within(&bounds), child_level));

        tracing::trace!(
            "Subdividing quadtree node at level {} holding {} objects",
            self.level,
            objects.len()
        );
        self.contents = NodeContents::Internal {
            children: Box::new(children),
            objects,
        };
    }

    /// Push local objects down into the child fully containing them
    fn redistribute(&mut self, config: &QuadTreeConfig) {
        let NodeContents::Internal { children, objects } = &mut self.contents else {
            return;
        };

        let mut straddling = Vec::with_capacity(objects.len());
        for item in objects.drain(..) {
            match Quadrant::of(&self.bounds, &item.bounds) {
                Some(quadrant) => children[quadrant.index()].insert(item, config),
                None => straddling.push(item),
            }
        }
        *objects = straddling;
    }

    fn retrieve<'a>(&'a self, bounds: &Bounds, results: &mut Vec<&'a QuadTreeItem<T>>) {
        results.extend(self.objects());

        if let NodeContents::Internal { children, .. } = &self.contents {
            match Quadrant::of(&self.bounds, bounds) {
                Some(quadrant) => children[quadrant.index()].retrieve(bounds, results),
                None => {
                    for child in children.iter() {
                        child.retrieve(bounds, results);
                    }
                }
            }
        }
    }
}
