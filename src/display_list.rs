//! A [`Surface`] that records primitives instead of rasterizing them.
//!
//! Useful for exporting a chart to another backend and for inspecting what an overlay drew.

use itertools::Itertools;
use nalgebra::Point2;

use crate::map::{Color, Surface};

/// Axis-aligned clip rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipRect {
    /// Top left corner.
    pub min: Point2<f64>,
    /// Bottom right corner.
    pub max: Point2<f64>,
}

impl ClipRect {
    /// Rectangle spanning the given corners.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            min: Point2::new(x_min, y_min),
            max: Point2::new(x_max, y_max),
        }
    }

    /// The rectangle covering the whole plane.
    pub fn unbounded() -> Self {
        Self::new(
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::INFINITY,
        )
    }

    /// Overlap of both rectangles. An empty overlap has `min > max` on some axis.
    pub fn intersection(&self, other: &Self) -> Self {
        Self::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        )
    }

    /// Whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Whether `p` lies inside or on the border.
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }
}

impl Default for ClipRect {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Shape of a recorded primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A single segment.
    Line(Point2<f64>, Point2<f64>),
    /// An open polyline.
    Polyline(Vec<Point2<f64>>),
    /// A filled, implicitly closed polygon.
    Polygon(Vec<Point2<f64>>),
}

/// A recorded primitive with the color and clip active when it was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// What was drawn.
    pub shape: Shape,
    /// Active color.
    pub color: Color,
    /// Active clip.
    pub clip: ClipRect,
}

/// Records everything drawn on it.
#[derive(Clone, Debug)]
pub struct DisplayList {
    primitives: Vec<Primitive>,
    color: Color,
    clip: ClipRect,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    /// An empty list with an unbounded clip.
    pub fn new() -> Self {
        Self::with_clip(ClipRect::unbounded())
    }

    /// An empty list with the given clip.
    pub fn with_clip(clip: ClipRect) -> Self {
        Self {
            primitives: Vec::new(),
            color: Color::WHITE,
            clip,
        }
    }

    /// The primitives in drawing order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Number of recorded primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Forget every recorded primitive. Color and clip stay.
    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    /// Primitives drawn in `color`.
    pub fn in_color(&self, color: Color) -> Vec<&Primitive> {
        self.primitives.iter().filter(|p| p.color == color).collect_vec()
    }

    fn push(&mut self, shape: Shape) {
        self.primitives.push(Primitive {
            shape,
            color: self.color,
            clip: self.clip,
        });
    }
}

impl Surface for DisplayList {
    type Clip = ClipRect;

    fn clip(&self) -> ClipRect {
        self.clip
    }

    fn set_clip(&mut self, clip: ClipRect) {
        self.clip = clip;
    }

    fn intersect_clip(&mut self, clip: &ClipRect) {
        self.clip = self.clip.intersection(clip);
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>) {
        self.push(Shape::Line(from, to));
    }

    fn draw_polyline(&mut self, points: &[Point2<f64>]) {
        self.push(Shape::Polyline(points.to_vec()));
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>]) {
        self.push(Shape::Polygon(points.to_vec()));
    }
}
