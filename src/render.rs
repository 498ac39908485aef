//! Drawing point streams as sky overlays.
//!
//! One [`Overlay`] walks a [`PointStream`], projects every point and turns the visible
//! ones into primitives on the surface. A point is visible when its angular distance
//! from the view center is below the overlay's limit. Three modes exist:
//!
//! - [`DrawMode::Polyline`]: one polyline per run of consecutive visible points. A run
//!   ends at an invisible point or a marker and never spans a marker.
//! - [`DrawMode::BrokenLine`]: one segment per pair of consecutive points of a section
//!   when at least one of the two is visible.
//! - [`DrawMode::FilledSection`]: one filled polygon per section. Each section starts
//!   with a center point; if the center is beyond the limit the whole section is skipped
//!   without projecting any of its points.
//!
//! Runs of a single point never produce a primitive, and polygons need three vertices.
//! The cancel token is polled before every step; a cancelled walk stops at once and
//! leaves whatever it already drew. The surface clip is restored on every path.

use itertools::Itertools;
use log::debug;
use nalgebra::Point2;

use crate::map::{CancelToken, ClipGuard, Color, MapParams, Projection, Projector, RenderMode, Surface};
use crate::stream::{Entry, PointStream, RaDec};

/// How an overlay turns points into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    /// Polylines through runs of visible points.
    Polyline,
    /// Segments between consecutive points with a visible end.
    BrokenLine,
    /// One filled polygon per section, rejected by its center point.
    FilledSection,
}

/// Visibility limit and colors of an overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Angular distance from the view center (radians) beyond which points are hidden.
    /// For [`DrawMode::FilledSection`] it applies to section centers.
    pub limit: f64,
    /// Color in [`RenderMode::Screen`].
    pub color: Color,
    /// Color in [`RenderMode::Print`].
    pub print_color: Color,
}

impl OverlayStyle {
    /// Style printing in black.
    pub fn new(limit: f64, color: Color) -> Self {
        Self {
            limit,
            color,
            print_color: Color::BLACK,
        }
    }

    /// Set the visibility limit.
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the color used in [`RenderMode::Print`].
    pub fn with_print_color(mut self, color: Color) -> Self {
        self.print_color = color;
        self
    }

    /// Color used in `mode`.
    pub fn color_for(&self, mode: RenderMode) -> Color {
        match mode {
            RenderMode::Screen => self.color,
            RenderMode::Print => self.print_color,
        }
    }
}

/// What a draw call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Primitives sent to the surface.
    pub primitives: usize,
    /// Calls to the projector.
    pub projected: usize,
    /// Sections rejected by their center point.
    pub skipped_sections: usize,
    /// Whether the draw was cancelled before it finished.
    pub cancelled: bool,
}

impl DrawStats {
    /// Add the counts of `other`.
    pub fn merge(&mut self, other: DrawStats) {
        self.primitives += other.primitives;
        self.projected += other.projected;
        self.skipped_sections += other.skipped_sections;
        self.cancelled |= other.cancelled;
    }
}

/// Union of the filled Milky Way polygons, collected for print clipping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleRegion {
    polygons: Vec<Vec<Point2<f64>>>,
}

impl VisibleRegion {
    /// Add a polygon to the region.
    pub fn add(&mut self, polygon: Vec<Point2<f64>>) {
        self.polygons.push(polygon);
    }

    /// The polygons of the region.
    pub fn polygons(&self) -> &[Vec<Point2<f64>>] {
        &self.polygons
    }

    /// Whether the region is empty.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether `p` lies inside any of the polygons (even-odd rule per polygon).
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.polygons.iter().any(|polygon| polygon_contains(polygon, p))
    }
}

fn polygon_contains(polygon: &[Point2<f64>], p: &Point2<f64>) -> bool {
    let mut inside = false;
    for (a, b) in polygon.iter().circular_tuple_windows() {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// A point stream drawn in one mode and style.
#[derive(Clone, Copy, Debug)]
pub struct Overlay<'a> {
    stream: &'a PointStream,
    mode: DrawMode,
    style: OverlayStyle,
}

impl<'a> Overlay<'a> {
    /// Overlay drawing `stream` in `mode` and `style`.
    pub fn new(stream: &'a PointStream, mode: DrawMode, style: OverlayStyle) -> Self {
        Self {
            stream,
            mode,
            style,
        }
    }

    /// How the overlay draws.
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Limit and colors of the overlay.
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Draw the overlay.
    ///
    /// In [`RenderMode::Print`], [`MapParams::visible_region`] is replaced by the union of
    /// the filled sections of this draw.
    pub fn draw<P: Projector, S: Surface>(&self, params: &mut MapParams<'_, P, S>) -> DrawStats {
        let mut guard = ClipGuard::new(&mut *params.surface, params.secondary_clip.as_ref());
        let surface = guard.surface();
        surface.set_color(self.style.color_for(params.mode));

        let mut walk = Walk {
            projector: params.projector,
            cancel: &params.cancel,
            stats: DrawStats::default(),
        };
        let limit = self.style.limit;
        match self.mode {
            DrawMode::Polyline => walk.polylines(self.stream, limit, surface),
            DrawMode::BrokenLine => walk.broken_lines(self.stream, limit, surface),
            DrawMode::FilledSection => {
                // Each print pass starts a new region.
                let region = match params.mode {
                    RenderMode::Print => Some(params.visible_region.insert(VisibleRegion::default())),
                    RenderMode::Screen => None,
                };
                walk.filled_sections(self.stream, limit, surface, region)
            }
        }

        let stats = walk.stats;
        debug!(
            "{:?} overlay: {} primitives from {} projections, {} sections skipped{}.",
            self.mode,
            stats.primitives,
            stats.projected,
            stats.skipped_sections,
            if stats.cancelled { ", cancelled" } else { "" }
        );
        stats
    }
}

struct Walk<'p, P> {
    projector: &'p P,
    cancel: &'p CancelToken,
    stats: DrawStats,
}

impl<P: Projector> Walk<'_, P> {
    fn project(&mut self, p: &RaDec) -> Projection {
        self.stats.projected += 1;
        self.projector.project(p.ra_radians(), p.dec_radians())
    }

    fn cancelled(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            self.stats.cancelled = true;
        }
        self.stats.cancelled
    }

    fn polylines<S: Surface>(&mut self, stream: &PointStream, limit: f64, surface: &mut S) {
        let mut run = Vec::new();
        for entry in stream.entries() {
            if self.cancelled() {
                return;
            }
            match entry {
                Entry::Point(p) => {
                    let projection = self.project(p);
                    if projection.distance < limit {
                        run.push(projection.point);
                    } else {
                        self.flush_run(&mut run, surface);
                    }
                }
                Entry::CenterPoint(_) => {}
                Entry::SectionEnd => self.flush_run(&mut run, surface),
                Entry::StreamEnd => {
                    self.flush_run(&mut run, surface);
                    break;
                }
            }
        }
    }

    fn flush_run<S: Surface>(&mut self, run: &mut Vec<Point2<f64>>, surface: &mut S) {
        if run.len() >= 2 {
            surface.draw_polyline(run);
            self.stats.primitives += 1;
        }
        run.clear();
    }

    fn broken_lines<S: Surface>(&mut self, stream: &PointStream, limit: f64, surface: &mut S) {
        let mut previous: Option<(Point2<f64>, bool)> = None;
        for entry in stream.entries() {
            if self.cancelled() {
                return;
            }
            match entry {
                Entry::Point(p) => {
                    let projection = self.project(p);
                    let visible = projection.distance < limit;
                    if let Some((from, was_visible)) = previous {
                        if was_visible || visible {
                            surface.draw_line(from, projection.point);
                            self.stats.primitives += 1;
                        }
                    }
                    previous = Some((projection.point, visible));
                }
                Entry::CenterPoint(_) => {}
                Entry::SectionEnd => previous = None,
                Entry::StreamEnd => break,
            }
        }
    }

    fn filled_sections<S: Surface>(
        &mut self,
        stream: &PointStream,
        limit: f64,
        surface: &mut S,
        mut region: Option<&mut VisibleRegion>,
    ) {
        for section in stream.sections() {
            if self.cancelled() {
                return;
            }

            let members = match section.split_first() {
                Some((Entry::CenterPoint(center), members)) => {
                    if self.project(center).distance > limit {
                        self.stats.skipped_sections += 1;
                        continue;
                    }
                    members
                }
                _ => section,
            };

            let mut polygon = Vec::with_capacity(members.len());
            for entry in members {
                if self.cancelled() {
                    return;
                }
                if let Entry::Point(p) = entry {
                    polygon.push(self.project(p).point);
                }
            }

            if polygon.len() >= 3 {
                surface.fill_polygon(&polygon);
                self.stats.primitives += 1;
                if let Some(region) = region.as_deref_mut() {
                    region.add(polygon);
                }
            }
        }
    }
}
