//! The mapping parameters an overlay draws through.
//!
//! A chart supplies three collaborators: a [`Projector`] that maps sky positions to the
//! screen, a [`Surface`] that receives drawing primitives, and a [`CancelToken`] that is
//! polled while drawing. [`MapParams`] bundles them with the render mode and the optional
//! secondary clip region.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::Point2;

use crate::render::VisibleRegion;

/// A projected sky position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Screen coordinates.
    pub point: Point2<f64>,
    /// Angular distance from the view center, in radians.
    pub distance: f64,
}

impl Projection {
    /// Projection at screen point `(x, y)`.
    pub fn new(x: f64, y: f64, distance: f64) -> Self {
        Self {
            point: Point2::new(x, y),
            distance,
        }
    }
}

/// Maps right ascension and declination (both in radians) to the screen.
pub trait Projector {
    /// Project a sky position.
    fn project(&self, ra: f64, dec: f64) -> Projection;
}

impl<T> Projector for T
where
    T: Fn(f64, f64) -> Projection,
{
    fn project(&self, ra: f64, dec: f64) -> Projection {
        self(ra, dec)
    }
}

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Color from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Whether the chart is drawn for the screen or for a printer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Drawn on screen.
    #[default]
    Screen,
    /// Drawn for printing.
    Print,
}

/// A drawing surface.
pub trait Surface {
    /// Clip region representation.
    type Clip: Clone;

    /// The active clip region.
    fn clip(&self) -> Self::Clip;

    /// Replace the active clip region.
    fn set_clip(&mut self, clip: Self::Clip);

    /// Narrow the active clip region to its intersection with `clip`.
    fn intersect_clip(&mut self, clip: &Self::Clip);

    /// Color of everything drawn next.
    fn set_color(&mut self, color: Color);

    /// Draw a segment.
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>);

    /// Draw an open polyline.
    fn draw_polyline(&mut self, points: &[Point2<f64>]);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point2<f64>]);
}

/// Shared "still drawing" signal.
///
/// Clones share the flag, so a UI thread can cancel a redraw running elsewhere.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every drawing holding this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether [`cancel()`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clear the flag before the next redraw.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}

/// Everything an overlay needs in order to draw.
pub struct MapParams<'a, P: Projector, S: Surface> {
    /// Maps sky positions to the screen.
    pub projector: &'a P,
    /// Receives the primitives.
    pub surface: &'a mut S,
    /// Polled while drawing.
    pub cancel: CancelToken,
    /// Selects the overlay colors.
    pub mode: RenderMode,
    /// Clip intersected with the surface clip while an overlay draws.
    pub secondary_clip: Option<S::Clip>,
    /// Area covered by the Milky Way, collected while drawing in [`RenderMode::Print`].
    pub visible_region: Option<VisibleRegion>,
}

impl<'a, P: Projector, S: Surface> MapParams<'a, P, S> {
    /// Screen rendering with a fresh cancel token and no secondary clip.
    pub fn new(projector: &'a P, surface: &'a mut S) -> Self {
        Self {
            projector,
            surface,
            cancel: CancelToken::new(),
            mode: RenderMode::Screen,
            secondary_clip: None,
            visible_region: None,
        }
    }

    /// Set the cancel token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Set the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the secondary clip region.
    pub fn with_secondary_clip(mut self, clip: S::Clip) -> Self {
        self.secondary_clip = Some(clip);
        self
    }

    /// Whether drawing should go on.
    pub fn is_drawing(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

/// Narrows the clip of a surface for as long as it lives.
///
/// The original clip is restored on drop, so it is restored on every exit path.
pub struct ClipGuard<'s, S: Surface> {
    surface: &'s mut S,
    saved: Option<S::Clip>,
}

impl<'s, S: Surface> ClipGuard<'s, S> {
    /// Intersect the surface clip with `secondary`, if any.
    pub fn new(surface: &'s mut S, secondary: Option<&S::Clip>) -> Self {
        let saved = secondary.map(|clip| {
            let saved = surface.clip();
            surface.intersect_clip(clip);
            saved
        });
        Self { surface, saved }
    }

    /// The guarded surface.
    pub fn surface(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for ClipGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(clip) = self.saved.take() {
            self.surface.set_clip(clip);
        }
    }
}
