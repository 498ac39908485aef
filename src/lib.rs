#![warn(missing_docs)]

//! Sky overlays for interactive star charts: constellation boundaries, constellation figures,
//! the Milky Way, and the ecliptic. \
//! Rendering of stars, labels, and grids is left to the host chart. This crate only decodes the
//! overlay datasets and draws them through a projection onto a drawing surface.
//!
//! ## Interface
//! The datasets are stored as big-endian point streams (see [`stream`]) and loaded once by a
//! [`Catalog`]. The central struct is [`SkyOverlays`], which draws every enabled overlay in a
//! fixed back-to-front order. Overlays are configured via [`OverlayConfig`] and its
//! `with_*()` functions.
//!
//! Example:
//! ```no_run
//! use nalgebra::Point2;
//! use skyoverlay::{Catalog, DisplayList, MapParams, OverlayConfig, SkyOverlays, Stereographic};
//!
//! let catalog = Catalog::from_dir("resources");
//! let sky = SkyOverlays::new(&catalog, OverlayConfig::default().with_ecliptic(false));
//!
//! let projector = Stereographic::new(1.46, 0.12, 400., Point2::new(512., 384.));
//! let mut surface = DisplayList::new();
//! let stats = sky.draw(&mut MapParams::new(&projector, &mut surface));
//! println!("{} primitives", stats.primitives);
//! ```
//!
//! The host chart provides a [`Projector`] and a [`Surface`]. A [`CancelToken`] passed via
//! [`MapParams::with_cancel()`] lets another thread abort a redraw.
//!
//! ## Parameters
//! - `limit`: Maximum angular distance (radians) of a point from the view center for it to be drawn.
//!     For the Milky Way, the limit applies to the center point of each section, and sections
//!     beyond it are skipped as a whole.
//! - `color`/`print_color`: Colors used in [`RenderMode::Screen`] and [`RenderMode::Print`].

pub mod catalog;
pub mod config;
pub mod display_list;
pub mod ecliptic;
pub mod error;
pub mod map;
pub mod matrix;
pub mod projection;
pub mod render;
pub mod sky;
pub mod stream;

pub use catalog::{Catalog, Dataset, DirSource, ResourceSource};
pub use config::{Layer, OverlayConfig};
pub use display_list::{ClipRect, DisplayList};
pub use ecliptic::Ecliptic;
pub use error::LoadError;
pub use map::{CancelToken, ClipGuard, Color, MapParams, Projection, Projector, RenderMode, Surface};
pub use matrix::{Matrix3x1, Matrix3x3};
pub use projection::Stereographic;
pub use render::{DrawMode, DrawStats, Overlay, OverlayStyle, VisibleRegion};
pub use sky::SkyOverlays;
pub use stream::{Entry, PointStream, RaDec, SectionLayout};

/// A generic float trait such that the matrix kernel is generic over `f32`/`f64`.
///
/// This trait is automatically implemented for all types implementing the supertraits.
/// Particularly, this includes `f32` and `f64`.
/// [`num_traits::Float`] is not a supertrait as the need to specify the provider of the redundant definitions of the basic math functions would clutter the code.
pub trait Float: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive {}

impl<F> Float for F where F: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive {}
