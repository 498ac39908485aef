//! The ecliptic, sampled once per degree of ecliptic longitude.
//!
//! Samples are rotated into equatorial coordinates with the fixed J2000 mean obliquity
//! and drawn as broken lines like the constellation figures.

use std::f64::consts::{PI, TAU};

use crate::map::{MapParams, Projector, Surface};
use crate::matrix::{Matrix3x1, Matrix3x3};
use crate::render::{DrawMode, DrawStats, Overlay, OverlayStyle};
use crate::stream::{PointStream, RaDec, SectionLayout};

/// Sine of the J2000 mean obliquity.
pub const SIN_OBLIQUITY: f64 = 0.397777156;
/// Cosine of the J2000 mean obliquity.
pub const COS_OBLIQUITY: f64 = 0.917482062;

/// Longitudes 0° through 360° inclusive.
pub const ECLIPTIC_SAMPLES: usize = 361;

/// Rotation from ecliptic to equatorial coordinates.
pub fn obliquity_rotation() -> Matrix3x3 {
    Matrix3x3::new(
        1.,
        0.,
        0.,
        0.,
        COS_OBLIQUITY,
        -SIN_OBLIQUITY,
        0.,
        SIN_OBLIQUITY,
        COS_OBLIQUITY,
    )
}

/// Equatorial position of the ecliptic point at `longitude` (radians).
pub fn ecliptic_point(longitude: f64) -> RaDec {
    let eq = obliquity_rotation().mult_vec(&Matrix3x1::new(longitude.cos(), longitude.sin(), 0.));

    let ra = eq.y().atan2(eq.x()).rem_euclid(TAU);
    let dec = eq.z().clamp(-1., 1.).asin();

    let mut hours = (ra * 12. / PI) as f32;
    if hours >= 24. {
        hours = 0.;
    }
    RaDec::new(hours, dec.to_degrees() as f32)
}

/// The sampled ecliptic as a single-section stream.
#[derive(Clone, Debug)]
pub struct Ecliptic {
    stream: PointStream,
}

impl Default for Ecliptic {
    fn default() -> Self {
        Self::new()
    }
}

impl Ecliptic {
    /// Sample the ecliptic.
    pub fn new() -> Self {
        let samples = (0..ECLIPTIC_SAMPLES).map(|deg| ecliptic_point((deg as f64).to_radians()));
        Self {
            stream: PointStream::from_sections([samples], SectionLayout::Plain),
        }
    }

    /// The samples as a single-section stream.
    pub fn stream(&self) -> &PointStream {
        &self.stream
    }

    /// The ecliptic as a broken-line overlay in `style`.
    pub fn overlay(&self, style: OverlayStyle) -> Overlay<'_> {
        Overlay::new(&self.stream, DrawMode::BrokenLine, style)
    }

    /// Draw the ecliptic in `style`.
    pub fn draw<P: Projector, S: Surface>(
        &self,
        params: &mut MapParams<'_, P, S>,
        style: OverlayStyle,
    ) -> DrawStats {
        self.overlay(style).draw(params)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::Point2;

    use super::*;
    use crate::config::ECLIPTIC_LIMIT;
    use crate::display_list::DisplayList;
    use crate::map::Color;
    use crate::projection::Stereographic;
    use crate::stream::Entry;

    #[test]
    fn equinoxes() {
        let vernal = ecliptic_point(0.);
        assert_eq!(vernal, RaDec::new(0., 0.));

        let autumnal = ecliptic_point(PI);
        assert_abs_diff_eq!(autumnal.ra, 12., epsilon = 1e-5);
        assert_abs_diff_eq!(autumnal.dec, 0., epsilon = 1e-5);
    }

    #[test]
    fn solstices() {
        let summer = ecliptic_point(PI / 2.);
        assert_abs_diff_eq!(summer.ra, 6., epsilon = 1e-5);
        assert_abs_diff_eq!(summer.dec, 23.4393, epsilon = 1e-3);

        let winter = ecliptic_point(1.5 * PI);
        assert_abs_diff_eq!(winter.ra, 18., epsilon = 1e-5);
        assert_abs_diff_eq!(winter.dec, -23.4393, epsilon = 1e-3);
    }

    #[test]
    fn samples() {
        let ecliptic = Ecliptic::new();
        let stream = ecliptic.stream();
        assert_eq!(stream.point_count(), ECLIPTIC_SAMPLES);
        assert_eq!(stream.section_count(), 1);
        assert_eq!(stream.entries().last(), Some(&Entry::StreamEnd));

        let points = stream
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::Point(p) => Some(*p),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(points.iter().all(|p| (0. ..24.).contains(&p.ra)));
        assert_eq!(points[180].ra.round(), 12.);
        // The loop closes at 0h rather than 24h.
        assert_eq!(points[360].ra, 0.);
        assert_abs_diff_eq!(points[360].dec, points[0].dec, epsilon = 1e-6);
    }

    #[test]
    fn draw_half_sky() {
        // Viewed from the vernal equinox, longitudes 0..=91 and 269..=360 are visible.
        let ecliptic = Ecliptic::new();
        let projector = Stereographic::new(0., 0., 100., Point2::new(0., 0.));
        let mut list = DisplayList::new();
        let stats = ecliptic.draw(
            &mut MapParams::new(&projector, &mut list),
            OverlayStyle::new(ECLIPTIC_LIMIT, Color::rgb(200, 50, 50)),
        );

        assert_eq!(stats.projected, ECLIPTIC_SAMPLES);
        assert_eq!(stats.primitives, 184);
        assert_eq!(list.len(), 184);
    }
}
