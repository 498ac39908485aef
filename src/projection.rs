//! Stereographic projection of the celestial sphere around a view center.

use nalgebra::Point2;

use crate::map::{Projection, Projector};
use crate::matrix::{Matrix3x1, Matrix3x3};

/// Stereographic projection centered on a sky position.
///
/// North is up and east is to the left, as seen on the sky. `scale` is the number of
/// screen units per radian at the view center.
#[derive(Clone, Debug, PartialEq)]
pub struct Stereographic {
    /// Rotates the view center onto the +x axis.
    rotation: Matrix3x3,
    inverse: Matrix3x3,
    scale: f64,
    origin: Point2<f64>,
}

impl Stereographic {
    /// Create a projection centered on `(center_ra, center_dec)` (radians), mapping the
    /// center onto `origin`.
    pub fn new(center_ra: f64, center_dec: f64, scale: f64, origin: Point2<f64>) -> Self {
        let mut rotation = Matrix3x3::rotation_y(center_dec);
        rotation.post_mult(&Matrix3x3::rotation_z(-center_ra));
        Self {
            inverse: rotation.invert(),
            rotation,
            scale,
            origin,
        }
    }

    /// Sky position (radians) shown at a screen point.
    pub fn unproject(&self, point: Point2<f64>) -> (f64, f64) {
        let u = (self.origin.x - point.x) / self.scale;
        let v = (self.origin.y - point.y) / self.scale;
        let rho2 = u * u + v * v;
        let w = Matrix3x1::new(
            (4. - rho2) / (4. + rho2),
            4. * u / (4. + rho2),
            4. * v / (4. + rho2),
        );
        self.inverse.mult_vec(&w).to_spherical()
    }
}

impl Projector for Stereographic {
    fn project(&self, ra: f64, dec: f64) -> Projection {
        let w = self.rotation.mult_vec(&Matrix3x1::from_spherical(ra, dec));
        let distance = w.x().clamp(-1., 1.).acos();
        let k = 2. / (1. + w.x()).max(f64::EPSILON);
        Projection::new(
            self.origin.x - self.scale * k * w.y(),
            self.origin.y - self.scale * k * w.z(),
            distance,
        )
    }
}
