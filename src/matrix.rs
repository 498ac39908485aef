//! Dense 3x3 and 3x1 matrices for rotating coordinates on the celestial sphere.
//!
//! Both types are small `Copy` values backed by [`nalgebra`] storage, so a copy never
//! shares elements with its source. Elements are addressed row-major and zero-based.
//!
//! Inversion deliberately uses the classical adjugate formula: there is no pivoting and
//! no singularity check. A singular matrix yields non-finite entries. All callers in
//! this crate invert rotation matrices, which are never singular.

use std::ops::Mul;

use nalgebra::{Matrix3, Vector3};

use crate::Float;

/// A 3x3 matrix. [`Default`] is the identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3x3<F: Float = f64> {
    m: Matrix3<F>,
}

impl<F: Float> Matrix3x3<F> {
    /// The identity matrix.
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Create a matrix from its nine elements, given row by row.
    #[allow(clippy::too_many_arguments)]
    pub fn new(m11: F, m12: F, m13: F, m21: F, m22: F, m23: F, m31: F, m32: F, m33: F) -> Self {
        Self {
            m: Matrix3::new(m11, m12, m13, m21, m22, m23, m31, m32, m33),
        }
    }

    /// Create a matrix from an array of rows.
    pub fn from_rows(rows: [[F; 3]; 3]) -> Self {
        let [[m11, m12, m13], [m21, m22, m23], [m31, m32, m33]] = rows;
        Self::new(m11, m12, m13, m21, m22, m23, m31, m32, m33)
    }

    /// Active rotation by `angle` (radians) about the x axis.
    pub fn rotation_x(angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (zero, one) = (nalgebra::zero::<F>(), nalgebra::one::<F>());
        Self::new(one, zero, zero, zero, c, -s, zero, s, c)
    }

    /// Active rotation by `angle` (radians) about the y axis.
    pub fn rotation_y(angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (zero, one) = (nalgebra::zero::<F>(), nalgebra::one::<F>());
        Self::new(c, zero, s, zero, one, zero, -s, zero, c)
    }

    /// Active rotation by `angle` (radians) about the z axis.
    pub fn rotation_z(angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (zero, one) = (nalgebra::zero::<F>(), nalgebra::one::<F>());
        Self::new(c, -s, zero, s, c, zero, zero, zero, one)
    }

    /// Element at `row`, `col`. Panics if either index is not below 3.
    pub fn get(&self, row: usize, col: usize) -> F {
        self.m[(row, col)]
    }

    /// The underlying nalgebra matrix.
    pub fn as_matrix(&self) -> &Matrix3<F> {
        &self.m
    }

    /// Matrix product `self * other`.
    pub fn mult(&self, other: &Self) -> Self {
        Self {
            m: self.m * other.m,
        }
    }

    /// Matrix-vector product `self * v`.
    pub fn mult_vec(&self, v: &Matrix3x1<F>) -> Matrix3x1<F> {
        Matrix3x1 { v: self.m * v.v }
    }

    /// Replace `self` with `other * self`.
    pub fn pre_mult(&mut self, other: &Self) {
        self.m = other.m * self.m;
    }

    /// Replace `self` with `self * other`.
    pub fn post_mult(&mut self, other: &Self) {
        self.m = self.m * other.m;
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        Self {
            m: self.m.transpose(),
        }
    }

    /// The determinant.
    pub fn determinant(&self) -> F {
        let c = self.cofactors();
        self.m[(0, 0)] * c[0][0] + self.m[(0, 1)] * c[0][1] + self.m[(0, 2)] * c[0][2]
    }

    /// Inverse via adjugate over determinant.
    ///
    /// Returns non-finite entries for a singular matrix instead of failing.
    pub fn invert(&self) -> Self {
        let c = self.cofactors();
        let det = self.m[(0, 0)] * c[0][0] + self.m[(0, 1)] * c[0][1] + self.m[(0, 2)] * c[0][2];

        // The adjugate is the transposed cofactor matrix.
        Self::new(
            c[0][0] / det,
            c[1][0] / det,
            c[2][0] / det,
            c[0][1] / det,
            c[1][1] / det,
            c[2][1] / det,
            c[0][2] / det,
            c[1][2] / det,
            c[2][2] / det,
        )
    }

    fn cofactors(&self) -> [[F; 3]; 3] {
        let a = &self.m;
        [
            [
                a[(1, 1)] * a[(2, 2)] - a[(1, 2)] * a[(2, 1)],
                a[(1, 2)] * a[(2, 0)] - a[(1, 0)] * a[(2, 2)],
                a[(1, 0)] * a[(2, 1)] - a[(1, 1)] * a[(2, 0)],
            ],
            [
                a[(0, 2)] * a[(2, 1)] - a[(0, 1)] * a[(2, 2)],
                a[(0, 0)] * a[(2, 2)] - a[(0, 2)] * a[(2, 0)],
                a[(0, 1)] * a[(2, 0)] - a[(0, 0)] * a[(2, 1)],
            ],
            [
                a[(0, 1)] * a[(1, 2)] - a[(0, 2)] * a[(1, 1)],
                a[(0, 2)] * a[(1, 0)] - a[(0, 0)] * a[(1, 2)],
                a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)],
            ],
        ]
    }
}

impl<F: Float> Default for Matrix3x3<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> From<Matrix3<F>> for Matrix3x3<F> {
    fn from(m: Matrix3<F>) -> Self {
        Self { m }
    }
}

impl<F: Float> Mul for Matrix3x3<F> {
    type Output = Matrix3x3<F>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mult(&rhs)
    }
}

impl<F: Float> Mul<Matrix3x1<F>> for Matrix3x3<F> {
    type Output = Matrix3x1<F>;

    fn mul(self, rhs: Matrix3x1<F>) -> Self::Output {
        self.mult_vec(&rhs)
    }
}

/// A 3x1 column matrix, used for direction vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3x1<F: Float = f64> {
    v: Vector3<F>,
}

impl<F: Float> Matrix3x1<F> {
    /// Create a vector from its elements.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self {
            v: Vector3::new(x, y, z),
        }
    }

    /// Unit vector pointing at longitude `lon` and latitude `lat` (radians).
    pub fn from_spherical(lon: F, lat: F) -> Self {
        let cos_lat = lat.cos();
        Self::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Longitude in `[0, 2π)` and latitude in `[-π/2, π/2]` of a unit vector.
    pub fn to_spherical(&self) -> (F, F) {
        let zero = nalgebra::zero::<F>();
        let one = nalgebra::one::<F>();
        let mut lon = self.v.y.atan2(self.v.x);
        if lon < zero {
            lon += F::two_pi();
        }
        if lon >= F::two_pi() {
            lon = zero;
        }
        let lat = self.v.z.clamp(-one, one).asin();
        (lon, lat)
    }

    /// First element.
    pub fn x(&self) -> F {
        self.v.x
    }

    /// Second element.
    pub fn y(&self) -> F {
        self.v.y
    }

    /// Third element.
    pub fn z(&self) -> F {
        self.v.z
    }

    /// Element at `row`. Panics if `row` is not below 3.
    pub fn get(&self, row: usize) -> F {
        self.v[row]
    }

    /// The underlying nalgebra vector.
    pub fn as_vector(&self) -> &Vector3<F> {
        &self.v
    }

    /// Replace `self` with `m * self`.
    pub fn pre_mult(&mut self, m: &Matrix3x3<F>) {
        self.v = m.m * self.v;
    }
}

impl<F: Float> From<Vector3<F>> for Matrix3x1<F> {
    fn from(v: Vector3<F>) -> Self {
        Self { v }
    }
}
