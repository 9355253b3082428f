//! Mathematical utilities and type definitions.
//!
//! Points and vectors share the same underlying representation; the aliases
//! only document intent at call sites.

use nalgebra::{Isometry3, Matrix3, Point2, Point3, Vector3};

use crate::GeometryError;

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Norms at or below this value are treated as zero.
pub const NORM_EPS: Real = 1e-12;

/// Scale `v` to unit length.
///
/// Fails with [`GeometryError::DegenerateGeometry`] when `v` has (numerically)
/// zero length; `what` names the offending vector in the error message.
pub fn normalize(v: &Vec3, what: &'static str) -> Result<Vec3, GeometryError> {
    let n = v.norm();
    if !n.is_finite() || n <= NORM_EPS {
        return Err(GeometryError::DegenerateGeometry(what));
    }
    Ok(v / n)
}

/// `n` evenly spaced samples from `start` to `stop`, both endpoints included.
///
/// A single sample sits at `start`; zero samples give an empty vector.
pub fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        }
    }
}
