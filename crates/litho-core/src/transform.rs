//! Plane-local ↔ stage coordinate transforms.
//!
//! A plane-local point `(x, y, z)` relative to origin `O` and basis
//! `(eX, eY, eZ)` lands at `O + x·eX + y·eY + z·eZ` in stage coordinates.
//! No bounds are checked; the transform is defined for every real input.

use crate::{Frame, GeometryError, Pt3, Real, WaferReferential};

/// Apply the plane-to-stage change of basis to coordinate columns.
///
/// `x`, `y` and `z` hold one entry per point (`z` is all zeros for a planar
/// exposure). Output order follows input order.
///
/// # Errors
///
/// [`GeometryError::LengthMismatch`] if the three slices differ in length.
pub fn to_stage(
    x: &[Real],
    y: &[Real],
    z: &[Real],
    origin: &Pt3,
    frame: &Frame,
) -> Result<Vec<Pt3>, GeometryError> {
    if x.len() != y.len() || x.len() != z.len() {
        return Err(GeometryError::LengthMismatch {
            x: x.len(),
            y: y.len(),
            z: z.len(),
        });
    }

    let referential = WaferReferential::new(*origin, *frame);
    Ok(x.iter()
        .zip(y)
        .zip(z)
        .map(|((&xi, &yi), &zi)| referential.to_stage(&Pt3::new(xi, yi, zi)))
        .collect())
}

/// Express stage points in plane-local coordinates, one column per axis.
///
/// Inverse of [`to_stage`] for an orthonormal frame.
pub fn to_plane(points: &[Pt3], origin: &Pt3, frame: &Frame) -> [Vec<Real>; 3] {
    let referential = WaferReferential::new(*origin, *frame);
    let mut cols = [
        Vec::with_capacity(points.len()),
        Vec::with_capacity(points.len()),
        Vec::with_capacity(points.len()),
    ];
    for p in points {
        let local = referential.to_plane(p);
        for (k, col) in cols.iter_mut().enumerate() {
            col.push(local[k]);
        }
    }
    cols
}
