//! Wafer referential from three reference points.
//!
//! By convention every point handled here is expressed in the coordinate
//! system of the stage. The wafer plane is fixed by three points picked on
//! the sample:
//!
//! - `O`: origin of the wafer frame,
//! - `A`: fixes the primary in-plane axis `eX` along `O → A`,
//! - `B`: any other point of the plane, not on the line `O A`.
//!
//! `eY` is *not* the direction of `O → B`. It is recovered as `eZ × eX` once
//! the plane normal is known, so the basis is orthonormal whatever the angle
//! between `O → A` and `O → B`; `B` only selects on which side of `eX` the
//! `eY` axis points.

use nalgebra::{Rotation3, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::{normalize, GeometryError, Iso3, Mat3, Pt3, Vec3};

/// Orthonormal right-handed basis of the wafer, expressed in stage
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub ex: Vec3,
    pub ey: Vec3,
    pub ez: Vec3,
}

impl Frame {
    /// Frame aligned with the stage axes.
    pub fn identity() -> Self {
        Self {
            ex: Vec3::x(),
            ey: Vec3::y(),
            ez: Vec3::z(),
        }
    }

    /// Basis vectors as matrix columns `[eX | eY | eZ]`.
    ///
    /// Multiplying a plane-local vector by this matrix yields its stage
    /// components.
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_columns(&[self.ex, self.ey, self.ez])
    }
}

/// Build the wafer basis `(eX, eY, eZ)` from the reference triple.
///
/// 1. `eX = normalize(A − O)`
/// 2. `v = normalize(B − O)`
/// 3. `eZ = normalize(eX × v)`
/// 4. `eY = eZ × eX`
///
/// # Errors
///
/// [`GeometryError::DegenerateGeometry`] if `A == O`, `B == O`, or if
/// `O → A` and `O → B` are parallel.
pub fn build_referential(o: &Pt3, a: &Pt3, b: &Pt3) -> Result<Frame, GeometryError> {
    let ex = normalize(&(a - o), "OA")?;
    let v = normalize(&(b - o), "OB")?;
    let ez = normalize(&ex.cross(&v), "OA x OB")?;
    // unit length already: eZ ⟂ eX, both unit
    let ey = ez.cross(&ex);

    Ok(Frame { ex, ey, ez })
}

/// The three points picked on the sample, in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoints {
    pub o: Pt3,
    pub a: Pt3,
    pub b: Pt3,
}

impl Default for ReferencePoints {
    fn default() -> Self {
        Self {
            o: Pt3::origin(),
            a: Pt3::new(1.0, 0.0, 0.0),
            b: Pt3::new(0.0, 1.0, 0.0),
        }
    }
}

impl ReferencePoints {
    pub fn new(o: Pt3, a: Pt3, b: Pt3) -> Self {
        Self { o, a, b }
    }

    /// Derive the wafer referential anchored at `O`.
    pub fn referential(&self) -> Result<WaferReferential, GeometryError> {
        WaferReferential::from_points(&self.o, &self.a, &self.b)
    }
}

/// Wafer frame together with its origin: the full plane-to-stage transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaferReferential {
    pub origin: Pt3,
    pub frame: Frame,
}

impl WaferReferential {
    pub fn new(origin: Pt3, frame: Frame) -> Self {
        Self { origin, frame }
    }

    /// See [`build_referential`].
    pub fn from_points(o: &Pt3, a: &Pt3, b: &Pt3) -> Result<Self, GeometryError> {
        Ok(Self {
            origin: *o,
            frame: build_referential(o, a, b)?,
        })
    }

    /// Map a plane-local point `(x, y, z)` into stage coordinates.
    pub fn to_stage(&self, local: &Pt3) -> Pt3 {
        self.origin + local.x * self.frame.ex + local.y * self.frame.ey + local.z * self.frame.ez
    }

    /// Express a stage point in plane-local coordinates.
    ///
    /// Inverse of [`Self::to_stage`]; the basis is orthonormal so the
    /// inverse is a transpose.
    pub fn to_plane(&self, stage: &Pt3) -> Pt3 {
        let d = stage - self.origin;
        Pt3::new(
            d.dot(&self.frame.ex),
            d.dot(&self.frame.ey),
            d.dot(&self.frame.ez),
        )
    }

    /// The same transform as a rigid motion `T_stage_wafer`.
    pub fn to_isometry(&self) -> Iso3 {
        let rot = Rotation3::from_matrix_unchecked(self.frame.matrix());
        Iso3::from_parts(
            Translation3::from(self.origin.coords),
            UnitQuaternion::from_rotation_matrix(&rot),
        )
    }
}
