//! Core geometry for `litho-prep`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, ...),
//! - the wafer referential built from three reference points ([`Frame`],
//!   [`WaferReferential`]),
//! - the binary exposure grid and its mapping onto the wafer plane
//!   ([`BinaryGrid`], [`PhysicalExtent`], [`locate_exposed`]),
//! - the plane-to-stage change of basis ([`to_stage`]).
//!
//! Pipeline:
//! `stage point = O + x·eX + y·eY + z·eZ`, with `(x, y)` taken from the
//! exposed pixels of the grid and `z = 0`.

/// Error type shared by every geometric operation.
pub mod error;
/// Exposure point planning (grid → stage points).
pub mod exposure;
/// Binary exposure grid and physical extent.
pub mod grid;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Wafer referential construction.
pub mod referential;
/// Plane-local ↔ stage coordinate transforms.
pub mod transform;

pub use error::*;
pub use exposure::*;
pub use grid::*;
pub use math::*;
pub use referential::*;
pub use transform::*;
