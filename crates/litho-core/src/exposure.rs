//! Exposure planning: binary grid + extent + referential → stage points.

use log::debug;

use crate::{
    locate_exposed, to_stage, BinaryGrid, GeometryError, PhysicalExtent, Pt3, WaferReferential,
};

/// Stage coordinates of every exposed pixel, in row-major grid order.
///
/// The picture lies in the wafer plane (`z = 0`), centred on the referential
/// origin.
pub fn exposure_points(
    grid: &BinaryGrid,
    extent: &PhysicalExtent,
    referential: &WaferReferential,
) -> Result<Vec<Pt3>, GeometryError> {
    let local = locate_exposed(grid, extent.width, extent.height)?;
    let x: Vec<_> = local.iter().map(|p| p.x).collect();
    let y: Vec<_> = local.iter().map(|p| p.y).collect();
    let z = vec![0.0; local.len()];

    let points = to_stage(&x, &y, &z, &referential.origin, &referential.frame)?;
    debug!(
        "{} exposure points from a {}x{} grid ({} x {})",
        points.len(),
        grid.rows(),
        grid.cols(),
        extent.width,
        extent.height
    );
    Ok(points)
}
