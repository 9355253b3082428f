//! Black/white picture → [`BinaryGrid`].

use std::path::Path;

use anyhow::{Context, Result};
use image::ImageReader;
use litho_core::BinaryGrid;
use log::info;

/// Load a picture and threshold it into a binary exposure grid.
///
/// The image is converted to 8-bit grey, then every pixel is scaled by the
/// brightest one and rounded: black pixels become `0` (expose), white ones
/// `1`. See [`BinaryGrid::from_luma`].
pub fn load_binary_grid(path: impl AsRef<Path>) -> Result<BinaryGrid> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to read {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?
        .to_luma8();

    let (width, height) = img.dimensions();
    let grid = BinaryGrid::from_luma(width as usize, height as usize, img.as_raw())
        .with_context(|| format!("unusable image {}", path.display()))?;

    info!(
        "loaded {} ({}x{} px, {} to expose)",
        path.display(),
        grid.cols(),
        grid.rows(),
        grid.exposed_count()
    );
    Ok(grid)
}
