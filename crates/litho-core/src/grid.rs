//! Binary exposure grid and its placement on the wafer plane.
//!
//! A grid cell holding `0` is exposed, `1` is left untouched (black pixels of
//! the source picture are written). The grid spans a [`PhysicalExtent`]
//! centred on the wafer origin: columns run from `-width/2` (left) to
//! `+width/2` (right), rows from `+height/2` (top) to `-height/2` (bottom).

use serde::{Deserialize, Serialize};

use crate::{linspace, GeometryError, Pt2, Real};

/// Cell value marking a location to expose.
pub const EXPOSE: u8 = 0;
/// Cell value marking a location to skip.
pub const SKIP: u8 = 1;

/// Row-major grid of `0`/`1` cells with at least one row and one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl BinaryGrid {
    /// Wrap a row-major buffer of `rows * cols` cells.
    ///
    /// # Errors
    ///
    /// [`GeometryError::EmptyGrid`] if either dimension is zero,
    /// [`GeometryError::RaggedGrid`] if the buffer length does not match,
    /// [`GeometryError::InvalidGridValue`] for cells outside `{0, 1}`.
    pub fn new(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, GeometryError> {
        if rows == 0 || cols == 0 {
            return Err(GeometryError::EmptyGrid { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(GeometryError::RaggedGrid {
                row: data.len() / cols,
                len: data.len() % cols,
                expected: cols,
            });
        }
        if let Some(idx) = data.iter().position(|&v| v > SKIP) {
            return Err(GeometryError::InvalidGridValue {
                row: idx / cols,
                col: idx % cols,
                value: data[idx],
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a grid from nested rows, top row first.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GeometryError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != cols {
                return Err(GeometryError::RaggedGrid {
                    row,
                    len: r.len(),
                    expected: cols,
                });
            }
            data.extend_from_slice(r);
        }
        Self::new(rows.len(), cols, data)
    }

    /// Threshold an 8-bit grey image into a binary grid.
    ///
    /// Every value is divided by the image maximum and rounded to the
    /// nearest integer (ties to even), so dark pixels become [`EXPOSE`]. An
    /// all-black image has no maximum to scale by and is fully exposed.
    pub fn from_luma(width: usize, height: usize, pixels: &[u8]) -> Result<Self, GeometryError> {
        let max = pixels.iter().copied().max().unwrap_or(0);
        let data = if max == 0 {
            vec![EXPOSE; pixels.len()]
        } else {
            let max = Real::from(max);
            pixels
                .iter()
                .map(|&p| (Real::from(p) / max).round_ties_even() as u8)
                .collect()
        };
        Self::new(height, width, data)
    }

    /// Number of rows (`Ny`, the image height in pixels).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`Nx`, the image width in pixels).
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn is_exposed(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(EXPOSE)
    }

    pub fn exposed_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == EXPOSE).count()
    }

    /// `(row, col)` of every exposed cell in row-major order.
    pub fn exposed_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == EXPOSE)
            .map(move |(idx, _)| (idx / cols, idx % cols))
    }
}

/// Physical size spanned by the grid, in stage units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalExtent {
    pub width: Real,
    pub height: Real,
}

impl PhysicalExtent {
    /// # Errors
    ///
    /// [`GeometryError::InvalidExtent`] unless both sides are finite and
    /// strictly positive.
    pub fn new(width: Real, height: Real) -> Result<Self, GeometryError> {
        let extent = Self { width, height };
        extent.validate()?;
        Ok(extent)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(GeometryError::InvalidExtent(format!(
                    "{name} must be positive, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Extent of a grid whose pixel centres are `spacing` apart.
    ///
    /// `width = (Nx - 1) * spacing`, `height = (Ny - 1) * spacing`, so a grid
    /// with a single row or column has no extent along that axis and is
    /// rejected.
    pub fn from_pixel_spacing(grid: &BinaryGrid, spacing: Real) -> Result<Self, GeometryError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(GeometryError::InvalidExtent(format!(
                "pixel spacing must be positive, got {spacing}"
            )));
        }
        Self::new(
            (grid.cols() - 1) as Real * spacing,
            (grid.rows() - 1) as Real * spacing,
        )
    }
}

/// In-plane `(x, y)` of every exposed cell, in row-major order.
///
/// `x` is sampled linearly across columns from `-width/2` to `+width/2`, `y`
/// across rows from `+height/2` down to `-height/2`.
///
/// # Errors
///
/// [`GeometryError::InvalidExtent`] if `width` or `height` is not strictly
/// positive.
pub fn locate_exposed(
    grid: &BinaryGrid,
    width: Real,
    height: Real,
) -> Result<Vec<Pt2>, GeometryError> {
    PhysicalExtent::new(width, height)?;

    let xs = linspace(-width / 2.0, width / 2.0, grid.cols());
    let ys = linspace(height / 2.0, -height / 2.0, grid.rows());

    Ok(grid
        .exposed_cells()
        .map(|(row, col)| Pt2::new(xs[col], ys[row]))
        .collect())
}
