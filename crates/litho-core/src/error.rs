use thiserror::Error;

/// Failures of the geometric core.
///
/// All variants are deterministic functions of the inputs; none of them is
/// retriable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The reference points do not span a plane.
    #[error("degenerate reference geometry: {0} has zero length")]
    DegenerateGeometry(&'static str),
    /// Width or height is zero, negative or not finite.
    #[error("invalid physical extent: {0}")]
    InvalidExtent(String),
    /// The grid has no rows or no columns.
    #[error("empty grid: {rows} rows x {cols} columns")]
    EmptyGrid { rows: usize, cols: usize },
    /// A grid cell holds something other than 0 or 1.
    #[error("grid value {value} at row {row}, column {col} is not 0 or 1")]
    InvalidGridValue { row: usize, col: usize, value: u8 },
    /// Grid rows do not all have the same length.
    #[error("row {row} has {len} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// Coordinate sequences passed together have different lengths.
    #[error("coordinate sequences differ in length: x={x}, y={y}, z={z}")]
    LengthMismatch { x: usize, y: usize, z: usize },
}
