//! Plain-text export of exposure points.
//!
//! One point per line, three space-separated decimals with six digits after
//! the point (`%.6f %.6f %.6f`), no header. Downstream tooling parses this
//! exact layout.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use litho_core::Pt3;
use log::info;

/// Write `points` to `writer` in the point-file format.
pub fn write_points<W: Write>(mut writer: W, points: &[Pt3]) -> std::io::Result<()> {
    for p in points {
        writeln!(writer, "{:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }
    writer.flush()
}

/// Render `points` in the point-file format.
pub fn points_to_string(points: &[Pt3]) -> String {
    points
        .iter()
        .map(|p| format!("{:.6} {:.6} {:.6}\n", p.x, p.y, p.z))
        .collect()
}

/// Open `path` for writing.
///
/// Without `overwrite` the file must not exist yet; the check is made by the
/// OS when the file is created.
pub fn create_output(path: impl AsRef<Path>, overwrite: bool) -> Result<File> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    match options.open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            bail!("{} already exists (pass overwrite to replace it)", path.display())
        }
        Err(e) => Err(e).with_context(|| format!("failed to create {}", path.display())),
    }
}

/// Save `points` to `path`.
///
/// An existing file is only replaced when `overwrite` is set.
pub fn save_points(path: impl AsRef<Path>, points: &[Pt3], overwrite: bool) -> Result<()> {
    let path = path.as_ref();
    let file = create_output(path, overwrite)?;
    write_points(BufWriter::new(file), points)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!("exported {} points to {}", points.len(), path.display());
    Ok(())
}
