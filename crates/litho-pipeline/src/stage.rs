//! Stage sinks: where exposure points go after planning.
//!
//! [`Mmc100`] renders the ASCII command set of a Micos MMC-100 controller
//! onto any byte sink (a serial port handle, a file, a buffer). Opening the
//! port and pacing the commands are left to the caller.

use std::io::Write;

use anyhow::{Context, Result};
use litho_core::Pt3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Something that moves to absolute stage positions.
pub trait StageSink {
    /// Move to `target`, given in stage coordinates.
    fn move_abs(&mut self, target: &Pt3) -> Result<()>;

    /// Reset error state on every axis.
    fn clear_errors(&mut self) -> Result<()>;
}

/// Controller axis numbers wired to the stage X, Y and Z directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMap {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl Default for AxisMap {
    fn default() -> Self {
        Self { x: 3, y: 1, z: 2 }
    }
}

/// MMC-100 command writer.
///
/// Every command is terminated by a carriage return. An absolute move is one
/// `MSA` per axis followed by a global `0RUN`.
#[derive(Debug)]
pub struct Mmc100<W: Write> {
    out: W,
    axes: AxisMap,
}

impl<W: Write> Mmc100<W> {
    pub fn new(out: W) -> Self {
        Self::with_axes(out, AxisMap::default())
    }

    pub fn with_axes(out: W, axes: AxisMap) -> Self {
        Self { out, axes }
    }

    pub fn axes(&self) -> AxisMap {
        self.axes
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn send(&mut self, command: &str) -> Result<()> {
        debug!("sending: {command}");
        self.out
            .write_all(command.as_bytes())
            .and_then(|_| self.out.write_all(b"\r"))
            .with_context(|| format!("failed to send '{command}'"))
    }
}

impl<W: Write> StageSink for Mmc100<W> {
    fn move_abs(&mut self, target: &Pt3) -> Result<()> {
        let AxisMap { x, y, z } = self.axes;
        let command = format!(
            "{x}MSA{:.6}; {y}MSA{:.6}; {z}MSA{:.6}",
            target.x, target.y, target.z
        );
        self.send(&command)?;
        self.send("0RUN")
    }

    fn clear_errors(&mut self) -> Result<()> {
        let AxisMap { x, y, z } = self.axes;
        for axis in [x, y, z] {
            self.send(&format!("{axis}ERR?"))?;
        }
        Ok(())
    }
}

/// Clear controller errors, then visit every point in order.
pub fn replay<S: StageSink + ?Sized>(sink: &mut S, points: &[Pt3]) -> Result<()> {
    sink.clear_errors()?;
    for (idx, p) in points.iter().enumerate() {
        sink.move_abs(p)
            .with_context(|| format!("move to point {idx} failed"))?;
    }
    info!("replayed {} points", points.len());
    Ok(())
}
