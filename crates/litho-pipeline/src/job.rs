use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use litho_core::{
    exposure_points, BinaryGrid, PhysicalExtent, Pt3, Real, ReferencePoints, WaferReferential,
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::load_binary_grid;

/// How the picture is scaled onto the wafer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sizing {
    /// Explicit physical width and height of the picture.
    Extent { width: Real, height: Real },
    /// Distance between neighbouring pixel centres.
    PixelSpacing { spacing: Real },
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Extent {
            width: 10.0,
            height: 10.0,
        }
    }
}

impl Sizing {
    /// Resolve to a physical extent for `grid`.
    pub fn extent_for(&self, grid: &BinaryGrid) -> Result<PhysicalExtent> {
        let extent = match *self {
            Sizing::Extent { width, height } => PhysicalExtent::new(width, height)?,
            Sizing::PixelSpacing { spacing } => PhysicalExtent::from_pixel_spacing(grid, spacing)?,
        };
        Ok(extent)
    }
}

/// Everything needed to turn a picture into exposure points.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExposureJob {
    /// Wafer reference points `O`, `A`, `B` in stage coordinates.
    #[serde(default)]
    pub reference: ReferencePoints,
    /// Physical size of the picture on the wafer.
    #[serde(default)]
    pub sizing: Sizing,
    /// Picture to expose (black pixels are written).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl ExposureJob {
    /// Read a job from JSON.
    ///
    /// A relative `image` path is resolved against the directory holding the
    /// job file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut job: ExposureJob = serde_json::from_str(&data)
            .with_context(|| format!("invalid job file {}", path.display()))?;

        if let (Some(image), Some(dir)) = (job.image.as_mut(), path.parent()) {
            if image.is_relative() {
                *image = dir.join(&*image);
            }
        }
        Ok(job)
    }
}

/// Result of planning a job: where the wafer is and what to expose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExposurePlan {
    pub referential: WaferReferential,
    pub extent: PhysicalExtent,
    pub rows: usize,
    pub cols: usize,
    /// Stage coordinates, row-major over the picture.
    pub points: Vec<Pt3>,
}

/// Summary of a plan, without the point list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExposureReport {
    pub referential: WaferReferential,
    pub extent: PhysicalExtent,
    pub rows: usize,
    pub cols: usize,
    pub exposed: usize,
}

impl ExposurePlan {
    pub fn report(&self) -> ExposureReport {
        ExposureReport {
            referential: self.referential,
            extent: self.extent,
            rows: self.rows,
            cols: self.cols,
            exposed: self.points.len(),
        }
    }
}

/// Plan `job` against an already loaded grid.
///
/// `job.image` is ignored.
pub fn plan_job(job: &ExposureJob, grid: &BinaryGrid) -> Result<ExposurePlan> {
    let referential = job
        .reference
        .referential()
        .context("reference points do not define a wafer plane")?;
    let extent = job.sizing.extent_for(grid).context("invalid picture size")?;
    let points = exposure_points(grid, &extent, &referential)?;

    info!(
        "planned {} exposure points over {} x {}",
        points.len(),
        extent.width,
        extent.height
    );
    Ok(ExposurePlan {
        referential,
        extent,
        rows: grid.rows(),
        cols: grid.cols(),
        points,
    })
}

/// Load the job's picture and plan it.
pub fn run_exposure_job(job: &ExposureJob) -> Result<ExposurePlan> {
    let Some(image) = job.image.as_ref() else {
        bail!("exposure job has no image");
    };
    let grid = load_binary_grid(image)?;
    plan_job(job, &grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use litho_core::GeometryError;

    fn reference_grid() -> BinaryGrid {
        BinaryGrid::from_rows(&[[1u8, 1, 1], [0, 1, 1], [1, 0, 1]]).unwrap()
    }

    #[test]
    fn default_job_is_axis_aligned() {
        let job = ExposureJob::default();
        let plan = plan_job(&job, &reference_grid()).unwrap();
        assert_eq!(plan.referential.origin, Pt3::origin());
        assert_eq!(plan.extent, PhysicalExtent::new(10.0, 10.0).unwrap());
        assert_eq!(
            plan.points,
            vec![Pt3::new(-5.0, 0.0, 0.0), Pt3::new(0.0, -5.0, 0.0)]
        );
    }

    #[test]
    fn pixel_spacing_scales_the_picture() {
        let job = ExposureJob {
            reference: ReferencePoints::new(
                Pt3::new(1.0, 1.0, 1.0),
                Pt3::new(2.0, 1.0, 1.0),
                Pt3::new(1.0, 2.0, 1.0),
            ),
            sizing: Sizing::PixelSpacing { spacing: 0.5 },
            image: None,
        };
        let plan = plan_job(&job, &reference_grid()).unwrap();
        assert_eq!(plan.extent, PhysicalExtent::new(1.0, 1.0).unwrap());
        assert_eq!(
            plan.points,
            vec![Pt3::new(0.5, 1.0, 1.0), Pt3::new(1.0, 0.5, 1.0)]
        );

        let report = plan.report();
        assert_eq!((report.rows, report.cols, report.exposed), (3, 3, 2));
    }

    #[test]
    fn degenerate_reference_is_reported() {
        let job = ExposureJob {
            reference: ReferencePoints::new(Pt3::origin(), Pt3::origin(), Pt3::new(0.0, 1.0, 0.0)),
            ..Default::default()
        };
        let err = plan_job(&job, &reference_grid()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeometryError>(),
            Some(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn zero_extent_is_reported() {
        let job = ExposureJob {
            sizing: Sizing::Extent {
                width: 0.0,
                height: 2.0,
            },
            ..Default::default()
        };
        let err = plan_job(&job, &reference_grid()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeometryError>(),
            Some(GeometryError::InvalidExtent(_))
        ));
    }

    #[test]
    fn job_without_image_cannot_run() {
        assert!(run_exposure_job(&ExposureJob::default()).is_err());
    }

    #[test]
    fn job_json_uses_tagged_sizing() {
        let json = r#"{
            "reference": { "o": [0, 0, 0], "a": [2, 0, 0], "b": [0, 1, 0] },
            "sizing": { "type": "pixel_spacing", "spacing": 0.25 },
            "image": "tux.png"
        }"#;
        let job: ExposureJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.sizing, Sizing::PixelSpacing { spacing: 0.25 });
        assert_eq!(job.reference.a, Pt3::new(2.0, 0.0, 0.0));
        assert_eq!(job.image.as_deref(), Some(Path::new("tux.png")));

        let empty: ExposureJob = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.reference, ReferencePoints::default());
        assert_eq!(empty.sizing, Sizing::default());
    }

    #[test]
    fn relative_image_is_resolved_next_to_the_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, r#"{ "image": "pattern.png" }"#).unwrap();

        let job = ExposureJob::from_json_file(&path).unwrap();
        assert_eq!(job.image, Some(dir.path().join("pattern.png")));
    }
}
