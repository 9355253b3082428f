//! End-to-end exposure jobs built on [`litho_core`].
//!
//! A job combines the three wafer reference points, the physical size of the
//! picture and a black/white image. Running it yields an [`ExposurePlan`]:
//! the wafer referential plus the stage coordinates of every pixel to expose.
//! Plans can be written to the plain-text point format ([`write_points`]) or
//! replayed through a [`StageSink`].
//!
//! ```no_run
//! use litho_pipeline::{run_exposure_job, save_points, ExposureJob};
//!
//! # fn main() -> anyhow::Result<()> {
//! let job = ExposureJob::from_json_file("job.json")?;
//! let plan = run_exposure_job(&job)?;
//! save_points("expose_points.dat", &plan.points, false)?;
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod job;
pub mod picture;
pub mod stage;

pub use export::*;
pub use job::*;
pub use picture::*;
pub use stage::*;
