//! litho CLI — turn a black/white picture into stage exposure points.

use std::{
    error::Error,
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use litho_core::{Pt3, WaferReferential};
use litho_pipeline::{
    create_output, replay, run_exposure_job, save_points, ExposureJob, ExposurePlan, Mmc100,
};
use log::info;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "litho")]
#[command(author, version, about = "Raster two-photon lithography preprocessor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the wafer referential spanned by three stage points.
    Frame {
        /// Wafer origin O, as x,y,z.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        origin: Pt3,
        /// Point A fixing the wafer X axis, as x,y,z.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        a: Pt3,
        /// Any other wafer point B, as x,y,z.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        b: Pt3,
    },

    /// Plan an exposure job and print its summary (JSON).
    Plan {
        #[command(flatten)]
        job: JobArgs,

        /// Write the exposure points to this file.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Replace `--out` if it already exists.
        #[arg(long)]
        force: bool,
    },

    /// Emit the MMC-100 command stream that visits every exposure point.
    StageScript {
        #[command(flatten)]
        job: JobArgs,

        /// Write the commands to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Replace `--out` if it already exists.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct JobArgs {
    /// Path to a JSON ExposureJob. Defaults are used if omitted.
    #[arg(long)]
    job: Option<PathBuf>,

    /// Picture to expose; overrides the job's image.
    #[arg(long)]
    image: Option<PathBuf>,
}

fn parse_point(s: &str) -> Result<Pt3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got '{s}'"));
    }
    let mut xyz = [0.0; 3];
    for (dst, part) in xyz.iter_mut().zip(&parts) {
        *dst = part
            .parse()
            .map_err(|e| format!("invalid coordinate '{part}': {e}"))?;
    }
    Ok(Pt3::new(xyz[0], xyz[1], xyz[2]))
}

fn load_job(args: &JobArgs) -> CliResult<ExposureJob> {
    let mut job = match &args.job {
        Some(path) => ExposureJob::from_json_file(path)?,
        None => ExposureJob::default(),
    };
    if let Some(image) = &args.image {
        job.image = Some(image.clone());
    }
    Ok(job)
}

fn frame_json(origin: &Pt3, a: &Pt3, b: &Pt3) -> CliResult<String> {
    let referential = WaferReferential::from_points(origin, a, b)?;
    Ok(serde_json::to_string_pretty(&referential)?)
}

fn plan_from_args(args: &JobArgs) -> CliResult<ExposurePlan> {
    let job = load_job(args)?;
    Ok(run_exposure_job(&job)?)
}

fn run_plan(args: &JobArgs, out: Option<&Path>, force: bool) -> CliResult<String> {
    let plan = plan_from_args(args)?;
    if let Some(out) = out {
        save_points(out, &plan.points, force)?;
    }
    Ok(serde_json::to_string_pretty(&plan.report())?)
}

fn stage_script(args: &JobArgs) -> CliResult<Vec<u8>> {
    let plan = plan_from_args(args)?;
    let mut stage = Mmc100::new(Vec::new());
    replay(&mut stage, &plan.points)?;
    Ok(stage.into_inner())
}

/// Plan first, open `out` only once the whole script is rendered.
fn run_stage_script(args: &JobArgs, out: Option<&Path>, force: bool) -> CliResult<()> {
    let script = stage_script(args)?;
    match out {
        Some(path) => {
            let mut file = create_output(path, force)?;
            file.write_all(&script)?;
            info!("stage script written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&script)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Error message followed by its chain of causes.
fn error_report(err: &dyn Error) -> String {
    let mut report = format!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        report.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    report
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = try_main() {
        eprintln!("{}", error_report(err.as_ref()));
        std::process::exit(1);
    }
}

fn try_main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Frame { origin, a, b } => {
            println!("{}", frame_json(&origin, &a, &b)?);
        }
        Commands::Plan { job, out, force } => {
            println!("{}", run_plan(&job, out.as_deref(), force)?);
        }
        Commands::StageScript { job, out, force } => {
            run_stage_script(&job, out.as_deref(), force)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use litho_pipeline::ExposureReport;
    use std::fs;

    fn job_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut img = GrayImage::from_pixel(3, 3, Luma([255]));
        img.put_pixel(0, 1, Luma([0]));
        img.put_pixel(1, 2, Luma([0]));
        img.save(dir.path().join("pattern.png")).unwrap();
        fs::write(
            dir.path().join("job.json"),
            r#"{
                "reference": { "o": [1, 1, 1], "a": [2, 1, 1], "b": [1, 2, 1] },
                "sizing": { "type": "extent", "width": 2.0, "height": 4.0 },
                "image": "pattern.png"
            }"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("1, -2.5,3").unwrap(), Pt3::new(1.0, -2.5, 3.0));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,a,2").is_err());
    }

    #[test]
    fn cli_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "litho", "frame", "--origin", "-1,0,0", "--a", "0,0,0", "--b", "-1,1,0",
        ])
        .unwrap();
        let Commands::Frame { origin, .. } = cli.command else {
            panic!("expected frame subcommand");
        };
        assert_eq!(origin, Pt3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn frame_command_reports_degenerate_points() {
        let p = Pt3::new(1.0, 1.0, 1.0);
        assert!(frame_json(&p, &p, &Pt3::origin()).is_err());

        let json = frame_json(&Pt3::origin(), &Pt3::new(1.0, 0.0, 0.0), &Pt3::new(0.0, 1.0, 0.0))
            .unwrap();
        let r: WaferReferential = serde_json::from_str(&json).unwrap();
        assert_eq!(r.frame, litho_core::Frame::identity());
    }

    #[test]
    fn plan_writes_points_and_summary() {
        let dir = job_dir();
        let args = JobArgs {
            job: Some(dir.path().join("job.json")),
            image: None,
        };
        let out = dir.path().join("points.dat");

        let json = run_plan(&args, Some(&out), false).expect("plan should succeed");
        let report: ExposureReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.exposed, 2);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "0.000000 1.000000 1.000000\n1.000000 -1.000000 1.000000\n"
        );

        assert!(run_plan(&args, Some(&out), false).is_err());
        assert!(run_plan(&args, Some(&out), true).is_ok());
    }

    #[test]
    fn stage_script_renders_every_move() {
        let dir = job_dir();
        let args = JobArgs {
            job: Some(dir.path().join("job.json")),
            image: None,
        };
        let script = String::from_utf8(stage_script(&args).unwrap()).unwrap();
        assert_eq!(script.matches("0RUN\r").count(), 2);
        assert!(script.contains("3MSA0.000000; 1MSA1.000000; 2MSA1.000000\r"));
    }

    #[test]
    fn failed_stage_script_keeps_existing_output() {
        let dir = job_dir();
        let out = dir.path().join("script.txt");
        fs::write(&out, "old script\n").unwrap();

        let args = JobArgs {
            job: Some(dir.path().join("job.json")),
            image: Some(dir.path().join("missing.png")),
        };
        assert!(run_stage_script(&args, Some(&out), true).is_err());
        assert_eq!(fs::read_to_string(&out).unwrap(), "old script\n");
    }

    #[test]
    fn stage_script_output_needs_force_to_replace() {
        let dir = job_dir();
        let out = dir.path().join("script.txt");
        fs::write(&out, "old script\n").unwrap();
        let args = JobArgs {
            job: Some(dir.path().join("job.json")),
            image: None,
        };

        assert!(run_stage_script(&args, Some(&out), false).is_err());
        assert_eq!(fs::read_to_string(&out).unwrap(), "old script\n");

        run_stage_script(&args, Some(&out), true).unwrap();
        let script = fs::read_to_string(&out).unwrap();
        assert!(script.starts_with("3ERR?\r"));
        assert_eq!(script.matches("0RUN\r").count(), 2);
    }

    #[test]
    fn error_report_names_the_degenerate_vector() {
        let dir = job_dir();
        fs::write(
            dir.path().join("flat.json"),
            r#"{
                "reference": { "o": [1, 1, 1], "a": [1, 1, 1], "b": [1, 2, 1] },
                "image": "pattern.png"
            }"#,
        )
        .unwrap();
        let args = JobArgs {
            job: Some(dir.path().join("flat.json")),
            image: None,
        };

        let err = plan_from_args(&args).unwrap_err();
        let report = error_report(err.as_ref());
        assert!(report.starts_with("error: reference points do not define a wafer plane"));
        assert!(report.contains("caused by: degenerate reference geometry: OA has zero length"));
    }

    #[test]
    fn image_flag_overrides_job() {
        let dir = job_dir();
        let args = JobArgs {
            job: Some(dir.path().join("job.json")),
            image: Some(dir.path().join("missing.png")),
        };
        let err = plan_from_args(&args).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }
}
