use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use plane_detect::io::{PlaneDetectConfig, PlaneDetectReport, PointCloudFile};
use plane_detect::PlaneOutput;

#[cfg(not(feature = "tracing"))]
use log::{info, warn};

#[cfg(feature = "tracing")]
use tracing::{info, warn};

#[cfg(feature = "tracing")]
use plane_detect::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use plane_detect::core::init_with_level;
use plane_detect::core::level_for_verbosity;

/// Detect the dominant plane in a JSON point cloud.
#[derive(Debug, Parser)]
#[command(name = "plane-detect", version)]
struct Cli {
    /// JSON detection config (`cloud_path`, optional `output_path`, `seed`, `params`).
    config: PathBuf,
    /// Report only the raw RANSAC winner, skipping least-squares refinement.
    #[arg(long)]
    raw: bool,
    /// Override the sampling seed from the config.
    #[arg(long)]
    seed: Option<u64>,
    /// Write the report here instead of the configured output (or stdout).
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Log progress to stderr; repeat for debug and trace output.
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = level_for_verbosity(cli.verbose);

    #[cfg(not(feature = "tracing"))]
    init_with_level(level)?;

    #[cfg(feature = "tracing")]
    init_tracing(false, level);

    run(cli)
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info"))]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = PlaneDetectConfig::load_json(&cli.config)?;
    if cli.raw {
        cfg.params.output = PlaneOutput::Raw;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }

    let cloud_path = cfg.resolve_cloud_path(&cli.config);
    let cloud = PointCloudFile::load_json(&cloud_path)?;
    info!("loaded {} points from {}", cloud.points.len(), cloud_path.display());

    let mut detector = cfg.build_detector();
    let mut report = PlaneDetectReport::new(&cfg, &cli.config, cloud.points.len());
    match detector.try_detect(&cloud.points) {
        Ok(detection) => {
            info!(
                "plane found: {} inliers, normal {:?}",
                detection.inlier_count(),
                detection.plane.normal().into_inner()
            );
            report.set_detection(detection);
        }
        Err(err) => {
            warn!("no plane: {err}");
            report.set_error(err);
        }
    }

    let output = cli
        .output
        .or_else(|| cfg.output_path.as_ref().map(PathBuf::from));
    write_report(output.as_deref(), &report)
}

fn write_report(
    path: Option<&Path>,
    report: &PlaneDetectReport,
) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            report.write_json(path)?;
            info!("wrote report to {}", path.display());
        }
        None => println!("{}", report.to_json_pretty()?),
    }
    Ok(())
}
