use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use coalign_core::io::{ImageFrameSet, JsonTrajectoryStore};
use coalign_core::pipeline::{align_sequence, AlignConfig};
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::{print_alignment_summary, print_config_summary};

#[derive(Args)]
pub struct AlignArgs {
    /// Frame manifest (TOML list of image paths with timestamps)
    pub manifest: PathBuf,

    /// Alignment config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the alignment record is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Base name of the alignment record (default: date of the first frame)
    #[arg(long)]
    pub name: Option<String>,

    /// Merge the saved WCS match and write a level-1 record
    #[arg(long)]
    pub pre_match_wcs: bool,

    /// Compute the trajectory without saving it
    #[arg(long)]
    pub no_save: bool,

    /// Reference wavelength for raster extraction
    #[arg(long, allow_hyphen_values = true)]
    pub wavelength: Option<f64>,

    /// Field rotation rate in degrees per minute
    #[arg(long)]
    pub rate: Option<f64>,
}

pub fn run(args: &AlignArgs) -> Result<()> {
    let config = build_config(args)?;
    let frames = ImageFrameSet::open(&args.manifest)
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;
    let ids = frames.ids().to_vec();
    let store = JsonTrajectoryStore::new(config.output_dir.clone().unwrap_or_else(|| ".".into()));

    print_config_summary(&args.manifest, ids.len(), &config);

    let pb = ProgressBar::new(ids.len().saturating_sub(1) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Aligning [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let output = align_sequence(
        &ids,
        &frames,
        &frames,
        &store,
        &config,
        |done| pb.set_position(done as u64),
        None,
    )?;
    pb.finish();

    print_alignment_summary(&output);
    Ok(())
}

fn build_config(args: &AlignArgs) -> Result<AlignConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        AlignConfig::from_toml_str(&contents).context("Invalid alignment config")?
    } else {
        AlignConfig::default()
    };

    if let Some(ref dir) = args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(ref name) = args.name {
        config.name = Some(name.clone());
    }
    if args.pre_match_wcs {
        config.pre_match_wcs = true;
    }
    if args.no_save {
        config.save = false;
    }
    if let Some(wavelength) = args.wavelength {
        config.reference_wavelength = wavelength;
    }
    if let Some(rate) = args.rate {
        config.rotation_rate_deg_per_min = rate;
    }

    Ok(config)
}
