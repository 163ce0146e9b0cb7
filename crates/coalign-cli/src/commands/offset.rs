use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use coalign_core::align::estimate_offset;
use coalign_core::io::image_io::load_raster;

#[derive(Args)]
pub struct OffsetArgs {
    /// Image to measure
    pub image: PathBuf,

    /// Reference (template) image of the same size
    pub template: PathBuf,
}

pub fn run(args: &OffsetArgs) -> Result<()> {
    let image = load_raster(&args.image)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;
    let template = load_raster(&args.template)
        .with_context(|| format!("Failed to load {}", args.template.display()))?;

    let offset = estimate_offset(&image, &template)?;

    println!("Image:     {}", args.image.display());
    println!("Template:  {}", args.template.display());
    println!("Offset x:  {:+.3} px", offset.x);
    println!("Offset y:  {:+.3} px", offset.y);

    Ok(())
}
