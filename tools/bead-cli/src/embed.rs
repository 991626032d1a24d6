//! Embed command - bundle pattern markup into a PNG

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the embed command
#[derive(Args)]
pub struct EmbedArgs {
    /// Source PNG image
    pub image: PathBuf,

    /// Pattern markup file
    pub pattern: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// zlib-compress the embedded markup
    #[arg(long)]
    pub compress: bool,
}

/// Execute the embed command
pub fn execute(args: EmbedArgs) -> Result<()> {
    let image = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let markup = std::fs::read_to_string(&args.pattern)
        .with_context(|| format!("Failed to read {}", args.pattern.display()))?;

    // Refuse markup the reader would reject later
    let pattern = bead_format::parse_pattern(markup.as_bytes())
        .with_context(|| format!("Invalid pattern in {}", args.pattern.display()))?;

    let png = bead_format::embed_pattern(&image, &markup, args.compress)
        .with_context(|| format!("Failed to embed into {}", args.image.display()))?;
    std::fs::write(&args.output, &png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Embedded '{}' ({} beads) into {} ({} bytes)",
        pattern.name(),
        pattern.len(),
        args.output.display(),
        png.len()
    );
    Ok(())
}
