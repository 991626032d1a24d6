//! Info command - summarize a pattern file

use anyhow::{Context, Result};
use bead_format::Pattern;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Pattern file (markup or PNG with an embedded pattern)
    pub file: PathBuf,

    /// Also list the PNG chunks
    #[arg(long)]
    pub chunks: bool,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    if args.chunks {
        print!("{}", describe_chunks(&bytes)?);
    }

    let pattern = bead_format::decode(&bytes)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;
    print!("{}", describe(&pattern));

    Ok(())
}

fn describe(pattern: &Pattern) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", pattern.name());
    let _ = writeln!(out, "  Size:  {} x {}", pattern.columns(), pattern.rows());
    let _ = writeln!(out, "  Beads: {}", pattern.len());
    let _ = writeln!(out, "  Units: {}", pattern.total_units());

    let summary = pattern.color_summary();
    if !summary.is_empty() {
        let _ = writeln!(out, "  Colors:");
        for (color, units) in summary {
            let _ = writeln!(out, "    {:<16} {}", color, units);
        }
    }
    out
}

fn describe_chunks(bytes: &[u8]) -> Result<String> {
    let mut out = String::from("=== Chunks ===\n");
    for chunk in bead_format::chunks(bytes).context("Not a PNG container")? {
        let chunk = chunk.context("Malformed chunk")?;
        let _ = writeln!(out, "  {} {:>8} bytes", chunk.tag_str(), chunk.payload.len());
    }
    Ok(out)
}
