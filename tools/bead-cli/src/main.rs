//! Bead CLI - play and inspect BeadReader patterns
//!
//! # Commands
//!
//! - `bead info` - Show a pattern's dimensions, bead count and colors
//! - `bead play` - Announce a pattern bead by bead in the terminal
//! - `bead embed` - Store pattern markup inside a PNG image
//!
//! # Usage
//!
//! ```bash
//! # Inspect a pattern (markup or PNG)
//! bead info flower.png --chunks
//!
//! # Play the built-in demo at 2 seconds per bead
//! bead play --speed 2
//!
//! # Bundle markup into a preview image
//! bead embed preview.png flower.xbp -o flower.png --compress
//! ```

mod cue_log;
mod demo;
mod embed;
mod info;
mod play;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Bead CLI - play and inspect BeadReader patterns
#[derive(Parser)]
#[command(name = "bead")]
#[command(about = "Play and inspect BeadReader patterns")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pattern details
    Info(info::InfoArgs),

    /// Announce a pattern bead by bead
    Play(play::PlayArgs),

    /// Embed pattern markup into a PNG image
    Embed(embed::EmbedArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => info::execute(args),
        Commands::Play(args) => play::execute(args),
        Commands::Embed(args) => embed::execute(args),
    }
}
