//! Play command - announce a pattern in the terminal
//!
//! Playback starts immediately. While it runs, one-letter commands are read
//! from stdin:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `p`     | Pause / resume (restarts a completed pattern) |
//! | `s <n>` | Seek to bead `n` while paused |
//! | `r`     | Reset to the first bead |
//! | `+`/`-` | Slower / faster by 0.5 s per bead |
//! | `q`     | Quit |
//!
//! Speed changes made with `+`/`-` are saved to `config.toml` on exit.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use beadreader_core::{PlaybackConfig, PlaybackStatus, Progress, Scheduler, config};
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::watch;

use crate::cue_log::LogCuePlayer;
use crate::demo;

/// Speed change per `+`/`-` keypress, in seconds per bead
const SPEED_STEP: f64 = 0.5;

/// Arguments for the play command
#[derive(Args)]
pub struct PlayArgs {
    /// Pattern file (markup or PNG); plays the built-in demo when omitted
    pub file: Option<PathBuf>,

    /// Seconds per bead (overrides config.toml)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Simulated length of each spoken cue, in milliseconds
    #[arg(long, default_value_t = 600)]
    pub cue_ms: u64,
}

/// A line of stdin input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Toggle,
    Seek(usize),
    Reset,
    Slower,
    Faster,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "p" => Command::Toggle,
        "s" => Command::Seek(words.next()?.parse().ok()?),
        "r" => Command::Reset,
        "+" => Command::Slower,
        "-" => Command::Faster,
        "q" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Execute the play command
pub fn execute(args: PlayArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(run(args, tokio::io::stdin()));

    // A pending stdin read would otherwise hold shutdown until the next line
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

/// Play until `q`, or until input ends and playback is no longer running.
async fn run<R>(args: PlayArgs, input: R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let pattern = match &args.file {
        Some(path) => beadreader_core::load_from_path(path)
            .await
            .with_context(|| format!("Failed to load pattern from {}", path.display()))?,
        None => demo::pattern(),
    };

    let mut config = config::load();
    if let Some(speed) = args.speed {
        config.playback.speed = speed;
    }
    let (settings, pacing) = watch::channel(config.playback.clone());

    let cues = LogCuePlayer::new(Duration::from_millis(args.cue_ms));
    let scheduler = Scheduler::new(pattern, cues, pacing);

    println!("=== {} ===", scheduler.pattern().name());
    println!(
        "  {} beads, {:.1}s per bead",
        scheduler.progress().bead_count,
        settings.borrow().speed()
    );
    println!("  Commands: p pause/resume, s <n> seek, r reset, +/- speed, q quit");

    let mut progress = scheduler.subscribe();
    let mut lines = BufReader::new(input).lines();
    let mut stdin_open = true;
    let mut speed_changed = false;

    scheduler.play();

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    // Without input, only a running pattern is worth waiting for
                    stdin_open = false;
                    if scheduler.status() != PlaybackStatus::Playing {
                        break;
                    }
                    continue;
                };
                let Some(command) = parse_command(&line) else {
                    if !line.trim().is_empty() {
                        println!("  Unknown command: {}", line.trim());
                    }
                    continue;
                };

                match command {
                    Command::Quit => break,
                    Command::Toggle => scheduler.toggle(),
                    Command::Reset => scheduler.reset(),
                    Command::Seek(id) => {
                        if !scheduler.seek(id) {
                            println!(
                                "  Seek needs a paused player and a bead below {}",
                                scheduler.progress().bead_count
                            );
                        }
                    }
                    Command::Slower | Command::Faster => {
                        let delta = match command {
                            Command::Slower => SPEED_STEP,
                            _ => -SPEED_STEP,
                        };
                        settings.send_modify(|playback| playback.nudge_speed(delta));
                        speed_changed = true;
                        println!("  Speed: {:.1}s per bead", settings.borrow().speed());
                    }
                }
            }
            changed = progress.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = progress.borrow_and_update().clone();
                report(&scheduler, &snapshot);
                if !stdin_open && snapshot.status != PlaybackStatus::Playing {
                    break;
                }
            }
        }
    }

    scheduler.pause();

    if speed_changed {
        let playback: PlaybackConfig = settings.borrow().clone();
        config.playback = playback;
        if let Err(e) = config::save(&config) {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    Ok(())
}

fn report<C, P>(scheduler: &Scheduler<C, P>, progress: &Progress)
where
    C: beadreader_core::CuePlayer,
    P: beadreader_core::Pacing,
{
    let position = format!("[{}/{}]", progress.read_count, progress.bead_count);
    match progress.status {
        PlaybackStatus::Playing | PlaybackStatus::Paused => {
            let label = if progress.status == PlaybackStatus::Playing {
                "Playing"
            } else {
                "Paused"
            };
            match scheduler.current_bead() {
                Some(bead) => println!(
                    "{} {} bead {}: {} x{}",
                    position, label, bead.id, bead.color, bead.count
                ),
                None => println!("{} {}", position, label),
            }
        }
        PlaybackStatus::Finished => {
            println!("{} Pattern complete (p to play again, q to quit)", position)
        }
        PlaybackStatus::Idle => println!("{} Reset to the first bead", position),
    }
}
