use clap::{Args, Subcommand};
use std::path::PathBuf;

use vrlink_frame::DEFAULT_MAX_FRAMES;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod frames;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the registered frame types.
    Frames(FramesArgs),
    /// Run in-memory sessions and print the resulting peer directories.
    Simulate(SimulateArgs),
    /// Decode the envelope in a captured value stream.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Frames(args) => frames::run(args, format),
        Command::Simulate(args) => simulate::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug, Default)]
pub struct FramesArgs {}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of VR players.
    #[arg(long, default_value = "2")]
    pub vr: u16,
    /// Number of players without the protocol.
    #[arg(long, default_value = "1")]
    pub vanilla: u16,
    /// Network ticks to run.
    #[arg(long, default_value = "3")]
    pub ticks: u32,
    /// Actor number that leaves after the last tick (repeatable).
    #[arg(long, value_name = "ACTOR")]
    pub leave: Vec<i32>,
    /// Write the first VR player's last tick, encoded, to this file.
    #[arg(long, value_name = "FILE")]
    pub capture: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Captured value stream.
    pub path: PathBuf,
    /// Foreign values to skip before the envelope.
    #[arg(long, default_value = "0")]
    pub offset: usize,
    /// Largest frame count to accept.
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    pub max_frames: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
