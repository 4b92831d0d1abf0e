// Commandline argument parsers using clap for the AnnotScope binaries

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
/// Replay recorded session logs and write per-technique tables and charts
pub struct ExtractArgs {
    /// Paths of the recorded session logs to analyze
    #[arg(required = true)]
    pub logs: Vec<PathBuf>,

    /// Directory the tables and charts are written into
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output: PathBuf,

    /// Optional RON run-configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Confidence level for the reported intervals
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Number of bootstrap resamples per statistic
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Seed for the resampling random source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abort the whole batch when a log fails to parse, instead of
    /// skipping the offending file
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
/// Generate a labeled synthetic point-cloud dataset file
pub struct GenCloudArgs {
    #[command(subcommand)]
    /// Which structure shape to bury in the noise
    pub shape: ShapeCommand,

    /// Filename for the dataset to be written to
    #[arg(short = 'o', long = "out", default_value = "cloud.cp")]
    pub outfile: PathBuf,

    /// Number of noise points around the structure
    #[arg(long = "noise", default_value_t = 40_000)]
    pub noise_count: usize,

    /// Number of points forming the structure
    #[arg(long = "structure", default_value_t = 100_000)]
    pub structure_count: usize,

    /// Half-extent of the noise box on every axis
    #[arg(long, default_value_t = 0.5)]
    pub extent: f32,

    /// Seed for the point generators
    #[arg(long, default_value_t = 2020)]
    pub seed: u64,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ShapeCommand {
    /// A tube coiled around the z axis
    #[command(about)]
    Spring(SpringCommand),

    /// A solid ball
    #[command(about)]
    Ball(BallCommand),
}

#[derive(Debug, Args, Clone)]
#[command(version, about)]
pub struct SpringCommand {
    /// Radius of the coiled tube
    #[arg(long = "small-radius", default_value_t = 0.10)]
    pub small_radius: f32,

    /// Distance of the tube's center line from the z axis
    #[arg(long = "big-radius", default_value_t = 0.25)]
    pub big_radius: f32,

    /// Total extent of the coil along z
    #[arg(short = 'l', long, default_value_t = 1.0)]
    pub length: f32,

    /// Number of turns
    #[arg(short = 'r', long = "rounds", default_value_t = 3)]
    pub nb_round: u32,
}

#[derive(Debug, Args, Clone)]
#[command(version, about)]
pub struct BallCommand {
    /// Radius of the ball
    #[arg(long, default_value_t = 0.25)]
    pub radius: f32,
}
