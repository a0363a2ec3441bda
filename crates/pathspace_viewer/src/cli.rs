use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pathspace")]
#[command(about = "Progressive CPU path tracer")]
pub struct Args {
    /// Render settings file (JSON); built-in defaults when omitted
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Scene description file (JSON); the demo box when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Snapshot image written at window resolution
    #[arg(short, long, default_value = "pathspace.png")]
    pub output: PathBuf,

    /// Seconds between snapshots
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    /// Total render time in seconds
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f64,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Override the worker thread count
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Override the sampler seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Lock each pixel while accumulating
    #[arg(long)]
    pub strict: bool,
}
