use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "instance-ranker")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Probe Invidious and Piped instances and write a ranked health snapshot")]
pub struct Cli {
    /// Target list (JSON array of {url, type})
    #[arg(short = 't', long = "targets")]
    pub targets: Option<PathBuf>,

    /// Snapshot output file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Configuration file (default: ~/.instance-ranker/config.toml)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Number of instances probed at once
    #[arg(short = 'j', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Hard timeout per probe attempt in milliseconds
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u32>,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Write the default configuration file
    #[arg(long = "init")]
    pub init: bool,

    /// Print the effective configuration
    #[arg(long = "print")]
    pub print: bool,

    /// Validate the configuration
    #[arg(long = "check")]
    pub check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
