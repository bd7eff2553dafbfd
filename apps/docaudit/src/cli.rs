//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use docaudit_types::ColorChoice;
use std::path::PathBuf;

/// docaudit - Audit document identifiers against a remote object store
#[derive(Parser)]
#[command(name = "docaudit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit document identifiers against a remote object store")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check that every identifier in the input lists has a stored object
    #[command(alias = "v")]
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Identifier list files, or directories holding them
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Only process files for these state codes (comma-separated)
    #[arg(long, value_name = "CODES")]
    pub states: Option<String>,

    /// Maximum probes in flight
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Attempts per identifier, including the first
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Pause between attempts in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Retry 5xx responses like timeouts
    #[arg(long)]
    pub retry_server_errors: bool,

    /// Base URL of the object store
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory for missing/error reports
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}
