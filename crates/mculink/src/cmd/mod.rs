use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod run;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the gateway against a serial device.
    Run(RunArgs),
    /// Encode and send a single frame.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn dispatch(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device to open (e.g. /dev/ttyUSB0). Must already be
    /// configured; baud setup is outside this tool.
    pub device: PathBuf,
    /// Capability IDs to monitor (comma-separated). Default: the built-in
    /// peripheral set (1-5).
    #[arg(long, value_delimiter = ',')]
    pub ids: Option<Vec<u8>>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device to open.
    pub device: PathBuf,
    /// Capability ID to address.
    #[arg(long, short = 'i', default_value = "1")]
    pub id: u8,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex-encoded payload (e.g. aabb01).
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
