use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use pwmctl::frame::ReadingKind;
use pwmctl::stream::DEFAULT_MAX_ATTEMPTS;
use pwmctl::transport::Transport;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod control;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set one motor's throttle.
    Throttle(ThrottleArgs),
    /// Reset every throttle to zero.
    Reset(PortArgs),
    /// Trigger the firmware kill switch.
    Kill(PortArgs),
    /// Prime the link and print IMU readings.
    Stream(StreamArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Throttle(args) => control::throttle(args, format),
        Command::Reset(args) => control::reset(args, format),
        Command::Kill(args) => control::kill(args, format),
        Command::Stream(args) => stream::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct PortArgs {
    /// Serial device of the firmware (e.g. /dev/ttyACM0).
    pub port: PathBuf,
}

#[derive(Args, Debug)]
pub struct ThrottleArgs {
    /// Serial device of the firmware (e.g. /dev/ttyACM0).
    pub port: PathBuf,
    /// Motor channel: A, B, C or D.
    pub motor: String,
    /// Throttle percentage in [0, 100].
    #[arg(allow_negative_numbers = true)]
    pub percent: f64,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Serial device of the firmware (e.g. /dev/ttyACM0).
    pub port: PathBuf,
    /// Reading kinds to drop (comma-separated: acc, gyro, mag).
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<ReadingKind>,
    /// Reading kinds to let through again, applied after --disable.
    #[arg(long, value_delimiter = ',')]
    pub enable: Vec<ReadingKind>,
    /// Exit after printing N readings.
    #[arg(long)]
    pub count: Option<usize>,
    /// Frames to try before giving up on priming.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_retries: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open the firmware link on `port`.
#[cfg(unix)]
pub fn open_transport(port: &Path) -> CliResult<Box<dyn Transport>> {
    use pwmctl::transport::{IoTransport, TtyPort};

    let tty = TtyPort::open(port).map_err(|err| {
        crate::exit::transport_error(&format!("failed opening {}", port.display()), err)
    })?;
    Ok(Box::new(IoTransport::new(tty)))
}

#[cfg(not(unix))]
pub fn open_transport(port: &Path) -> CliResult<Box<dyn Transport>> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!(
            "failed opening {}: serial ports are only supported on unix",
            port.display()
        ),
    ))
}
