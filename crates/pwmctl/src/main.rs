mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "pwmctl",
    version,
    about = "Drive pwm-control motors and stream IMU readings"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use pwmctl::frame::ReadingKind;

    use super::*;

    #[test]
    fn parses_throttle_subcommand() {
        let cli = Cli::try_parse_from(["pwmctl", "throttle", "/dev/ttyACM0", "B", "42.5"])
            .expect("throttle args should parse");

        match cli.command {
            Command::Throttle(args) => {
                assert_eq!(args.motor, "B");
                assert_eq!(args.percent, 42.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_percent_reaches_the_encoder() {
        let cli = Cli::try_parse_from(["pwmctl", "throttle", "/dev/ttyACM0", "A", "-5"])
            .expect("negative percent should parse");
        assert!(matches!(cli.command, Command::Throttle(args) if args.percent == -5.0));
    }

    #[test]
    fn parses_stream_filters() {
        let cli = Cli::try_parse_from([
            "pwmctl",
            "stream",
            "/dev/ttyACM0",
            "--disable",
            "gyro,mag",
            "--count",
            "10",
        ])
        .expect("stream args should parse");

        match cli.command {
            Command::Stream(args) => {
                assert_eq!(args.disable, vec![ReadingKind::Gyro, ReadingKind::Mag]);
                assert!(args.enable.is_empty());
                assert_eq!(args.count, Some(10));
                assert_eq!(args.max_retries, 1000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_reading_kind() {
        let err = Cli::try_parse_from(["pwmctl", "stream", "/dev/ttyACM0", "--disable", "baro"])
            .expect_err("unknown kind should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["pwmctl", "reset", "/dev/ttyACM0", "--format", "json"])
            .expect("global flag should parse after subcommand");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Reset(_)));
    }
}
