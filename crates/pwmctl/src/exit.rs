use std::fmt;
use std::io;

use pwmctl_command::CommandError;
use pwmctl_stream::StreamError;
use pwmctl_transport::TransportError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => USAGE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn command_error(context: &str, err: CommandError) -> CliError {
    match err {
        CommandError::Transport(err) => transport_error(context, err),
        CommandError::InvalidArgument { .. } | CommandError::InvalidMotor(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        CommandError::PoisonedAfterKill => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    match err {
        StreamError::Transport(err) => transport_error(context, err),
        StreamError::PrimingTimeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        StreamError::Decode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        StreamError::NotEnabled(_) => CliError::new(USAGE, format!("{context}: {err}")),
        StreamError::NotStreaming(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use pwmctl_frame::{MalformedFrame, ReadingKind};

    use super::*;

    #[test]
    fn closed_link_is_plain_failure() {
        assert_eq!(transport_error("read", TransportError::Closed).code, FAILURE);
    }

    #[test]
    fn unreadable_port_is_permission_denied() {
        let err = TransportError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(transport_error("open", err).code, PERMISSION_DENIED);
    }

    #[test]
    fn missing_port_is_usage_error() {
        let err = TransportError::Io(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(transport_error("open", err).code, USAGE);
    }

    #[test]
    fn caller_mistakes_are_usage_errors() {
        let err = CommandError::InvalidArgument { percent: 101.0 };
        assert_eq!(command_error("throttle", err).code, USAGE);
        let err = StreamError::NotEnabled(ReadingKind::Mag);
        assert_eq!(stream_error("stream", err).code, USAGE);
    }

    #[test]
    fn stream_failures_map_to_distinct_codes() {
        let timeout = StreamError::PrimingTimeout { attempts: 1000 };
        let decode = StreamError::Decode(MalformedFrame::new(3, "bad"));
        assert_eq!(stream_error("stream", timeout).code, TIMEOUT);
        assert_eq!(stream_error("stream", decode).code, DATA_INVALID);
    }

    #[test]
    fn message_carries_context() {
        let err = command_error("kill", CommandError::PoisonedAfterKill);
        assert!(err.to_string().starts_with("kill: "));
    }
}
