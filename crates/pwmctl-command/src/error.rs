use pwmctl_transport::TransportError;

/// Errors that can occur when building or sending commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Throttle percentage outside `[0, 100]` (or not a number).
    #[error("invalid throttle percentage {percent} (expected 0 to 100)")]
    InvalidArgument { percent: f64 },

    /// The motor identifier names no PWM output.
    #[error("invalid motor '{0}' (expected one of A, B, C, D)")]
    InvalidMotor(String),

    /// The kill switch was sent on this link; only kill may follow.
    #[error("link was killed; refusing to send further commands")]
    PoisonedAfterKill,

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, CommandError>;
