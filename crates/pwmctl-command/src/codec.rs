use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CommandError, Result};
use crate::motor::MotorId;

/// Opcode that resets every throttle to zero.
pub const RESET_ALL: u8 = 0x20;

/// Opcode that stops all PWM output and latches the firmware off.
pub const KILL: u8 = 0x5C;

/// Separates the motor identifier from the percentage.
pub const THROTTLE_SEPARATOR: u8 = b'.';

/// Terminates a throttle command.
pub const THROTTLE_TERMINATOR: u8 = b'\r';

/// Lowest accepted throttle percentage.
pub const MIN_PERCENT: f64 = 0.0;

/// Highest accepted throttle percentage.
pub const MAX_PERCENT: f64 = 100.0;

/// A validated throttle setting for one motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleCommand {
    motor: MotorId,
    percent: f64,
}

impl ThrottleCommand {
    /// Validate `percent` against `[0, 100]`. NaN is rejected.
    pub fn new(motor: MotorId, percent: f64) -> Result<Self> {
        if !(MIN_PERCENT..=MAX_PERCENT).contains(&percent) {
            return Err(CommandError::InvalidArgument { percent });
        }
        // -0.0 would otherwise print as "-0".
        let percent = percent + 0.0;
        Ok(Self { motor, percent })
    }

    pub fn motor(&self) -> MotorId {
        self.motor
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }
}

/// Every command the host can send. There is no decode counterpart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    Throttle(ThrottleCommand),
    ResetAll,
    Kill,
}

impl ControlCommand {
    /// Append the wire bytes of this command to `dst`.
    ///
    /// Wire format:
    /// ```text
    /// Throttle  <motor> '.' <percent, plain decimal> '\r'   e.g. "A.37.5\r"
    /// ResetAll  0x20
    /// Kill      0x5C
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            ControlCommand::Throttle(throttle) => {
                // f64 Display never uses exponent notation.
                let percent = throttle.percent.to_string();
                dst.reserve(throttle.motor.as_str().len() + percent.len() + 2);
                dst.put_slice(throttle.motor.as_str().as_bytes());
                dst.put_u8(THROTTLE_SEPARATOR);
                dst.put_slice(percent.as_bytes());
                dst.put_u8(THROTTLE_TERMINATOR);
            }
            ControlCommand::ResetAll => dst.put_u8(RESET_ALL),
            ControlCommand::Kill => dst.put_u8(KILL),
        }
    }

    /// The wire bytes of this command.
    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst.freeze()
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, ControlCommand::Kill)
    }
}

impl From<ThrottleCommand> for ControlCommand {
    fn from(throttle: ThrottleCommand) -> Self {
        ControlCommand::Throttle(throttle)
    }
}

/// Encode a throttle command, validating the percentage first.
pub fn encode_throttle(motor: MotorId, percent: f64) -> Result<Bytes> {
    Ok(ControlCommand::from(ThrottleCommand::new(motor, percent)?).to_bytes())
}

/// Encode the reset-all command.
pub fn encode_reset() -> Bytes {
    ControlCommand::ResetAll.to_bytes()
}

/// Encode the kill command.
pub fn encode_kill() -> Bytes {
    ControlCommand::Kill.to_bytes()
}
