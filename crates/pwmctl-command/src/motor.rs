use std::fmt;
use std::str::FromStr;

use crate::error::{CommandError, Result};

/// The four PWM outputs driven by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MotorId {
    A,
    B,
    C,
    D,
}

impl MotorId {
    /// Every output, in wire order.
    pub const ALL: [MotorId; 4] = [MotorId::A, MotorId::B, MotorId::C, MotorId::D];

    /// The identifier as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            MotorId::A => "A",
            MotorId::B => "B",
            MotorId::C => "C",
            MotorId::D => "D",
        }
    }
}

impl fmt::Display for MotorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotorId {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        acquire_motor(s)
    }
}

/// Validate a motor identifier.
///
/// Matching is exact: `"a"` and `" A"` are rejected.
pub fn acquire_motor(id: &str) -> Result<MotorId> {
    match id {
        "A" => Ok(MotorId::A),
        "B" => Ok(MotorId::B),
        "C" => Ok(MotorId::C),
        "D" => Ok(MotorId::D),
        other => Err(CommandError::InvalidMotor(other.to_string())),
    }
}
