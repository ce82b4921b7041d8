//! Command encoding for the pwm-control firmware.
//!
//! Three commands exist on the wire:
//! - throttle: ASCII `"<motor>.<percent>\r"`, e.g. `"A.37.5\r"`
//! - reset all throttles: the single byte `0x20`
//! - kill switch: the single byte `0x5C`
//!
//! [`MotorController`] writes them to a transport and refuses everything but
//! another kill once the kill switch has been sent.

pub mod codec;
pub mod controller;
pub mod error;
pub mod motor;

pub use codec::{
    encode_kill, encode_reset, encode_throttle, ControlCommand, ThrottleCommand, KILL,
    MAX_PERCENT, MIN_PERCENT, RESET_ALL, THROTTLE_SEPARATOR, THROTTLE_TERMINATOR,
};
pub use controller::MotorController;
pub use error::{CommandError, Result};
pub use motor::{acquire_motor, MotorId};
