//! Host-side motor control and IMU streaming for the pwm-control firmware.
//!
//! pwmctl drives the firmware over one serial byte stream: it sends throttle,
//! reset and kill commands, and reads back a continuous stream of
//! accelerometer, gyroscope and magnetometer readings.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte-stream transport abstraction (tty ports, shared links)
//! - [`frame`]: Delimiter framing and reading decoding
//! - [`command`]: Throttle/reset/kill encoding and the motor controller
//! - [`stream`]: Priming, filtering and iterating readings
//!
//! ```no_run
//! # #[cfg(unix)]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pwmctl::command::MotorController;
//! use pwmctl::frame::ReadingKind;
//! use pwmctl::stream::ReadingStream;
//! use pwmctl::transport::{IoTransport, SharedTransport, TtyPort};
//!
//! let link = SharedTransport::new(IoTransport::new(TtyPort::open("/dev/ttyACM0")?));
//!
//! let mut motors = MotorController::new(link.clone());
//! let motor = motors.motor("A")?;
//! motors.set_throttle(motor, 37.0)?;
//!
//! let mut imu = ReadingStream::new(link);
//! imu.disable([ReadingKind::Mag])?;
//! for reading in imu.stream()?.take(10) {
//!     let reading = reading?;
//!     println!("{}: ({}, {}, {})", reading.kind, reading.x, reading.y, reading.z);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(unix))]
//! # fn main() {}
//! ```

/// Re-export transport types.
pub mod transport {
    pub use pwmctl_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use pwmctl_frame::*;
}

/// Re-export command types.
pub mod command {
    pub use pwmctl_command::*;
}

/// Re-export stream types.
pub mod stream {
    pub use pwmctl_stream::*;
}
