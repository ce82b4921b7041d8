use pwmctl_transport::Transport;
use tracing::{debug, info, warn};

use crate::codec::{ControlCommand, ThrottleCommand};
use crate::error::{CommandError, Result};
use crate::motor::{acquire_motor, MotorId};

/// The command-sending handle for one firmware link.
///
/// Sending [`ControlCommand::Kill`] latches the handle: every later non-kill
/// command fails with [`CommandError::PoisonedAfterKill`] without touching
/// the transport. The latch is set as soon as a kill is attempted, even if
/// the write itself fails.
pub struct MotorController<T> {
    transport: T,
    killed: bool,
}

impl<T: Transport> MotorController<T> {
    /// Create a controller that writes to `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            killed: false,
        }
    }

    /// Validate a motor identifier for use with this controller.
    pub fn motor(&self, id: &str) -> Result<MotorId> {
        acquire_motor(id)
    }

    /// Set one motor's throttle, as a percentage in `[0, 100]`.
    pub fn set_throttle(&mut self, motor: MotorId, percent: f64) -> Result<()> {
        let throttle = ThrottleCommand::new(motor, percent)?;
        self.send(&ControlCommand::Throttle(throttle))
    }

    /// Reset every throttle to zero with one opcode.
    pub fn reset(&mut self) -> Result<()> {
        self.send(&ControlCommand::ResetAll)
    }

    /// Trigger the firmware kill switch. The controller stays poisoned
    /// afterwards.
    pub fn kill(&mut self) -> Result<()> {
        self.send(&ControlCommand::Kill)
    }

    /// Encode and write one command.
    pub fn send(&mut self, command: &ControlCommand) -> Result<()> {
        if command.is_kill() {
            if !self.killed {
                info!("sending kill switch; link is now poisoned");
            }
            self.killed = true;
        } else if self.killed {
            warn!(?command, "refusing command after kill");
            return Err(CommandError::PoisonedAfterKill);
        }

        let bytes = command.to_bytes();
        self.transport.write(&bytes)?;
        debug!(?command, len = bytes.len(), "sent command");
        Ok(())
    }

    /// Whether kill has been sent on this controller.
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the controller and return the inner transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
