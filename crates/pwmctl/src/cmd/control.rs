use pwmctl::command::{acquire_motor, ControlCommand, MotorController, ThrottleCommand};

use crate::cmd::{open_transport, PortArgs, ThrottleArgs};
use crate::exit::{command_error, CliResult, SUCCESS};
use crate::output::{print_sent, OutputFormat};

pub fn throttle(args: ThrottleArgs, format: OutputFormat) -> CliResult<i32> {
    // Reject bad arguments before touching the port.
    let motor = acquire_motor(&args.motor).map_err(|err| command_error("throttle", err))?;
    let throttle =
        ThrottleCommand::new(motor, args.percent).map_err(|err| command_error("throttle", err))?;

    send(&args.port, ControlCommand::Throttle(throttle), "throttle", format)
}

pub fn reset(args: PortArgs, format: OutputFormat) -> CliResult<i32> {
    send(&args.port, ControlCommand::ResetAll, "reset", format)
}

pub fn kill(args: PortArgs, format: OutputFormat) -> CliResult<i32> {
    send(&args.port, ControlCommand::Kill, "kill", format)
}

fn send(
    port: &std::path::Path,
    command: ControlCommand,
    name: &str,
    format: OutputFormat,
) -> CliResult<i32> {
    let mut controller = MotorController::new(open_transport(port)?);
    controller
        .send(&command)
        .map_err(|err| command_error(&format!("{name} failed"), err))?;

    print_sent(
        name,
        &port.display().to_string(),
        command.to_bytes().len(),
        format,
    );
    Ok(SUCCESS)
}
