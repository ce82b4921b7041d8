use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("pwmctl {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: pwmctl");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("PWMCTL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("serial_ports: {}", cfg!(unix));
    println!("frame_delimiter: {:#04x}", pwmctl::frame::FRAME_DELIMITER);
    println!(
        "priming_attempts: {}",
        pwmctl::stream::DEFAULT_MAX_ATTEMPTS
    );

    Ok(SUCCESS)
}
