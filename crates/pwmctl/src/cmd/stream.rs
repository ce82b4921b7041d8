use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pwmctl::frame::PostcardDecoder;
use pwmctl::stream::{ReadingStream, StreamConfig, SyncConfig};
use pwmctl::transport::{PortCloser, Transport};
use tracing::info;

use crate::cmd::{open_transport, StreamArgs};
use crate::exit::{stream_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{OutputFormat, ReadingPrinter};

pub fn run(args: StreamArgs, format: OutputFormat) -> CliResult<i32> {
    let transport = open_transport(&args.port)?;
    let closer = transport.closer();
    let config = StreamConfig {
        sync: SyncConfig {
            max_attempts: args.max_retries,
        },
    };
    let mut stream = ReadingStream::with_config(transport, PostcardDecoder, config);

    stream
        .disable(args.disable.iter().copied())
        .map_err(|err| stream_error("invalid --disable", err))?;
    stream.enable(args.enable.iter().copied());

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone(), closer)?;

    let mut printer = ReadingPrinter::new(format);
    let result = print_readings(&mut stream, &mut printer, args.count, &running);
    printer.finish();

    match result {
        Ok(printed) => {
            info!(printed, "stream stopped");
            Ok(SUCCESS)
        }
        // Ctrl-C closes the link, which ends a blocked read with an error.
        Err(err) if !running.load(Ordering::SeqCst) => {
            info!(%err, "stream interrupted");
            Ok(SUCCESS)
        }
        Err(err) => Err(err),
    }
}

fn print_readings<T: Transport>(
    stream: &mut ReadingStream<T>,
    printer: &mut ReadingPrinter,
    count: Option<usize>,
    running: &AtomicBool,
) -> CliResult<usize> {
    stream
        .start()
        .map_err(|err| stream_error("priming failed", err))?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        if count.is_some_and(|count| printed >= count) {
            break;
        }

        let reading = stream
            .next_reading()
            .map_err(|err| stream_error("stream failed", err))?;
        printer.print(&reading);
        printed = printed.saturating_add(1);
    }
    Ok(printed)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>, closer: Option<PortCloser>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
        if let Some(closer) = &closer {
            closer.close();
        }
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
