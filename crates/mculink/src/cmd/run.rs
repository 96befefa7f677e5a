use std::fs::OpenOptions;

use mculink_frame::caps::{self, capability_name};
use mculink_frame::Frame;
use mculink_gateway::{Capability, Gateway, LinkHandle};

use crate::cmd::RunArgs;
use crate::exit::{io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_frame, OutputFormat};

/// Stand-in capability that prints every frame addressed to its ID.
///
/// The real peripheral handlers (ADC access, audio pipelines, NMEA parsing)
/// live outside this tool; the monitor exercises the full framing and
/// dispatch path against live hardware.
struct MonitorCap {
    id: u8,
    format: OutputFormat,
}

impl Capability for MonitorCap {
    fn name(&self) -> &str {
        capability_name(self.id)
    }

    fn handle(&mut self, _link: &LinkHandle, payload: &[u8]) -> mculink_gateway::Result<()> {
        print_frame(&Frame::new(self.id, payload.to_vec()), self.format);
        Ok(())
    }
}

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let device = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&args.device)
        .map_err(|err| io_error(&format!("failed opening {}", args.device.display()), err))?;
    let writer = device
        .try_clone()
        .map_err(|err| io_error("failed cloning device handle", err))?;

    let ids = args.ids.unwrap_or_else(|| {
        vec![
            caps::ANTENNA,
            caps::HORIZON,
            caps::ANTENNA_SWITCH,
            caps::AUDIO,
            caps::SUSPEND,
        ]
    });

    let mut builder = Gateway::builder();
    for id in ids {
        builder = builder.capability(id, Box::new(MonitorCap { id, format }));
    }
    let mut gateway = builder.build(device, writer);

    let shutdown = gateway.shutdown_handle();
    ctrlc::set_handler(move || shutdown.shutdown()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })?;

    gateway.run();
    Ok(SUCCESS)
}
