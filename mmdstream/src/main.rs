use std::io::Write;

use anyhow::Result;
use mmdstream::{controller, device, display, CliArgs, Event, StartImpl};

fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();

    if args.version {
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        writeln!(
            stdout,
            concat!(env!("CARGO_BIN_NAME"), " ", env!("CARGO_PKG_VERSION")),
        )?;
        return Ok(());
    }

    tracing_subscriber::fmt::init();

    let cfg = args.run_config()?;
    let dev = match args.simulate {
        true => None,
        false => Some(device::open_first()?),
    };

    let (tx_event, rx_event) = flume::unbounded();
    let (tx_display, rx_display) = flume::unbounded();

    let sink = display::main(rx_display);

    let tx_tick = tx_event.clone();
    std::thread::spawn(move || -> Result<()> {
        controller::main(dev, rx_event, tx_tick, tx_display)?;
        Ok(())
    });

    tx_event.send(Event::Configure(cfg))?;
    let (tx_started, rx_started) = flume::unbounded();
    tx_event.send(Event::Start(StartImpl { tx: tx_started }))?;
    rx_started.recv()??;

    // Runs until a stop condition fires; without one, detection
    // continues until the process is killed.
    sink.join().expect("display sink panicked");
    Ok(())
}
