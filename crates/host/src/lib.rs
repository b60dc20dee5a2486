//! Irrigation Controller Host
//!
//! Runs the controller against a real serial link. Valves, sensors and the
//! status light are simulated, so the protocol can be exercised from any
//! terminal program without a board attached.

mod error;
mod settings;

pub use error::HostError;
pub use settings::{SerialSettings, Settings};

use controller::sim::{SimBoard, SimClock};
use controller::{Controller, Peripheral, Valve};
use std::str::FromStr;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging at `level` ("error", "warn", "info", "debug", "trace")
pub fn init_logging(level: &str) -> Result<(), HostError> {
    let level = Level::from_str(level).map_err(|_| HostError::LogLevel(level.to_string()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| HostError::Logging(e.to_string()))
}

/// Open the configured serial port and serve it until Ctrl-C
pub async fn run(settings: Settings) -> Result<(), HostError> {
    info!(
        "Opening {} at {} baud",
        settings.serial.device, settings.serial.baud_rate
    );
    let port = tokio_serial::new(&settings.serial.device, settings.serial.baud_rate)
        .open_native_async()?;

    tokio::select! {
        result = serve(port, &settings) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

/// Run the controller over `link` until the peer closes it.
///
/// Received bytes go straight into the controller; every tick the pending
/// output is offered to the link and the board is polled.
pub async fn serve<T>(link: T, settings: &Settings) -> Result<(), HostError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(link);

    let started = Instant::now();
    let clock = SimClock::new();
    let board = SimBoard::simulated(&clock, settings.sensor_max_age());
    let mut controller: Controller<_, _, _, _> = Controller::new(board, settings.controller.clone());
    controller.init();

    let mut ticker = tokio::time::interval(settings.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_sample: Option<u64> = None;

    loop {
        tokio::select! {
            received = reader.read(controller.read_buffer()) => {
                let len = received?;
                if len == 0 {
                    info!("Link closed by peer");
                    return Ok(());
                }
                clock.set(elapsed_us(started));
                debug!("Received {} bytes", len);
                controller.read_done(len);
            }
            _ = ticker.tick() => {
                clock.set(elapsed_us(started));

                let pending = controller.write_buffer();
                if !pending.is_empty() {
                    let sent = writer.write(pending).await?;
                    controller.write_done(sent);
                }

                let second = started.elapsed().as_secs();
                if last_sample != Some(second) {
                    sample_sensors(controller.board_mut(), second);
                    last_sample = Some(second);
                }
                controller.periodic();
            }
        }
    }
}

/// Feed the simulated sensors: moisture drifts slowly, flow follows the valves
pub fn sample_sensors(board: &mut SimBoard, second: u64) {
    for (channel, probe) in board.moisture.iter_mut().enumerate() {
        let phase = (second + channel as u64 * 30) % 60;
        probe.sample(450 + phase as i32);
    }
    for (valve, meter) in board.valves.iter().zip(board.flow.iter_mut()) {
        let rate = if valve.get() { 12 } else { 0 };
        debug!("{} flow {}", meter.name(), rate);
        meter.sample(rate);
    }
}

fn elapsed_us(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}
