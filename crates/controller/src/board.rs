//! Hardware Board and Command Dispatch

use crate::config::ControllerConfig;
use crate::hardware::{Device, Indicator, Peripheral, Sensor, Valve};
use irrigation_protocol::{
    acknowledge_pulse, CommandError, Reading, Request, Responder, StatusReport,
};
use tracing::{info, warn};

/// Wired moisture probes
pub const MOISTURE_CHANNELS: usize = 2;

/// Wired flow meters
pub const FLOW_CHANNELS: usize = 2;

/// Every hardware collaborator the controller drives
pub struct Board<V, S, L, D> {
    pub valves: [V; 2],
    pub moisture: [S; MOISTURE_CHANNELS],
    pub flow: [S; FLOW_CHANNELS],
    pub indicator: L,
    pub device: D,
}

impl<V, S, L, D> Board<V, S, L, D>
where
    V: Valve,
    S: Sensor,
    L: Indicator,
    D: Device,
{
    /// Initialize every peripheral, indicator first
    pub fn init(&mut self) {
        init_one(&mut self.indicator);
        self.valves.iter_mut().for_each(init_one);
        self.moisture.iter_mut().for_each(init_one);
        self.flow.iter_mut().for_each(init_one);
    }

    /// Poll every peripheral once
    pub fn periodic(&mut self) {
        self.indicator.periodic();
        self.valves.iter_mut().for_each(|v| v.periodic());
        self.moisture.iter_mut().for_each(|s| s.periodic());
        self.flow.iter_mut().for_each(|s| s.periodic());
    }

    /// Snapshot for the `S` command
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            indicator: self.indicator.state().as_u8(),
            valves: [self.valves[0].get(), self.valves[1].get()],
            moisture: self.moisture.each_ref().map(reading),
            flow: self.flow.each_ref().map(reading),
        }
    }

    /// Carry out a validated request and queue its response
    pub fn dispatch<const N: usize>(
        &mut self,
        request: Request,
        out: &mut Responder<N>,
        config: &ControllerConfig,
    ) {
        match request {
            Request::Status => {
                self.status_report().respond(out);
            }
            Request::FirmwareUpdate => {
                warn!("Restarting into firmware loader");
                self.device.enter_firmware_update();
            }
            Request::Reboot => {
                warn!("Rebooting in {} ms", config.reboot_delay_ms);
                self.device.reboot(config.reboot_delay_ms);
            }
            Request::Pulse { valve, duration } => {
                let Some(target) = self.valves.get_mut(usize::from(valve)) else {
                    warn!("Pulse refused, valve {} not installed", valve);
                    CommandError::BadValveTarget(valve).respond(out);
                    return;
                };
                info!("Pulsing {} for {}", target.name(), duration);
                target.pulse(duration);
                acknowledge_pulse(out, valve);
            }
        }
    }
}

fn init_one<P: Peripheral>(peripheral: &mut P) {
    info!("Initializing {}", peripheral.name());
    peripheral.init();
}

fn reading<S: Sensor>(sensor: &S) -> Reading {
    Reading {
        value: sensor.value(),
        fresh: sensor.updated(),
    }
}
