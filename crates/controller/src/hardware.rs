//! Hardware Collaborator Traits
//!
//! Actuation timing, sensor sampling and device resets live behind these
//! traits; the controller only polls and commands them.

use crate::indicator::IndicatorState;

/// Anything the controller initializes once and polls every tick
pub trait Peripheral {
    /// Short name used in logs (e.g. "VALVE0")
    fn name(&self) -> &str;

    /// One-time setup before the first tick
    fn init(&mut self) {}

    /// Periodic housekeeping, called once per tick
    fn periodic(&mut self) {}
}

/// A solenoid valve opened by timed pulses
pub trait Valve: Peripheral {
    /// Whether the valve is currently open
    fn get(&self) -> bool;

    /// Open the valve for `duration`; the unit is the driver's choice
    fn pulse(&mut self, duration: u16);
}

/// A sampled sensor with a cached reading
pub trait Sensor: Peripheral {
    /// Last cached reading
    fn value(&self) -> i32;

    /// Whether the cached reading is fresh
    fn updated(&self) -> bool;
}

/// Status light
pub trait Indicator: Peripheral {
    fn set_state(&mut self, state: IndicatorState);
    fn state(&self) -> IndicatorState;
}

/// Device-level services: the monotonic clock and the reset paths
pub trait Device {
    /// Monotonic time in microseconds
    fn now_us(&self) -> u64;

    /// Restart into the firmware loader
    fn enter_firmware_update(&mut self);

    /// Restart after `delay_ms`
    fn reboot(&mut self, delay_ms: u32);
}
