//! Simulated Hardware
//!
//! Software stand-ins for the valves, sensors, status light and device
//! services. Used by the tests and by the host binary when no real board is
//! attached. Every simulated part shares one manually advanced clock.

use crate::board::Board;
use crate::hardware::{Device, Indicator, Peripheral, Sensor, Valve};
use crate::indicator::IndicatorState;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Shared monotonic microsecond clock
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_us: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.now_us.set(self.now_us.get().saturating_add(by));
    }

    /// Jump to an absolute time; never moves backwards
    pub fn set(&self, now_us: u64) {
        self.now_us.set(self.now_us.get().max(now_us));
    }
}

/// Valve that stays open for `duration * unit` after a pulse
#[derive(Debug)]
pub struct SimValve {
    name: String,
    clock: SimClock,
    unit: Duration,
    open_until_us: u64,
    open: bool,
    last_pulse: Option<u16>,
}

impl SimValve {
    /// Valve whose pulse durations count whole seconds
    pub fn new(name: &str, clock: SimClock) -> Self {
        Self::with_unit(name, clock, Duration::from_secs(1))
    }

    pub fn with_unit(name: &str, clock: SimClock, unit: Duration) -> Self {
        Self {
            name: name.to_string(),
            clock,
            unit,
            open_until_us: 0,
            open: false,
            last_pulse: None,
        }
    }

    /// Duration of the most recent pulse, if any
    pub fn last_pulse(&self) -> Option<u16> {
        self.last_pulse
    }
}

impl Peripheral for SimValve {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {
        self.open = false;
        self.open_until_us = 0;
    }

    fn periodic(&mut self) {
        if self.open && self.clock.now_us() >= self.open_until_us {
            debug!("{} closed", self.name);
            self.open = false;
        }
    }
}

impl Valve for SimValve {
    fn get(&self) -> bool {
        self.open
    }

    fn pulse(&mut self, duration: u16) {
        let length = self.unit.saturating_mul(u32::from(duration));
        let length_us = u64::try_from(length.as_micros()).unwrap_or(u64::MAX);
        self.open_until_us = self.clock.now_us().saturating_add(length_us);
        self.open = duration > 0;
        self.last_pulse = Some(duration);
    }
}

/// Sensor whose reading goes stale when not refreshed within `max_age`
#[derive(Debug)]
pub struct SimSensor {
    name: String,
    clock: SimClock,
    max_age: Duration,
    value: i32,
    sampled_at_us: Option<u64>,
    fresh: bool,
}

impl SimSensor {
    pub fn new(name: &str, clock: SimClock, max_age: Duration) -> Self {
        Self {
            name: name.to_string(),
            clock,
            max_age,
            value: 0,
            sampled_at_us: None,
            fresh: false,
        }
    }

    /// Record a new sample at the current time
    pub fn sample(&mut self, value: i32) {
        self.value = value;
        self.sampled_at_us = Some(self.clock.now_us());
        self.fresh = true;
    }
}

impl Peripheral for SimSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn periodic(&mut self) {
        let max_age_us = u64::try_from(self.max_age.as_micros()).unwrap_or(u64::MAX);
        self.fresh = self
            .sampled_at_us
            .is_some_and(|at| self.clock.now_us().saturating_sub(at) <= max_age_us);
    }
}

impl Sensor for SimSensor {
    fn value(&self) -> i32 {
        self.value
    }

    fn updated(&self) -> bool {
        self.fresh
    }
}

/// Status light that only remembers its state
#[derive(Debug, Default)]
pub struct SimIndicator {
    state: IndicatorState,
    changes: usize,
}

impl SimIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of state changes seen
    pub fn changes(&self) -> usize {
        self.changes
    }
}

impl Peripheral for SimIndicator {
    fn name(&self) -> &str {
        "LED"
    }
}

impl Indicator for SimIndicator {
    fn set_state(&mut self, state: IndicatorState) {
        if state != self.state {
            self.changes += 1;
        }
        self.state = state;
    }

    fn state(&self) -> IndicatorState {
        self.state
    }
}

/// Clock plus recorded reset requests
#[derive(Debug, Default)]
pub struct SimDevice {
    clock: SimClock,
    firmware_update_requested: bool,
    reboot_delay_ms: Option<u32>,
}

impl SimDevice {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            ..Default::default()
        }
    }

    pub fn firmware_update_requested(&self) -> bool {
        self.firmware_update_requested
    }

    /// Delay of the requested reboot, if one was requested
    pub fn reboot_requested(&self) -> Option<u32> {
        self.reboot_delay_ms
    }
}

impl Device for SimDevice {
    fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    fn enter_firmware_update(&mut self) {
        self.firmware_update_requested = true;
    }

    fn reboot(&mut self, delay_ms: u32) {
        self.reboot_delay_ms = Some(delay_ms);
    }
}

/// Fully simulated board
pub type SimBoard = Board<SimValve, SimSensor, SimIndicator, SimDevice>;

impl SimBoard {
    /// Build a simulated board on `clock`; sensors go stale after `max_age`
    pub fn simulated(clock: &SimClock, max_age: Duration) -> Self {
        let sensor = |name: &str| SimSensor::new(name, clock.clone(), max_age);
        Board {
            valves: [
                SimValve::new("VALVE0", clock.clone()),
                SimValve::new("VALVE1", clock.clone()),
            ],
            moisture: [sensor("MOISTURE0"), sensor("MOISTURE1")],
            flow: [sensor("FLOW0"), sensor("FLOW1")],
            indicator: SimIndicator::new(),
            device: SimDevice::new(clock.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valve_closes_after_pulse() {
        let clock = SimClock::new();
        let mut valve = SimValve::with_unit("V", clock.clone(), Duration::from_millis(10));
        valve.pulse(5);
        assert!(valve.get());

        clock.advance(Duration::from_millis(49));
        valve.periodic();
        assert!(valve.get());

        clock.advance(Duration::from_millis(1));
        valve.periodic();
        assert!(!valve.get());
        assert_eq!(valve.last_pulse(), Some(5));
    }

    #[test]
    fn test_zero_pulse_keeps_valve_closed() {
        let clock = SimClock::new();
        let mut valve = SimValve::new("V", clock);
        valve.pulse(0);
        assert!(!valve.get());
    }

    #[test]
    fn test_sensor_goes_stale() {
        let clock = SimClock::new();
        let mut sensor = SimSensor::new("M", clock.clone(), Duration::from_secs(2));
        assert!(!sensor.updated());

        sensor.sample(480);
        assert!(sensor.updated());
        clock.advance(Duration::from_secs(3));
        sensor.periodic();
        assert!(!sensor.updated());
        assert_eq!(sensor.value(), 480);
    }

    #[test]
    fn test_clock_never_goes_back() {
        let clock = SimClock::new();
        clock.set(500);
        clock.set(100);
        assert_eq!(clock.now_us(), 500);
    }
}
