//! Indicator State Resolution

use serde::{Deserialize, Serialize};

/// What the status light shows; the discriminant is reported by `S`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IndicatorState {
    /// Host traffic seen within the liveness window
    Connected = 0,
    /// No host traffic for longer than the liveness window
    #[default]
    Disconnected = 1,
    Valve0On = 2,
    Valve1On = 3,
    BothValvesOn = 4,
}

impl IndicatorState {
    /// Pick the state to show.
    ///
    /// Valve activity takes priority over link liveness.
    pub fn resolve(valve0_on: bool, valve1_on: bool, deadline_passed: bool) -> Self {
        match (valve0_on, valve1_on) {
            (true, true) => IndicatorState::BothValvesOn,
            (true, false) => IndicatorState::Valve0On,
            (false, true) => IndicatorState::Valve1On,
            (false, false) if deadline_passed => IndicatorState::Disconnected,
            (false, false) => IndicatorState::Connected,
        }
    }

    /// Numeric code used on the wire
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_priority() {
        use IndicatorState::*;
        assert_eq!(IndicatorState::resolve(true, true, true), BothValvesOn);
        assert_eq!(IndicatorState::resolve(true, false, true), Valve0On);
        assert_eq!(IndicatorState::resolve(false, true, true), Valve1On);
        assert_eq!(IndicatorState::resolve(false, false, true), Disconnected);
        assert_eq!(IndicatorState::resolve(false, false, false), Connected);
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(IndicatorState::Connected.as_u8(), 0);
        assert_eq!(IndicatorState::Disconnected.as_u8(), 1);
        assert_eq!(IndicatorState::BothValvesOn.as_u8(), 4);
    }
}
