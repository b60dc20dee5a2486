//! Response Lines
//!
//! Wire formats for the status report and the valve acknowledgment.

use crate::respond;
use crate::responder::{Arg, Responder};
use serde::{Deserialize, Serialize};

/// Status report format; `m2` has no sensor behind it
const STATUS_FORMAT: &str = "R{\"l\":%d,\"v0\":%d,\"v1\":%d,\"m0\":%c%d,\"m1\":%c%d,\"m2\":%c%d,\"f0\":%c%d,\"f1\":%c%d}\r\n";

/// One cached sensor reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub value: i32,
    /// Whether the sensor has a recent sample
    pub fresh: bool,
}

impl Reading {
    fn marker(&self) -> Arg<'static> {
        Arg::Char(if self.fresh { b' ' } else { b'-' })
    }
}

/// Snapshot rendered by the `S` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Indicator state number
    pub indicator: u8,
    pub valves: [bool; 2],
    pub moisture: [Reading; 2],
    pub flow: [Reading; 2],
}

impl StatusReport {
    /// Queue the `R{...}` line.
    ///
    /// The `m2` field carries moisture channel 1's freshness marker and a
    /// constant zero.
    pub fn respond<const N: usize>(&self, out: &mut Responder<N>) -> usize {
        let [m0, m1] = self.moisture;
        let [f0, f1] = self.flow;
        respond!(
            out,
            STATUS_FORMAT,
            self.indicator,
            self.valves[0],
            self.valves[1],
            m0.marker(),
            m0.value,
            m1.marker(),
            m1.value,
            m1.marker(),
            0i32,
            f0.marker(),
            f0.value,
            f1.marker(),
            f1.value,
        )
    }
}

/// Queue the `AV<valve>` acknowledgment for an accepted pulse
pub fn acknowledge_pulse<const N: usize>(out: &mut Responder<N>, valve: u8) -> usize {
    respond!(out, "AV%d\r\n", valve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let report = StatusReport {
            indicator: 2,
            valves: [true, false],
            moisture: [
                Reading { value: 512, fresh: true },
                Reading { value: 498, fresh: false },
            ],
            flow: [
                Reading { value: 12, fresh: true },
                Reading { value: -3, fresh: false },
            ],
        };
        let mut out: Responder<256> = Responder::new();
        report.respond(&mut out);
        assert_eq!(
            out.pending(),
            &b"R{\"l\":2,\"v0\":1,\"v1\":0,\"m0\": 512,\"m1\":-498,\"m2\":-0,\"f0\": 12,\"f1\":--3}\r\n"[..]
        );
    }

    #[test]
    fn test_m2_follows_moisture_1_freshness() {
        let report = StatusReport {
            moisture: [Reading::default(), Reading { value: 7, fresh: true }],
            ..Default::default()
        };
        let mut out: Responder<256> = Responder::new();
        report.respond(&mut out);
        let line = String::from_utf8(out.pending().to_vec()).unwrap();
        assert!(line.contains("\"m1\": 7,\"m2\": 0,"));
    }

    #[test]
    fn test_pulse_ack() {
        let mut out: Responder<16> = Responder::new();
        acknowledge_pulse(&mut out, 1);
        assert_eq!(out.pending(), b"AV1\r\n");
    }
}
