//! Irrigation Controller
//!
//! Owns the protocol state (parser, output ring, input stage) together with
//! the hardware collaborators, and runs everything from a single
//! cooperative control path.

mod board;
mod config;
mod controller;
mod hardware;
mod indicator;
mod input;
pub mod sim;

pub use board::{Board, FLOW_CHANNELS, MOISTURE_CHANNELS};
pub use config::ControllerConfig;
pub use controller::Controller;
pub use hardware::{Device, Indicator, Peripheral, Sensor, Valve};
pub use indicator::IndicatorState;
pub use input::{InputStage, RX_BUFFER_SIZE};
