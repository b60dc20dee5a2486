//! Controller Orchestration

use crate::board::Board;
use crate::config::ControllerConfig;
use crate::hardware::{Device, Indicator, Sensor, Valve};
use crate::indicator::IndicatorState;
use crate::input::InputStage;
use irrigation_protocol::{Command, Parser, Request, Responder, RingStats, DEFAULT_CAPACITY};
use tracing::{debug, info, warn};

/// Top-level controller.
///
/// Owns the protocol state and the board. The transport drives the
/// `read_*`/`write_*` methods; the main loop calls [`Controller::periodic`]
/// once per tick.
pub struct Controller<V, S, L, D, const N: usize = DEFAULT_CAPACITY> {
    board: Board<V, S, L, D>,
    config: ControllerConfig,
    parser: Parser,
    responder: Responder<N>,
    input: InputStage,
    /// Host is considered gone once the clock passes this point
    deadline_us: u64,
}

impl<V, S, L, D, const N: usize> Controller<V, S, L, D, N>
where
    V: Valve,
    S: Sensor,
    L: Indicator,
    D: Device,
{
    /// Create a controller with an empty output ring and an idle parser
    pub fn new(board: Board<V, S, L, D>, config: ControllerConfig) -> Self {
        info!("Creating controller with config: {:?}", config);
        Self {
            board,
            config,
            parser: Parser::new(),
            responder: Responder::new(),
            input: InputStage::new(),
            deadline_us: 0,
        }
    }

    /// Initialize the hardware
    pub fn init(&mut self) {
        self.board.init();
    }

    /// Poll every peripheral and refresh the indicator
    pub fn periodic(&mut self) {
        self.board.periodic();

        let now = self.board.device.now_us();
        let state = IndicatorState::resolve(
            self.board.valves[0].get(),
            self.board.valves[1].get(),
            self.deadline_us < now,
        );
        if state != self.board.indicator.state() {
            debug!("Indicator {:?} -> {:?}", self.board.indicator.state(), state);
        }
        self.board.indicator.set_state(state);
    }

    /// Receive buffer for the transport to fill
    pub fn read_buffer(&mut self) -> &mut [u8] {
        self.input.buffer_mut()
    }

    /// `len` bytes were written into the receive buffer
    pub fn read_done(&mut self, len: usize) {
        let (bytes, len) = self.input.received(len);
        for &byte in &bytes[..len] {
            self.parse(byte);
        }
    }

    /// Bytes waiting to be sent; may be only part of what is queued
    pub fn write_buffer(&self) -> &[u8] {
        self.responder.pending()
    }

    /// `len` bytes of the write buffer were sent
    pub fn write_done(&mut self, len: usize) {
        self.responder.advance(len);
    }

    /// Feed one received byte through the parser
    pub fn parse(&mut self, byte: u8) {
        self.deadline_us = self
            .board
            .device
            .now_us()
            .saturating_add(self.config.liveness_timeout_us());

        match self.parser.parse(byte) {
            Ok(true) => {
                self.perform_command();
                self.parser.reset();
            }
            Ok(false) => {}
            Err(e) => {
                debug!("Rejected input: {}", e);
                e.respond(&mut self.responder);
            }
        }
    }

    fn perform_command(&mut self) {
        match self.parser.command() {
            Command::Reset => info!("Reset value: {}", self.parser.values()[0]),
            Command::Valve => info!(
                "Valve target: {} pulse: {}",
                self.parser.target(),
                self.parser.values()[0]
            ),
            Command::Status | Command::None => {}
        }

        match Request::try_from(&self.parser) {
            Ok(request) => self
                .board
                .dispatch(request, &mut self.responder, &self.config),
            Err(e) => {
                warn!("Command refused: {}", e);
                e.respond(&mut self.responder);
            }
        }
    }

    /// The hardware collaborators
    pub fn board(&self) -> &Board<V, S, L, D> {
        &self.board
    }

    /// Mutable access to the hardware collaborators
    pub fn board_mut(&mut self) -> &mut Board<V, S, L, D> {
        &mut self.board
    }

    /// Parser state between bytes
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Output ring statistics
    pub fn output_stats(&self) -> RingStats {
        self.responder.stats()
    }

    /// Time after which the host is considered disconnected
    pub fn liveness_deadline_us(&self) -> u64 {
        self.deadline_us
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
