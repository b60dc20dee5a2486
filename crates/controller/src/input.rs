//! Input Stage

/// Receive scratch size: longest command plus one
pub const RX_BUFFER_SIZE: usize = 64 + 1;

/// Scratch buffer the transport fills before handing bytes to the parser
#[derive(Debug, Clone)]
pub struct InputStage {
    buffer: [u8; RX_BUFFER_SIZE],
}

impl InputStage {
    pub const fn new() -> Self {
        Self {
            buffer: [0; RX_BUFFER_SIZE],
        }
    }

    /// Space for the transport to write into
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Copy of the first `len` received bytes, clamped to the buffer size
    pub fn received(&self, len: usize) -> ([u8; RX_BUFFER_SIZE], usize) {
        (self.buffer, len.min(RX_BUFFER_SIZE))
    }
}

impl Default for InputStage {
    fn default() -> Self {
        Self::new()
    }
}
