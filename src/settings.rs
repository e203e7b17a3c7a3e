use crate::framing::Framing;

pub const DEFAULT_BAUD: u32 = 115_200;
pub const INITIAL_BUFFER_SIZE: usize = 150;

/// Wait before opening the port; some SAMD21 boards drop output without it.
pub const STARTUP_DELAY_MS: u32 = 1000;
pub const SETTLE_DELAY_MS: u32 = 200;

/// Parameters of the `begin` start-up sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub baud: u32,
    pub framing: Framing,
    pub startup_delay_ms: u32,
    pub settle_delay_ms: u32,
    pub initial_buffer_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUD,
            framing: Framing::SERIAL_8N1,
            startup_delay_ms: STARTUP_DELAY_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            initial_buffer_size: INITIAL_BUFFER_SIZE,
        }
    }
}

impl Settings {
    pub fn with_line(baud: u32, framing: Framing) -> Self {
        Self {
            baud,
            framing,
            ..Self::default()
        }
    }
}
