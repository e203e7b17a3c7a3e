//! Serial line framing, encoded the way AVR/Arduino `SERIAL_xYz` constants are.

bitflags! {
    /// Data bits, parity and stop bits of a serial line.
    ///
    /// Bits 1..=2 hold the character size (5 to 8 data bits), bit 3 selects two
    /// stop bits and bits 4..=5 select the parity mode.
    pub struct Framing: u8 {
        const CHAR_SIZE_0 = 0b0000_0010;
        const CHAR_SIZE_1 = 0b0000_0100;
        const TWO_STOP_BITS = 0b0000_1000;
        const PARITY_ODD = 0b0001_0000;
        const PARITY_ENABLE = 0b0010_0000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl Framing {
    pub const SERIAL_5N1: Framing = Framing { bits: 0x00 };
    pub const SERIAL_6N1: Framing = Framing { bits: 0x02 };
    pub const SERIAL_7N1: Framing = Framing { bits: 0x04 };
    pub const SERIAL_8N1: Framing = Framing { bits: 0x06 };
    pub const SERIAL_5N2: Framing = Framing { bits: 0x08 };
    pub const SERIAL_6N2: Framing = Framing { bits: 0x0A };
    pub const SERIAL_7N2: Framing = Framing { bits: 0x0C };
    pub const SERIAL_8N2: Framing = Framing { bits: 0x0E };
    pub const SERIAL_5E1: Framing = Framing { bits: 0x20 };
    pub const SERIAL_6E1: Framing = Framing { bits: 0x22 };
    pub const SERIAL_7E1: Framing = Framing { bits: 0x24 };
    pub const SERIAL_8E1: Framing = Framing { bits: 0x26 };
    pub const SERIAL_5E2: Framing = Framing { bits: 0x28 };
    pub const SERIAL_6E2: Framing = Framing { bits: 0x2A };
    pub const SERIAL_7E2: Framing = Framing { bits: 0x2C };
    pub const SERIAL_8E2: Framing = Framing { bits: 0x2E };
    pub const SERIAL_5O1: Framing = Framing { bits: 0x30 };
    pub const SERIAL_6O1: Framing = Framing { bits: 0x32 };
    pub const SERIAL_7O1: Framing = Framing { bits: 0x34 };
    pub const SERIAL_8O1: Framing = Framing { bits: 0x36 };
    pub const SERIAL_5O2: Framing = Framing { bits: 0x38 };
    pub const SERIAL_6O2: Framing = Framing { bits: 0x3A };
    pub const SERIAL_7O2: Framing = Framing { bits: 0x3C };
    pub const SERIAL_8O2: Framing = Framing { bits: 0x3E };

    pub fn data_bits(self) -> u8 {
        5 + ((self.bits >> 1) & 0b11)
    }

    pub fn parity(self) -> Parity {
        if !self.contains(Framing::PARITY_ENABLE) {
            Parity::None
        } else if self.contains(Framing::PARITY_ODD) {
            Parity::Odd
        } else {
            Parity::Even
        }
    }

    pub fn stop_bits(self) -> StopBits {
        if self.contains(Framing::TWO_STOP_BITS) {
            StopBits::Two
        } else {
            StopBits::One
        }
    }
}

impl Default for Framing {
    fn default() -> Self {
        Framing::SERIAL_8N1
    }
}
