use crate::framing::Framing;
use crate::port::{Port, PortError};
use core::hint;
use embedded_hal::serial;

/// `Port` over an `embedded-hal` UART.
///
/// HAL serial drivers take their baud rate and framing when they are
/// constructed, so `open` only reports what was asked for.
#[derive(Debug)]
pub struct HalSerial<S> {
    serial: S,
}

impl<S> HalSerial<S> {
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn free(self) -> S {
        self.serial
    }
}

impl<S> Port for HalSerial<S>
where
    S: serial::Write<u8> + serial::Read<u8>,
{
    fn open(&mut self, baud: u32, framing: Framing) -> Result<(), PortError> {
        debug!(
            "UART line is configured by the HAL, requested {} baud {:?}",
            baud, framing
        );
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError> {
        for &byte in data {
            loop {
                match self.serial.write(byte) {
                    Ok(()) => break,
                    Err(nb::Error::WouldBlock) => hint::spin_loop(),
                    Err(nb::Error::Other(_)) => return Err(PortError::Transport),
                }
            }
        }
        loop {
            match self.serial.flush() {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => hint::spin_loop(),
                Err(nb::Error::Other(_)) => return Err(PortError::Transport),
            }
        }
    }

    fn is_ready(&mut self) -> bool {
        true
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.serial.read().ok()
    }
}
