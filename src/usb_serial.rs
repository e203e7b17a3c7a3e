use crate::framing::Framing;
use crate::port::{Port, PortError};
use usb_device::{bus::UsbBus, UsbError};
use usbd_serial::SerialPort;

const MAX_PACKET: usize = 64;

/// `Port` over a USB CDC-ACM serial function.
///
/// The host picks the line coding, so `open` only records what was asked.
/// The USB device still has to be polled (usually from the USB interrupt)
/// for any data to move.
pub struct UsbSerial<'a, B: UsbBus> {
    serial: SerialPort<'a, B>,
    baud: u32,
    framing: Framing,
}

impl<'a, B: UsbBus> UsbSerial<'a, B> {
    pub fn new(serial: SerialPort<'a, B>) -> Self {
        Self {
            serial,
            baud: 0,
            framing: Framing::default(),
        }
    }

    pub fn requested_line(&self) -> (u32, Framing) {
        (self.baud, self.framing)
    }

    pub fn inner(&mut self) -> &mut SerialPort<'a, B> {
        &mut self.serial
    }

    pub fn free(self) -> SerialPort<'a, B> {
        self.serial
    }
}

impl<B: UsbBus> Port for UsbSerial<'_, B> {
    fn open(&mut self, baud: u32, framing: Framing) -> Result<(), PortError> {
        self.baud = baud;
        self.framing = framing;
        Ok(())
    }

    /// Queue `data` in packet-sized chunks.
    ///
    /// Fails with `WouldBlock` once the CDC buffer stops taking bytes. On a
    /// bus error the port has already queued part of the chunk, so it is
    /// flushed once and the error returned rather than sending it again.
    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError> {
        for chunk in data.chunks(MAX_PACKET) {
            let mut rest = chunk;
            while !rest.is_empty() {
                match self.serial.write(rest) {
                    Ok(count) => rest = &rest[count..],
                    Err(UsbError::WouldBlock) => return Err(PortError::WouldBlock),
                    Err(e) => {
                        match self.serial.flush() {
                            Ok(()) | Err(UsbError::WouldBlock) => (),
                            Err(flush_err) => {
                                warn!("USB flush failed: {:?}", flush_err);
                            }
                        }
                        return Err(e.into());
                    }
                }
            }
        }
        Ok(())
    }

    fn is_ready(&mut self) -> bool {
        self.serial.dtr()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.serial.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}
