use crate::framing::Framing;
use alloc::boxed::Box;
use usb_device::UsbError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortError {
    /// The transport could not accept data right now.
    WouldBlock,
    Transport,
}

impl From<UsbError> for PortError {
    fn from(e: UsbError) -> Self {
        match e {
            UsbError::WouldBlock => PortError::WouldBlock,
            _ => PortError::Transport,
        }
    }
}

/// A byte-oriented serial transport.
pub trait Port {
    /// Configure the line. Transports whose line settings are fixed elsewhere
    /// may ignore the arguments.
    fn open(&mut self, baud: u32, framing: Framing) -> Result<(), PortError>;

    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError>;

    /// Whether the other end is there to receive output.
    fn is_ready(&mut self) -> bool;

    /// Take one pending received byte, if any, without blocking.
    fn read_byte(&mut self) -> Option<u8>;
}

impl<P: Port + ?Sized> Port for &mut P {
    fn open(&mut self, baud: u32, framing: Framing) -> Result<(), PortError> {
        (**self).open(baud, framing)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError> {
        (**self).write_all(data)
    }

    fn is_ready(&mut self) -> bool {
        (**self).is_ready()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

impl<P: Port + ?Sized> Port for Box<P> {
    fn open(&mut self, baud: u32, framing: Framing) -> Result<(), PortError> {
        (**self).open(baud, framing)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError> {
        (**self).write_all(data)
    }

    fn is_ready(&mut self) -> bool {
        (**self).is_ready()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}
