use crate::format_buffer::FormatBuffer;
use crate::framing::Framing;
use crate::port::Port;
use crate::settings::Settings;
use core::{fmt, hint};
use embedded_hal::blocking::delay::DelayMs;

/// Written in place of the output when a formatting trait reports an error.
pub const FORMAT_ERROR_MESSAGE: &str = "printf formatting error occurred!\n";

/// printf-style writer for a serial monitor port.
///
/// ```ignore
/// let mut monitor = Monitor::new();
/// monitor.begin(Some(serial), 9600, Framing::SERIAL_8N1, &mut delay);
/// monitor_printf!(monitor, "Printing to monitor, can you see it?\n");
/// for i in 0..10 {
///     monitor_printf!(monitor, " {}", i);
/// }
/// ```
#[derive(Debug)]
pub struct Monitor<P> {
    port: Option<P>,
    enabled: bool,
    buf: FormatBuffer,
}

impl<P> Default for Monitor<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Monitor<P> {
    pub const fn new() -> Self {
        Self {
            port: None,
            enabled: false,
            buf: FormatBuffer::new(),
        }
    }

    /// Set the port up front. Output stays disabled until `begin`.
    pub const fn with_port(port: P) -> Self {
        Self {
            port: Some(port),
            enabled: false,
            buf: FormatBuffer::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling has no effect while there is no port.
    pub fn set_enabled(&mut self, enable: bool) {
        self.enabled = self.port.is_some() && enable;
    }

    /// Buffer size in bytes including the nul slot, 0 if unallocated.
    pub fn buffer_size(&self) -> usize {
        self.buf.capacity()
    }

    /// Reallocate the format buffer to exactly `size` bytes, or free it for 0.
    ///
    /// `printf` grows the buffer on its own, so this is only needed to
    /// preallocate or to release memory.
    pub fn set_buffer_size(&mut self, size: usize) {
        self.buf.resize(size);
    }

    pub fn port(&self) -> Option<&P> {
        self.port.as_ref()
    }

    pub fn port_mut(&mut self) -> Option<&mut P> {
        self.port.as_mut()
    }

    /// Take the port back, leaving the monitor disabled.
    pub fn release(&mut self) -> Option<P> {
        self.enabled = false;
        self.port.take()
    }
}

impl<P: Port> Monitor<P> {
    /// Initialize with the default start-up timing and buffer size.
    ///
    /// A `Some` port replaces the current one, is opened at `baud`/`framing`,
    /// waited on until ready and drained of stale input. With `None` the port
    /// set by `with_port` is kept as is and nothing is sent to the hardware.
    /// Either way output is enabled exactly when a port is present.
    ///
    /// Note that on boards where the monitor port only exists while USB is
    /// connected, passing that port without a host attached blocks here.
    /// For the same reason, call this with interrupts enabled: a USB port only
    /// reports ready once the device has been polled.
    pub fn begin<D>(&mut self, port: Option<P>, baud: u32, framing: Framing, delay: &mut D)
    where
        D: DelayMs<u32>,
    {
        self.begin_with(port, &Settings::with_line(baud, framing), delay);
    }

    pub fn begin_with<D>(&mut self, port: Option<P>, settings: &Settings, delay: &mut D)
    where
        D: DelayMs<u32>,
    {
        let supplied = port.is_some();
        if port.is_some() {
            self.port = port;
        }
        self.set_enabled(self.port.is_some());
        self.set_buffer_size(settings.initial_buffer_size);

        if supplied {
            if let Some(port) = self.port.as_mut() {
                start_port(port, settings, delay);
            }
        }
    }

    /// Format `args` and write the result to the port.
    ///
    /// Does nothing while disabled. The buffer is grown to fit when the text
    /// does not fit.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        let port = match self.port.as_mut() {
            Some(port) => port,
            None => return,
        };

        let mut res = self.buf.format(args);
        if let Ok(len) = res {
            if len >= self.buf.capacity() {
                debug!("growing printf buffer to {} bytes", len + 1);
                self.buf.resize(len + 1);
                res = self.buf.format(args);
            }
        }

        let out = match res {
            Ok(len) => port.write_all(self.buf.text(len)),
            Err(_) => port.write_all(FORMAT_ERROR_MESSAGE.as_bytes()),
        };
        if let Err(e) = out {
            warn!("printf write failed: {:?}", e);
        }
    }
}

fn start_port<P, D>(port: &mut P, settings: &Settings, delay: &mut D)
where
    P: Port,
    D: DelayMs<u32>,
{
    delay.delay_ms(settings.startup_delay_ms);
    if let Err(e) = port.open(settings.baud, settings.framing) {
        warn!("Failed to open monitor port: {:?}", e);
    }
    while !port.is_ready() {
        hint::spin_loop();
    }
    let mut drained = 0usize;
    while port.read_byte().is_some() {
        drained += 1;
    }
    delay.delay_ms(settings.settle_delay_ms);
    debug!(
        "Monitor port open at {} baud, {} stale bytes discarded",
        settings.baud, drained
    );
}

impl<P: Port> fmt::Write for Monitor<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.printf(format_args!("{}", s));
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.printf(args);
        Ok(())
    }
}
