//! printf-style output to a serial monitor port.
//!
//! A [`Monitor`] owns an optional [`Port`], an enable flag and a format buffer
//! that grows to fit whatever is printed. Pass one around explicitly, or use
//! [`THE_MONITOR`] and [`mprintf!`] where threading an instance through is not
//! practical.
#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

/// `monitor_printf!(monitor, "fmt", args...)` prints through a [`Monitor`].
#[macro_export]
macro_rules! monitor_printf {
    ($monitor:expr, $($arg:tt)*) => {
        $monitor.printf(format_args!($($arg)*))
    };
}

/// Prints through [`THE_MONITOR`]. Silently does nothing if it is in use.
///
/// Inside an existing critical section, e.g. an interrupt handler's
/// `free(|cs| ..)` block, pass the token: `mprintf!(in cs; "x = {}", x)`.
#[macro_export]
macro_rules! mprintf {
    (in $cs:expr; $($arg:tt)*) => {
        $crate::THE_MONITOR.borrow($cs, |m| m.printf(format_args!($($arg)*)))
    };
    ($($arg:tt)*) => {
        $crate::with_monitor(|m| m.printf(format_args!($($arg)*)))
    };
}

mod format_buffer;
mod framing;
mod global;
mod hal_serial;
mod logger;
mod monitor;
mod port;
mod settings;
mod usb_serial;

pub use framing::{Framing, Parity, StopBits};
pub use global::{with_monitor, BoxedPort, GlobalMonitor, THE_MONITOR};
pub use hal_serial::HalSerial;
pub use logger::{write_record, MonitorLogger};
pub use monitor::{Monitor, FORMAT_ERROR_MESSAGE};
pub use port::{Port, PortError};
pub use settings::{Settings, DEFAULT_BAUD, INITIAL_BUFFER_SIZE, SETTLE_DELAY_MS, STARTUP_DELAY_MS};
pub use usb_serial::UsbSerial;
