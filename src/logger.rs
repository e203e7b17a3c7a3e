use crate::global::GlobalMonitor;
use core::fmt::{self, Write};
use cortex_m::interrupt::{free, CriticalSection};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `log` backend printing through a global monitor.
///
/// Records logged while that monitor is busy (including from inside
/// `printf` itself) are dropped.
pub struct MonitorLogger {
    target: &'static GlobalMonitor,
}

impl MonitorLogger {
    pub const fn new(target: &'static GlobalMonitor) -> Self {
        Self { target }
    }

    pub fn init(&'static self, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(level);
        Ok(())
    }

    /// Log `record` from inside an existing critical section.
    pub fn log_in(&self, cs: &CriticalSection, record: &Record) {
        self.target.borrow(cs, |m| {
            if m.is_enabled() {
                write_record(m, record).ok();
            }
        });
    }

    pub fn enabled_in(&self, cs: &CriticalSection) -> bool {
        self.target.borrow(cs, |m| m.is_enabled()).unwrap_or(false)
    }
}

pub fn write_record<W: Write>(w: &mut W, record: &Record) -> fmt::Result {
    if let Some(module_path) = record.module_path_static() {
        write!(
            w,
            "[{}] {}: {}\r\n",
            record.level(),
            module_path,
            record.args()
        )
    } else {
        write!(w, "[{}] {}\r\n", record.level(), record.args())
    }
}

impl Log for MonitorLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        free(|cs| self.enabled_in(cs))
    }

    fn log(&self, record: &Record) {
        free(|cs| self.log_in(cs, record));
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::mock::shared_monitor;
    use alloc::boxed::Box;
    use alloc::string::String;
    use log::Level;

    fn cs() -> CriticalSection {
        // Safety: host tests have no interrupts to mask
        unsafe { CriticalSection::new() }
    }

    fn leaked_global() -> &'static GlobalMonitor {
        Box::leak(Box::new(GlobalMonitor::new()))
    }

    #[test]
    fn logs_one_line_through_the_monitor() {
        let global = leaked_global();
        let (monitor, shared) = shared_monitor();
        let cs = cs();
        assert!(global.set_in(&cs, monitor).is_ok());
        let logger = MonitorLogger::new(global);

        assert!(logger.enabled_in(&cs));
        logger.log_in(
            &cs,
            &Record::builder()
                .args(format_args!("ready after {} ms", 1200))
                .level(Level::Debug)
                .module_path_static(Some("firmware"))
                .build(),
        );
        assert_eq!(
            shared.borrow().output_str(),
            "[DEBUG] firmware: ready after 1200 ms\r\n"
        );
        assert_eq!(shared.borrow().writes, 1);
    }

    #[test]
    fn disabled_monitor_drops_records() {
        let global = leaked_global();
        let (monitor, shared) = shared_monitor();
        let cs = cs();
        assert!(global.set_in(&cs, monitor).is_ok());
        global.borrow(&cs, |m| m.set_enabled(false));
        let logger = MonitorLogger::new(global);

        assert!(!logger.enabled_in(&cs));
        logger.log_in(
            &cs,
            &Record::builder()
                .args(format_args!("hidden"))
                .level(Level::Info)
                .build(),
        );
        assert_eq!(shared.borrow().output_str(), "");
    }

    #[test]
    fn record_logged_while_printing_is_dropped() {
        let global = leaked_global();
        let (monitor, shared) = shared_monitor();
        let cs = cs();
        assert!(global.set_in(&cs, monitor).is_ok());
        let logger = MonitorLogger::new(global);

        global.borrow(&cs, |m| {
            logger.log_in(
                &cs,
                &Record::builder()
                    .args(format_args!("nested"))
                    .level(Level::Warn)
                    .build(),
            );
            m.printf(format_args!("outer\n"));
        });
        assert_eq!(shared.borrow().output_str(), "outer\n");
    }

    #[test]
    fn record_with_module_path() {
        let mut out = String::new();
        write_record(
            &mut out,
            &Record::builder()
                .args(format_args!("USB initialized"))
                .level(Level::Info)
                .module_path_static(Some("firmware::usb"))
                .build(),
        )
        .unwrap();
        assert_eq!(out, "[INFO] firmware::usb: USB initialized\r\n");
    }

    #[test]
    fn record_without_module_path() {
        let mut out = String::new();
        write_record(
            &mut out,
            &Record::builder()
                .args(format_args!("x = {}", 3))
                .level(Level::Warn)
                .build(),
        )
        .unwrap();
        assert_eq!(out, "[WARN] x = 3\r\n");
    }
}
