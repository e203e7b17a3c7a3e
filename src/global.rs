use crate::monitor::Monitor;
use crate::port::Port;
use alloc::boxed::Box;
use core::cell::RefCell;
use core::mem;
use cortex_m::interrupt::{free, CriticalSection};

pub type BoxedPort = Box<dyn Port>;

/// The process-wide monitor, for code that has no instance passed to it.
///
/// Start a `Monitor<BoxedPort>` as usual, with interrupts enabled, then
/// install it:
///
/// ```ignore
/// let mut monitor = Monitor::new();
/// monitor.begin(Some(Box::new(UsbSerial::new(serial)) as BoxedPort), 115_200,
///               Framing::SERIAL_8N1, &mut delay);
/// THE_MONITOR.set(monitor).ok();
/// mprintf!("USB monitor up\n");
/// ```
///
/// Do not call `begin` with a port from inside `with`: the start-up delays
/// and the wait for the port would run with interrupts masked, and a USB port
/// never becomes ready because the device cannot be polled.
pub static THE_MONITOR: GlobalMonitor = GlobalMonitor::new();

/// A `Monitor` that lives in a `static` and is only touched inside
/// interrupt-free sections.
pub struct GlobalMonitor {
    inner: RefCell<Monitor<BoxedPort>>,
}

// Safety: `inner` is only borrowed while holding a `CriticalSection`, which
// on a single-core Cortex-M means nothing else can run.
unsafe impl Sync for GlobalMonitor {}

impl GlobalMonitor {
    pub const fn new() -> Self {
        Self {
            inner: RefCell::new(Monitor::new()),
        }
    }

    /// Run `f` on the monitor with interrupts disabled.
    ///
    /// Returns `None` when the monitor is already in use further up the stack,
    /// e.g. when the logger fires from inside a `printf`.
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Monitor<BoxedPort>) -> R,
    {
        free(|cs| self.borrow(cs, f))
    }

    /// Like `with`, for callers already inside a critical section.
    pub fn borrow<R, F>(&self, _cs: &CriticalSection, f: F) -> Option<R>
    where
        F: FnOnce(&mut Monitor<BoxedPort>) -> R,
    {
        let mut monitor_ref = self.inner.try_borrow_mut().ok()?;
        Some(f(&mut monitor_ref))
    }

    /// Install an already started monitor, returning the one it replaces.
    ///
    /// Hands `monitor` back as the error if the global one is in use.
    pub fn set(&self, monitor: Monitor<BoxedPort>) -> Result<Monitor<BoxedPort>, Monitor<BoxedPort>> {
        free(|cs| self.set_in(cs, monitor))
    }

    pub fn set_in(
        &self,
        _cs: &CriticalSection,
        monitor: Monitor<BoxedPort>,
    ) -> Result<Monitor<BoxedPort>, Monitor<BoxedPort>> {
        match self.inner.try_borrow_mut() {
            Ok(mut monitor_ref) => Ok(mem::replace(&mut *monitor_ref, monitor)),
            Err(_) => Err(monitor),
        }
    }
}

/// Shorthand for `THE_MONITOR.with(f)`.
pub fn with_monitor<R, F>(f: F) -> Option<R>
where
    F: FnOnce(&mut Monitor<BoxedPort>) -> R,
{
    THE_MONITOR.with(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::mock::shared_monitor;

    fn cs() -> CriticalSection {
        // Safety: host tests have no interrupts to mask
        unsafe { CriticalSection::new() }
    }

    #[test]
    fn starts_disabled() {
        let global = GlobalMonitor::new();
        let enabled = global.borrow(&cs(), |m| m.is_enabled());
        assert_eq!(enabled, Some(false));
    }

    #[test]
    fn set_installs_started_monitor() {
        let global = GlobalMonitor::new();
        let (monitor, shared) = shared_monitor();
        let cs = cs();

        match global.set_in(&cs, monitor) {
            Ok(previous) => assert!(!previous.is_enabled()),
            Err(_) => panic!("global monitor should be free"),
        }
        global.borrow(&cs, |m| m.printf(format_args!("global {}", 7)));
        assert_eq!(shared.borrow().output_str(), "global 7");
        assert_eq!(global.borrow(&cs, |m| m.is_enabled()), Some(true));
    }

    #[test]
    fn set_while_in_use_hands_monitor_back() {
        let global = GlobalMonitor::new();
        let (monitor, _shared) = shared_monitor();
        let cs = cs();

        let refused = global.borrow(&cs, |_| match global.set_in(&cs, monitor) {
            Ok(_) => false,
            Err(returned) => returned.is_enabled(),
        });
        assert_eq!(refused, Some(true));
    }

    #[test]
    fn mprintf_prints_through_the_global_monitor() {
        let (monitor, shared) = shared_monitor();
        let cs = cs();
        assert!(THE_MONITOR.set_in(&cs, monitor).is_ok());

        mprintf!(in &cs; "tick {}\n", 1);
        let printed = mprintf!(in &cs; "tick {}\n", 2);
        assert_eq!(printed, Some(()));
        assert_eq!(shared.borrow().output_str(), "tick 1\ntick 2\n");

        let nested = THE_MONITOR.borrow(&cs, |_| mprintf!(in &cs; "lost"));
        assert_eq!(nested, Some(None));
        assert_eq!(shared.borrow().writes, 2);

        assert!(THE_MONITOR.set_in(&cs, Monitor::new()).is_ok());
    }

    #[test]
    fn nested_access_is_refused() {
        let global = GlobalMonitor::new();
        let cs = cs();
        let inner = global.borrow(&cs, |_| global.borrow(&cs, |_| ()));
        assert_eq!(inner, Some(None));
    }
}
