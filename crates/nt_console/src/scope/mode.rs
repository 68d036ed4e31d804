use std::ops::{Deref, DerefMut};

use log::{debug, warn};

use crate::console::Console;
use crate::errors::{ConsoleError, Result};
use crate::terminal::{Attributes, Driver, ModeFlags, Stream, When};

/// Keeps stdin in a modified line-discipline mode until dropped
///
/// The guard dereferences to the [`Console`], so the console stays usable
/// while the mode is active. The attributes captured when the guard was
/// created are written back when it is dropped, whether the scope ends
/// normally, through `?` or by unwinding. Use [`ModeGuard::restore`] to see
/// restoration errors instead of having them logged.
pub struct ModeGuard<'a, D: Driver> {
    console: &'a mut Console<D>,
    saved: Option<Attributes>,
}

impl<'a, D: Driver> ModeGuard<'a, D> {
    /// Whether the terminal mode was actually changed. False when stdin is
    /// not a terminal.
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    /// Puts the original attributes back now
    pub fn restore(mut self) -> Result<()> {
        self.restore_saved()
    }

    fn restore_saved(&mut self) -> Result<()> {
        if let Some(saved) = self.saved.take() {
            debug!("restoring terminal attributes on stdin");
            self.console
                .driver_mut()
                .set_attributes(Stream::Stdin, &saved, When::Drain)?;
        }
        Ok(())
    }
}

impl<'a, D: Driver> Deref for ModeGuard<'a, D> {
    type Target = Console<D>;

    fn deref(&self) -> &Console<D> {
        self.console
    }
}

impl<'a, D: Driver> DerefMut for ModeGuard<'a, D> {
    fn deref_mut(&mut self) -> &mut Console<D> {
        self.console
    }
}

impl<'a, D: Driver> Drop for ModeGuard<'a, D> {
    fn drop(&mut self) {
        if let Err(e) = self.restore_saved() {
            warn!("unable to restore terminal attributes: {}", e);
        }
    }
}

impl<D: Driver> Console<D> {
    /// Forces local mode flags `on` and `off` on stdin until the returned
    /// guard is dropped.
    ///
    /// When stdin is not a terminal nothing is read or changed and the guard
    /// is inert.
    pub fn flags(&mut self, on: ModeFlags, off: ModeFlags) -> Result<ModeGuard<'_, D>> {
        if !self.is_interactive(Stream::Stdin) {
            return Ok(ModeGuard { console: self, saved: None });
        }

        let saved = self.driver().attributes(Stream::Stdin)?;
        let changed = saved.with_local_flags(on, off);
        debug!(
            "changing stdin local modes: on={:#o} off={:#o}",
            on.bits(),
            off.bits()
        );
        self.driver_mut()
            .set_attributes(Stream::Stdin, &changed, When::Drain)?;
        Ok(ModeGuard {
            console: self,
            saved: Some(saved),
        })
    }

    /// Turns off echo on stdin until the returned guard is dropped
    pub fn no_echo(&mut self) -> Result<ModeGuard<'_, D>> {
        self.flags(ModeFlags::empty(), ModeFlags::ECHO)
    }

    /// Runs `body` with local mode flags `on` and `off` forced on stdin.
    ///
    /// The original attributes are restored however `body` ends. If both
    /// `body` and the restoration fail, the error from `body` is returned.
    pub fn with_flags<T, E, F>(&mut self, on: ModeFlags, off: ModeFlags, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Console<D>) -> std::result::Result<T, E>,
        E: From<ConsoleError>,
    {
        let mut guard = self.flags(on, off)?;
        let result = body(&mut *guard);
        let restored = guard.restore();
        match result {
            Ok(value) => {
                restored?;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = restored {
                    warn!("unable to restore terminal attributes: {}", e);
                }
                Err(err)
            }
        }
    }

    /// Runs `body` with echo turned off on stdin
    pub fn without_echo<T, E, F>(&mut self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Console<D>) -> std::result::Result<T, E>,
        E: From<ConsoleError>,
    {
        self.with_flags(ModeFlags::empty(), ModeFlags::ECHO, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::test_utils::MemoryDriver;

    fn console(driver: MemoryDriver) -> Console<MemoryDriver> {
        Console::with_driver(driver, ConsoleConfig::default())
    }

    #[test]
    fn test_no_echo_guard_restores_on_drop() {
        let mut console = console(MemoryDriver::interactive());
        let original = console.driver().current_attributes();
        {
            let guard = console.no_echo().unwrap();
            assert!(guard.is_active());
            assert!(!guard.driver().current_attributes().local_flags().contains(ModeFlags::ECHO));
        }
        assert_eq!(console.driver().current_attributes(), original);

        let writes = console.driver().attribute_writes();
        assert_eq!(writes.len(), 2);
        assert!(writes.iter().all(|w| w.when == When::Drain && w.stream == Stream::Stdin));
    }

    #[test]
    fn test_with_flags_restores_after_error() {
        let mut console = console(MemoryDriver::interactive());
        let original = console.driver().current_attributes();

        let result: std::result::Result<(), ConsoleError> =
            console.with_flags(ModeFlags::empty(), ModeFlags::ECHO | ModeFlags::ICANON, |_| {
                Err(ConsoleError::Interrupted)
            });

        assert!(matches!(result, Err(ConsoleError::Interrupted)));
        assert_eq!(console.driver().current_attributes(), original);
    }

    #[test]
    fn test_with_flags_returns_body_value() {
        let mut console = console(MemoryDriver::interactive());
        let seen: Result<bool> = console.without_echo(|console| {
            Ok(console.driver().current_attributes().local_flags().contains(ModeFlags::ECHO))
        });
        assert!(!seen.unwrap());
        assert!(console.driver().current_attributes().local_flags().contains(ModeFlags::ECHO));
    }

    #[test]
    fn test_non_interactive_is_a_no_op() {
        let mut console = console(MemoryDriver::new());
        let ran: Result<()> = console.without_echo(|_| Ok(()));
        ran.unwrap();
        assert_eq!(console.driver().attribute_reads(), 0);
        assert!(console.driver().attribute_writes().is_empty());
        assert!(!console.no_echo().unwrap().is_active());
    }

    #[test]
    fn test_restores_when_body_panics() {
        let mut console = console(MemoryDriver::interactive());
        let original = console.driver().current_attributes();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = console.no_echo().unwrap();
            panic!("boom");
        }));

        assert!(outcome.is_err());
        assert_eq!(console.driver().current_attributes(), original);
    }

    #[test]
    fn test_body_error_survives_failed_restore() {
        let mut console = console(MemoryDriver::interactive().fail_attribute_writes_after(1));

        let result: std::result::Result<(), ConsoleError> =
            console.without_echo(|_| Err(ConsoleError::Interrupted));

        assert!(matches!(result, Err(ConsoleError::Interrupted)));
        assert_eq!(console.driver().attribute_writes().len(), 1);
    }

    #[test]
    fn test_failed_restore_reported_after_success() {
        let mut console = console(MemoryDriver::interactive().fail_attribute_writes_after(1));
        let result: Result<u8> = console.without_echo(|_| Ok(1));
        assert!(matches!(result, Err(ConsoleError::Io(_))));
    }

    #[test]
    fn test_guard_restore_reports_failure() {
        let mut console = console(MemoryDriver::interactive().fail_attribute_writes_after(1));
        let guard = console.no_echo().unwrap();
        assert!(guard.restore().is_err());
    }
}
