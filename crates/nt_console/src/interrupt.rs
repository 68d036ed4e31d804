//! Ctrl-C handling
//!
//! A registered [`Interrupt`] turns SIGINT into a flag that long-running
//! operations poll, so they can unwind through their scopes (restoring the
//! terminal and finishing status lines) instead of dying mid-line. A second
//! SIGINT arriving before the first was taken terminates the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use signal_hook::consts::SIGINT;
use signal_hook::flag;

use crate::errors::{ConsoleError, Result};

/// Longest uninterrupted nap taken by [`Interrupt::sleep`]
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit status used when a second SIGINT kills the process
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// A pending-interrupt flag, shared with the SIGINT handler
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    pending: Arc<AtomicBool>,
}

impl Interrupt {
    /// A flag that is only ever set by [`Interrupt::trigger`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the SIGINT handler and returns its flag.
    ///
    /// Handlers stay installed for the life of the process.
    pub fn register() -> Result<Self> {
        let interrupt = Self::new();
        // Runs before the flag is set, so only a second signal exits.
        flag::register_conditional_shutdown(SIGINT, INTERRUPTED_EXIT_CODE, Arc::clone(&interrupt.pending))?;
        flag::register(SIGINT, Arc::clone(&interrupt.pending))?;
        debug!("SIGINT handler installed");
        Ok(interrupt)
    }

    /// Marks an interrupt as pending
    pub fn trigger(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Fails with [`ConsoleError::Interrupted`] while an interrupt is pending.
    ///
    /// The interrupt stays pending; use [`Interrupt::take`] to handle it.
    pub fn check(&self) -> Result<()> {
        if self.is_pending() {
            Err(ConsoleError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Clears the pending interrupt, returning whether there was one
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    /// Sleeps for `duration`, waking early with [`ConsoleError::Interrupted`]
    /// when an interrupt arrives.
    pub fn sleep(&self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep((deadline - now).min(POLL_INTERVAL));
        }
    }
}
