// Common test utilities for the integration tests
// Each test binary only uses part of this file
#![allow(dead_code, unused_imports)]

pub use nt_console::test_utils::{MemoryDriver, TestEnv};

use nt_console::{Console, ConsoleConfig};

/// Routes library diagnostics to the test output, set RUST_LOG to see them
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A console on an in-memory terminal `width` columns wide
pub fn terminal(width: u16) -> Console<MemoryDriver> {
    init_logging();
    Console::with_driver(MemoryDriver::interactive().width(width), ConsoleConfig::default())
}

/// A console whose streams are all redirected
pub fn redirected() -> Console<MemoryDriver> {
    init_logging();
    Console::with_driver(MemoryDriver::new(), ConsoleConfig::default())
}

/// Replays everything written to stderr on a screen of `width` columns
pub fn screen(console: &Console<MemoryDriver>, width: u16, height: u16) -> TestEnv {
    let mut env = TestEnv::new(width, height);
    env.process(console.driver().stderr());
    env
}
