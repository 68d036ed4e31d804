use log::debug;

use crate::config::ConsoleConfig;
use crate::errors::Result;
use crate::terminal::{self, Driver, OutputStream, Stream, SystemDriver, TextChunk};

/// Entry point for all terminal feedback
///
/// A console owns a terminal [`Driver`] and the [`ConsoleConfig`]. Status
/// lines, progress bars, prompts and mode changes are all started from here
/// and borrow the console for as long as they are active, so only one of
/// them can own the terminal at a time.
pub struct Console<D: Driver = SystemDriver> {
    driver: D,
    config: ConsoleConfig,
}

impl Console<SystemDriver> {
    /// Creates a console on the process' standard streams
    pub fn new() -> Self {
        Self::with_driver(SystemDriver::new(), ConsoleConfig::default())
    }

    /// Creates a console on the standard streams with custom settings
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self::with_driver(SystemDriver::new(), config)
    }
}

impl Default for Console<SystemDriver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Driver> Console<D> {
    pub fn with_driver(driver: D, config: ConsoleConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Consumes the console, returning the driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn is_interactive(&self, stream: Stream) -> bool {
        self.driver.is_interactive(stream)
    }

    /// Terminal width in columns.
    ///
    /// Falls back to the configured width when stdout is not a terminal or
    /// its size cannot be queried.
    pub fn width(&self) -> usize {
        if !self.driver.is_interactive(Stream::Stdout) {
            return self.config.fallback_width;
        }
        match self.driver.window_size() {
            Ok((columns, _)) if columns > 0 => usize::from(columns),
            Ok(_) => self.config.fallback_width,
            Err(e) => {
                debug!("window size unavailable, using fallback width: {}", e);
                self.config.fallback_width
            }
        }
    }

    /// Writes a caption line to `stream` and flushes it
    pub fn write(&mut self, stream: OutputStream, chunks: &[TextChunk]) -> Result<()> {
        let interactive = self.driver.is_interactive(stream.into());
        terminal::write_chunks(self.driver.output(stream), interactive, chunks)?;
        Ok(())
    }

    pub(crate) fn save_cursor(&mut self, stream: OutputStream) -> Result<()> {
        terminal::save_position(self.driver.output(stream))?;
        Ok(())
    }

    pub(crate) fn restore_cursor(&mut self, stream: OutputStream) -> Result<()> {
        terminal::restore_position(self.driver.output(stream))?;
        Ok(())
    }

    /// Reads one keystroke from stdin without waiting for Enter
    pub fn read(&mut self) -> Result<u8> {
        Ok(self.driver.read_raw_byte(Stream::Stdin)?)
    }

    /// Writes `:: error ` followed by `message` to stderr
    pub fn error(&mut self, message: &[TextChunk]) -> Result<()> {
        let prefix = TextChunk::styled(":: error ", self.config.palette.error.clone());
        self.log_line(prefix, message)
    }

    /// Writes `:: warning ` followed by `message` to stderr
    pub fn warning(&mut self, message: &[TextChunk]) -> Result<()> {
        let prefix = TextChunk::styled(":: warning ", self.config.palette.warning.clone());
        self.log_line(prefix, message)
    }

    /// Writes `:: info ` followed by `message` to stderr
    pub fn info(&mut self, message: &[TextChunk]) -> Result<()> {
        let prefix = TextChunk::styled(":: info ", self.config.palette.info.clone());
        self.log_line(prefix, message)
    }

    fn log_line(&mut self, prefix: TextChunk, message: &[TextChunk]) -> Result<()> {
        let mut line = Vec::with_capacity(message.len() + 1);
        line.push(prefix);
        line.extend_from_slice(message);
        self.write(OutputStream::Stderr, &line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryDriver;

    #[test]
    fn test_width_fallback_when_not_interactive() {
        let console = Console::with_driver(MemoryDriver::new().width(132), ConsoleConfig::default());
        assert_eq!(console.width(), 80);
    }

    #[test]
    fn test_width_from_terminal() {
        let console = Console::with_driver(MemoryDriver::interactive().width(132), ConsoleConfig::default());
        assert_eq!(console.width(), 132);
    }

    #[test]
    fn test_width_uses_configured_fallback() {
        let config = ConsoleConfig::new().fallback_width(100);
        let console = Console::with_driver(MemoryDriver::new(), config);
        assert_eq!(console.width(), 100);
    }

    #[test]
    fn test_log_sinks() {
        let mut console = Console::with_driver(MemoryDriver::new(), ConsoleConfig::default());
        console.error(&["disk full\n".into()]).unwrap();
        console.warning(&["low memory\n".into()]).unwrap();
        console.info(&["all good\n".into()]).unwrap();
        assert_eq!(
            console.driver().stderr_text(),
            ":: error disk full\n:: warning low memory\n:: info all good\n"
        );
    }

    #[test]
    fn test_log_sink_colors_on_terminal() {
        let mut console = Console::with_driver(MemoryDriver::interactive(), ConsoleConfig::default());
        console.warning(&["careful\n".into()]).unwrap();
        assert_eq!(
            console.driver().stderr_text(),
            "\x1b[33;01m:: warning \x1b[00mcareful\n"
        );
    }

    #[test]
    fn test_read_raw_restores_mode() {
        let mut console = Console::with_driver(MemoryDriver::interactive().input(b"y"), ConsoleConfig::default());
        let before = console.driver().current_attributes();
        assert_eq!(console.read().unwrap(), b'y');
        assert_eq!(console.driver().current_attributes(), before);
        assert_eq!(console.driver().attribute_writes().len(), 2);
    }

    #[test]
    fn test_read_raw_restores_mode_on_failure() {
        let mut console = Console::with_driver(MemoryDriver::interactive(), ConsoleConfig::default());
        let before = console.driver().current_attributes();
        assert!(console.read().is_err());
        assert_eq!(console.driver().current_attributes(), before);
    }

    #[test]
    fn test_read_without_terminal_leaves_attributes_alone() {
        let mut console = Console::with_driver(MemoryDriver::new().input(b"n"), ConsoleConfig::default());
        assert_eq!(console.read().unwrap(), b'n');
        assert_eq!(console.driver().attribute_reads(), 0);
        assert!(console.driver().attribute_writes().is_empty());
    }

    #[test]
    fn test_into_driver_keeps_output() {
        let mut console = Console::with_driver(MemoryDriver::new(), ConsoleConfig::default());
        console.info(&["done\n".into()]).unwrap();
        let mut driver = console.into_driver();
        assert_eq!(driver.take_stderr(), b":: info done\n".to_vec());
    }
}
