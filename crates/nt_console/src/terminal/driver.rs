use std::io::{self, Write};

use super::attributes::{Attributes, When};

/// One of the three standard streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

/// A stream that can be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl From<OutputStream> for Stream {
    fn from(stream: OutputStream) -> Self {
        match stream {
            OutputStream::Stdout => Stream::Stdout,
            OutputStream::Stderr => Stream::Stderr,
        }
    }
}

/// Access to the terminal device
///
/// Everything the console does to the terminal goes through this trait:
/// the real implementation is [`SystemDriver`], tests use
/// [`MemoryDriver`].
///
/// [`SystemDriver`]: super::SystemDriver
/// [`MemoryDriver`]: crate::test_utils::MemoryDriver
pub trait Driver {
    /// Whether `stream` is connected to a terminal
    fn is_interactive(&self, stream: Stream) -> bool;

    /// Reads the current attributes of `stream`
    fn attributes(&self, stream: Stream) -> io::Result<Attributes>;

    /// Replaces the attributes of `stream`
    fn set_attributes(&mut self, stream: Stream, attributes: &Attributes, when: When) -> io::Result<()>;

    /// Terminal size as (columns, rows)
    fn window_size(&self) -> io::Result<(u16, u16)>;

    /// Reads a single byte from `stream`, in whatever mode it is in
    fn read_byte(&mut self, stream: Stream) -> io::Result<u8>;

    /// The writer behind `stream`
    fn output(&mut self, stream: OutputStream) -> &mut dyn Write;

    /// Reads a single byte with `stream` switched to raw mode.
    ///
    /// The previous attributes are put back before returning, whether or
    /// not the read succeeded. A stream that is not a terminal is read as
    /// is.
    fn read_raw_byte(&mut self, stream: Stream) -> io::Result<u8> {
        if !self.is_interactive(stream) {
            return self.read_byte(stream);
        }

        let saved = self.attributes(stream)?;
        self.set_attributes(stream, &saved.raw_mode(), When::Flush)?;
        let byte = self.read_byte(stream);
        let restored = self.set_attributes(stream, &saved, When::Drain);
        let byte = byte?;
        restored?;
        Ok(byte)
    }
}
