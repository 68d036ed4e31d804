//! Test helpers shared by the unit and integration tests
//!
//! [`MemoryDriver`] stands in for the terminal: it keeps attributes in
//! memory, records every attribute change, serves scripted input and
//! captures everything written. It can also be told to fail attribute
//! changes or writes, to exercise cleanup paths. [`TestEnv`] replays captured output through
//! a `vt100` emulator to check what the user would actually see.

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::io::{self, Error, ErrorKind, Write};

use vt100::Parser;

use crate::terminal::{Attributes, Driver, OutputStream, Stream, When};

/// An attribute change recorded by [`MemoryDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeWrite {
    pub stream: Stream,
    pub attributes: Attributes,
    pub when: When,
}

/// Captured output of one stream, with optional injected failures
#[derive(Default)]
struct Capture {
    bytes: Vec<u8>,
    /// Bytes accepted before every write fails
    limit: Option<usize>,
    /// Writes of exactly these bytes fail
    rejected: Vec<Vec<u8>>,
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.rejected.iter().any(|r| r.as_slice() == buf) {
            return Err(Error::new(ErrorKind::Other, "injected write failure"));
        }
        let room = match self.limit {
            Some(limit) => limit.saturating_sub(self.bytes.len()),
            None => buf.len(),
        };
        if room == 0 && !buf.is_empty() {
            return Err(Error::new(ErrorKind::BrokenPipe, "injected write failure"));
        }
        let n = buf.len().min(room);
        self.bytes.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory terminal driver
pub struct MemoryDriver {
    interactive: HashSet<Stream>,
    size: (u16, u16),
    attributes: Attributes,
    attribute_reads: Cell<usize>,
    writes: Vec<AttributeWrite>,
    /// Attribute changes accepted before every change fails
    attribute_write_limit: Option<usize>,
    input: VecDeque<u8>,
    stdout: Capture,
    stderr: Capture,
}

impl MemoryDriver {
    /// A driver where no stream is a terminal
    pub fn new() -> Self {
        Self {
            interactive: HashSet::new(),
            size: (80, 24),
            attributes: cooked_attributes(),
            attribute_reads: Cell::new(0),
            writes: Vec::new(),
            attribute_write_limit: None,
            input: VecDeque::new(),
            stdout: Capture::default(),
            stderr: Capture::default(),
        }
    }

    /// A driver where stdin, stdout and stderr are all terminals
    pub fn interactive() -> Self {
        Self::new()
            .tty(Stream::Stdin, true)
            .tty(Stream::Stdout, true)
            .tty(Stream::Stderr, true)
    }

    /// Marks `stream` as a terminal or not
    pub fn tty(mut self, stream: Stream, interactive: bool) -> Self {
        if interactive {
            self.interactive.insert(stream);
        } else {
            self.interactive.remove(&stream);
        }
        self
    }

    /// Sets the number of terminal columns
    pub fn width(mut self, columns: u16) -> Self {
        self.size.0 = columns;
        self
    }

    /// Queues bytes to be read from stdin
    pub fn input(mut self, bytes: &[u8]) -> Self {
        self.input.extend(bytes);
        self
    }

    /// Lets `count` attribute changes through, then fails every later one
    pub fn fail_attribute_writes_after(mut self, count: usize) -> Self {
        self.attribute_write_limit = Some(count);
        self
    }

    /// Accepts `count` bytes on stderr, then fails every later write
    pub fn fail_stderr_after(mut self, count: usize) -> Self {
        self.stderr.limit = Some(count);
        self
    }

    /// Fails every single write of exactly `bytes` to stderr, such as one
    /// cursor sequence
    pub fn fail_stderr_writes_of(mut self, bytes: &[u8]) -> Self {
        self.stderr.rejected.push(bytes.to_vec());
        self
    }

    /// The attributes the terminal currently has
    pub fn current_attributes(&self) -> Attributes {
        self.attributes
    }

    /// How many times attributes were read
    pub fn attribute_reads(&self) -> usize {
        self.attribute_reads.get()
    }

    /// Every attribute change, oldest first
    pub fn attribute_writes(&self) -> &[AttributeWrite] {
        &self.writes
    }

    pub fn stdout(&self) -> &[u8] {
        &self.stdout.bytes
    }

    pub fn stderr(&self) -> &[u8] {
        &self.stderr.bytes
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr.bytes).into_owned()
    }

    /// Returns and clears everything written to stderr so far
    pub fn take_stderr(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.stderr.bytes)
    }

    fn not_a_tty() -> Error {
        Error::new(ErrorKind::Other, "Inappropriate ioctl for device")
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for MemoryDriver {
    fn is_interactive(&self, stream: Stream) -> bool {
        self.interactive.contains(&stream)
    }

    fn attributes(&self, stream: Stream) -> io::Result<Attributes> {
        if !self.is_interactive(stream) {
            return Err(Self::not_a_tty());
        }
        self.attribute_reads.set(self.attribute_reads.get() + 1);
        Ok(self.attributes)
    }

    fn set_attributes(&mut self, stream: Stream, attributes: &Attributes, when: When) -> io::Result<()> {
        if !self.is_interactive(stream) {
            return Err(Self::not_a_tty());
        }
        if self.attribute_write_limit.is_some_and(|limit| self.writes.len() >= limit) {
            return Err(Error::new(ErrorKind::Other, "injected attribute failure"));
        }
        self.attributes = *attributes;
        self.writes.push(AttributeWrite {
            stream,
            attributes: *attributes,
            when,
        });
        Ok(())
    }

    fn window_size(&self) -> io::Result<(u16, u16)> {
        if !self.is_interactive(Stream::Stdout) {
            return Err(Self::not_a_tty());
        }
        Ok(self.size)
    }

    fn read_byte(&mut self, _stream: Stream) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEof, "end of input"))
    }

    fn output(&mut self, stream: OutputStream) -> &mut dyn Write {
        match stream {
            OutputStream::Stdout => &mut self.stdout,
            OutputStream::Stderr => &mut self.stderr,
        }
    }
}

/// Attributes of a terminal in its usual line-buffered, echoing state
fn cooked_attributes() -> Attributes {
    let mut raw = *Attributes::default().as_raw();
    raw.c_iflag = libc::ICRNL | libc::IXON;
    raw.c_oflag = libc::OPOST | libc::ONLCR;
    raw.c_cflag = libc::CS8 | libc::CREAD;
    raw.c_lflag = libc::ECHO | libc::ECHOE | libc::ECHOK | libc::ICANON | libc::ISIG | libc::IEXTEN;
    raw.c_cc[libc::VMIN] = 1;
    raw.c_cc[libc::VINTR] = 3;
    Attributes::from_raw(raw)
}

/// A terminal emulator for checking rendered output
pub struct TestEnv {
    /// Underlying vt100 parser for terminal emulation
    parser: Parser,
    width: u16,
    height: u16,
}

impl TestEnv {
    /// Creates a new test environment with the specified terminal size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            parser: Parser::new(height, width, 0),
            width,
            height,
        }
    }

    /// Feeds raw output, escape sequences included, to the emulator.
    ///
    /// Newlines are expanded to CR LF, as the tty's output processing does.
    pub fn process(&mut self, bytes: &[u8]) -> &mut Self {
        for line in bytes.split_inclusive(|&b| b == b'\n') {
            match line.split_last() {
                Some((b'\n', text)) => {
                    self.parser.process(text);
                    self.parser.process(b"\r\n");
                }
                _ => self.parser.process(line),
            }
        }
        self
    }

    /// Text of row `y`, without trailing blanks
    pub fn row(&self, y: u16) -> String {
        self.parser
            .screen()
            .rows(0, self.width)
            .nth(usize::from(y))
            .map(|row| row.trim_end().to_string())
            .unwrap_or_default()
    }

    /// All non-empty rows, joined with newlines
    pub fn contents(&self) -> String {
        let rows: Vec<String> = (0..self.height).map(|y| self.row(y)).collect();
        rows.join("\n").trim_end().to_string()
    }

    /// Gets the current cursor position as (x, y)
    pub fn cursor_pos(&self) -> (u16, u16) {
        let pos = self.parser.screen().cursor_position();
        (pos.1, pos.0)
    }

    /// Whether the cell at (x, y) is drawn bold
    pub fn is_bold(&self, x: u16, y: u16) -> bool {
        self.parser
            .screen()
            .cell(y, x)
            .map(|cell| cell.bold())
            .unwrap_or(false)
    }

    /// Dumps the screen with line numbers and cursor position
    ///
    /// This is useful for debugging test failures.
    pub fn dump_screen(&self) -> String {
        let (cursor_x, cursor_y) = self.cursor_pos();
        let mut result = format!(
            "Screen Buffer ({}x{}, cursor at ({}, {})):\n",
            self.width, self.height, cursor_x, cursor_y
        );
        for y in 0..self.height {
            let marker = if y == cursor_y { ">" } else { " " };
            result.push_str(&format!("{}{:3}: {}\n", marker, y, self.row(y)));
        }
        result
    }
}
