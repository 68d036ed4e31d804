//! Driver for the process' own standard streams.

use std::io::{self, Error, ErrorKind, Stderr, Stdout, Write};
use std::mem;

use crossterm::tty::IsTty;
use libc::c_int;

use super::attributes::{Attributes, When};
use super::driver::{Driver, OutputStream, Stream};

const STDIN_FD: c_int = libc::STDIN_FILENO;
const STDOUT_FD: c_int = libc::STDOUT_FILENO;
const STDERR_FD: c_int = libc::STDERR_FILENO;

/// Terminal driver backed by stdin, stdout and stderr
pub struct SystemDriver {
    stdout: Stdout,
    stderr: Stderr,
}

impl SystemDriver {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            stderr: io::stderr(),
        }
    }

    fn fd(stream: Stream) -> c_int {
        match stream {
            Stream::Stdin => STDIN_FD,
            Stream::Stdout => STDOUT_FD,
            Stream::Stderr => STDERR_FD,
        }
    }
}

impl Default for SystemDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for SystemDriver {
    fn is_interactive(&self, stream: Stream) -> bool {
        match stream {
            Stream::Stdin => io::stdin().is_tty(),
            Stream::Stdout => self.stdout.is_tty(),
            Stream::Stderr => self.stderr.is_tty(),
        }
    }

    fn attributes(&self, stream: Stream) -> io::Result<Attributes> {
        let mut raw = mem::MaybeUninit::uninit();
        if 0 > unsafe { libc::tcgetattr(Self::fd(stream), raw.as_mut_ptr()) } {
            let err = Error::last_os_error();
            return Err(Error::new(err.kind(), format!("Unable to get terminal mode: {}", err)));
        }
        Ok(Attributes::from_raw(unsafe { raw.assume_init() }))
    }

    fn set_attributes(&mut self, stream: Stream, attributes: &Attributes, when: When) -> io::Result<()> {
        if 0 > unsafe { libc::tcsetattr(Self::fd(stream), when.as_raw(), attributes.as_raw()) } {
            let err = Error::last_os_error();
            return Err(Error::new(err.kind(), format!("Unable to set terminal mode: {}", err)));
        }
        Ok(())
    }

    fn window_size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn read_byte(&mut self, stream: Stream) -> io::Result<u8> {
        // Bypass the buffered std handle so nothing beyond this byte is consumed
        let mut byte = 0u8;
        loop {
            let cnt = unsafe { libc::read(Self::fd(stream), &mut byte as *mut u8 as *mut _, 1) };
            match cnt {
                1 => return Ok(byte),
                0 => return Err(Error::new(ErrorKind::UnexpectedEof, "end of input")),
                _ => {
                    let err = Error::last_os_error();
                    if err.kind() != ErrorKind::Interrupted {
                        return Err(err);
                    }
                }
            }
        }
    }

    fn output(&mut self, stream: OutputStream) -> &mut dyn Write {
        match stream {
            OutputStream::Stdout => &mut self.stdout,
            OutputStream::Stderr => &mut self.stderr,
        }
    }
}
