use std::fmt;
use std::thread;

use log::warn;

use crate::console::Console;
use crate::errors::{ConsoleError, Result};
use crate::terminal::{layout, Driver, OutputStream, Stream, TextChunk};

/// Outcome of an operation running inside [`Console::pending`]
///
/// The operation receives a mutable reference and may mark itself failed
/// with an explanation, or take over the terminal by suppressing the final
/// indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    failed: bool,
    messages: Vec<TextChunk>,
    suppressed: bool,
}

impl Status {
    /// Marks the operation failed. `messages` are written through the error
    /// sink after the `FAIL` indicator and replace those of any earlier call.
    pub fn fail<I, C>(&mut self, messages: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<TextChunk>,
    {
        self.failed = true;
        self.messages = messages.into_iter().map(Into::into).collect();
    }

    /// Skips the final indicator. The caller is then responsible for
    /// leaving the line in a sensible state.
    pub fn suppress(&mut self) {
        self.suppressed = true;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn messages(&self) -> &[TextChunk] {
        &self.messages
    }
}

/// A status line between its caption and its final indicator
struct StatusLine<'a, D: Driver> {
    console: &'a mut Console<D>,
    status: Status,
    interactive: bool,
    finished: bool,
}

impl<'a, D: Driver> StatusLine<'a, D> {
    fn begin(console: &'a mut Console<D>, caption: &[TextChunk]) -> Result<Self> {
        let budget = console.width().saturating_sub(console.config().status_width);
        console.write(OutputStream::Stderr, &layout(budget, caption))?;

        let interactive = console.is_interactive(Stream::Stderr);
        if interactive {
            let palette = &console.config().palette;
            let busy = [
                TextChunk::styled(" [", palette.frame.clone()),
                TextChunk::styled("BUSY", palette.busy.clone()),
                TextChunk::styled("]", palette.frame.clone()),
            ];
            console.save_cursor(OutputStream::Stderr)?;
            console.write(OutputStream::Stderr, &busy)?;
        }

        Ok(Self {
            console,
            status: Status::default(),
            interactive,
            finished: false,
        })
    }

    /// Writes the final indicator, exactly once.
    ///
    /// The indicator and the messages are written even if moving the cursor
    /// back failed; the first error is returned.
    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.status.suppressed {
            return Ok(());
        }

        let restored = if self.interactive {
            self.console.restore_cursor(OutputStream::Stderr)
        } else {
            Ok(())
        };

        let palette = &self.console.config().palette;
        let (label, style) = if self.status.failed {
            ("FAIL", palette.fail.clone())
        } else {
            ("DONE", palette.done.clone())
        };
        let indicator = [
            TextChunk::styled(" [", palette.frame.clone()),
            TextChunk::styled(label, style),
            TextChunk::styled("]\n", palette.frame.clone()),
        ];
        let written = self.console.write(OutputStream::Stderr, &indicator);

        let reported = if self.status.failed && !self.status.messages.is_empty() {
            self.console.error(&self.status.messages)
        } else {
            Ok(())
        };

        restored?;
        written?;
        reported
    }

    /// Records an error the operation returned without marking itself failed
    fn record_error(&mut self, err: &dyn fmt::Display) {
        if self.status.failed {
            return;
        }
        let highlight = self.console.config().palette.highlight.clone();
        self.status.fail([
            TextChunk::plain("unhandled error "),
            TextChunk::styled(err.to_string(), highlight),
            TextChunk::plain(" was caught\n"),
        ]);
    }
}

impl<'a, D: Driver> Drop for StatusLine<'a, D> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if thread::panicking() && !self.status.failed {
            self.status.fail(["operation panicked\n"]);
        }
        if let Err(e) = self.finish() {
            warn!("unable to finish status line: {}", e);
        }
    }
}

impl<D: Driver> Console<D> {
    /// Runs `body` behind a status line.
    ///
    /// `caption` is fitted to the terminal width and followed by ` [BUSY]`
    /// while `body` runs, then by ` [DONE]` or ` [FAIL]`. On a
    /// non-interactive stderr the busy indicator is skipped and the final one
    /// is appended to the caption.
    ///
    /// An error returned by `body` marks the status failed (unless `body`
    /// already did so with its own messages) and is returned unchanged after
    /// the `FAIL` indicator has been written. A panic in `body` also ends
    /// the line with `FAIL` while unwinding.
    pub fn pending<T, E, F>(&mut self, caption: &[TextChunk], body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Status) -> std::result::Result<T, E>,
        E: From<ConsoleError> + fmt::Display,
    {
        let mut line = StatusLine::begin(self, caption)?;
        let result = body(&mut line.status);
        if let Err(err) = &result {
            line.record_error(err);
        }
        let finished = line.finish();

        match result {
            Ok(value) => {
                finished?;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = finished {
                    warn!("unable to finish status line: {}", e);
                }
                Err(err)
            }
        }
    }
}
