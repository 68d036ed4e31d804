use std::fmt;

use log::{trace, warn};

use crate::config::Palette;
use crate::console::Console;
use crate::errors::{ConsoleError, Result};
use crate::terminal::{layout, Driver, OutputStream, Stream, TextChunk};

/// A progress bar drawn in place on stderr
///
/// The bar is drawn after its caption as `[####------] 40%` and redrawn in
/// place on every [`set_value`](ProgressBar::set_value). Nothing but the
/// caption and a final newline is written when stderr is not a terminal.
pub struct ProgressBar<'a, D: Driver> {
    console: &'a mut Console<D>,
    /// Number of glyphs between the brackets
    length: usize,
    /// The current progress value (0.0 to 1.0)
    value: f64,
    interactive: bool,
    finished: bool,
}

impl<'a, D: Driver> ProgressBar<'a, D> {
    fn begin(console: &'a mut Console<D>, caption: &[TextChunk], total_length: usize) -> Result<Self> {
        // Brackets and percentage are drawn whatever the requested length
        let overhead = console.config().bar_overhead;
        let total_length = total_length.max(overhead);
        let budget = console.width().saturating_sub(total_length);
        console.write(OutputStream::Stderr, &layout(budget, caption))?;

        let length = total_length - overhead;
        let interactive = console.is_interactive(Stream::Stderr);
        let mut bar = Self {
            console,
            length,
            value: 0.0,
            interactive,
            finished: false,
        };

        if interactive {
            let open = [TextChunk::styled("[", bar.palette().bar_frame.clone())];
            bar.console.write(OutputStream::Stderr, &open)?;
            bar.console.save_cursor(OutputStream::Stderr)?;
            let empty = bar.glyphs(0);
            bar.console.write(OutputStream::Stderr, &empty)?;
        }
        Ok(bar)
    }

    /// Number of glyphs between the brackets
    pub fn length(&self) -> usize {
        self.length
    }

    /// The last value drawn
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of filled glyphs currently drawn
    pub fn filled(&self) -> usize {
        filled_glyphs(self.length, self.value)
    }

    /// Redraws the bar at `value`, between 0.0 and 1.0.
    ///
    /// Values outside that range, and any value while stderr is not a
    /// terminal, are ignored.
    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if !self.interactive {
            return Ok(());
        }
        if !(0.0..=1.0).contains(&value) {
            trace!("ignoring progress value {} outside 0..=1", value);
            return Ok(());
        }

        self.value = value;
        let glyphs = self.glyphs(filled_glyphs(self.length, value));
        self.console.restore_cursor(OutputStream::Stderr)?;
        self.console.write(OutputStream::Stderr, &glyphs)
    }

    /// Fills and empty runs, closing bracket and percentage label
    fn glyphs(&self, filled: usize) -> [TextChunk; 4] {
        let config = self.console.config();
        let palette = &config.palette;
        let fill: String = std::iter::repeat(config.fill_glyph).take(filled).collect();
        let empty: String = std::iter::repeat(config.empty_glyph)
            .take(self.length.saturating_sub(filled))
            .collect();
        [
            TextChunk::styled(fill, palette.bar.clone()),
            TextChunk::styled(empty, palette.bar.clone()),
            TextChunk::styled("] ", palette.bar_frame.clone()),
            TextChunk::styled(format!("{:>3}%", percent(self.value)), palette.percent.clone()),
        ]
    }

    fn palette(&self) -> &Palette {
        &self.console.config().palette
    }

    /// Ends the bar: draws 100% if the operation completed, then moves to
    /// the next line.
    fn finish(&mut self, completed: bool) -> Result<()> {
        self.finished = true;
        let completed = if completed { self.set_value(1.0) } else { Ok(()) };
        let newline = self.console.write(OutputStream::Stderr, &[TextChunk::plain("\n")]);
        completed?;
        newline
    }
}

impl<'a, D: Driver> Drop for ProgressBar<'a, D> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.finish(false) {
                warn!("unable to finish progress bar: {}", e);
            }
        }
    }
}

/// Number of filled glyphs for `value` on a bar of `length` glyphs.
///
/// Rounds half away from zero.
pub fn filled_glyphs(length: usize, value: f64) -> usize {
    let filled = (length as f64 * value).round();
    if filled <= 0.0 {
        0
    } else {
        (filled as usize).min(length)
    }
}

/// Percentage label for `value`, rounded half away from zero
pub fn percent(value: f64) -> u32 {
    (value * 100.0).round().clamp(0.0, 100.0) as u32
}

impl<D: Driver> Console<D> {
    /// Runs `body` with a progress bar of the configured length
    pub fn progress<T, E, F>(&mut self, caption: &[TextChunk], body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut ProgressBar<'_, D>) -> std::result::Result<T, E>,
        E: From<ConsoleError> + fmt::Display,
    {
        let length = self.config().bar_length;
        self.progress_with_length(caption, length, body)
    }

    /// Runs `body` with a progress bar `length` columns wide, brackets and
    /// percentage included.
    ///
    /// The caption is fitted into the rest of the line. When `body` succeeds
    /// the bar is drawn full before the line ends; when it fails the bar is
    /// left where it was and the error is returned unchanged.
    pub fn progress_with_length<T, E, F>(
        &mut self,
        caption: &[TextChunk],
        length: usize,
        body: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut ProgressBar<'_, D>) -> std::result::Result<T, E>,
        E: From<ConsoleError> + fmt::Display,
    {
        let mut bar = ProgressBar::begin(self, caption, length)?;
        let result = body(&mut bar);
        let finished = bar.finish(result.is_ok());

        match result {
            Ok(value) => {
                finished?;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = finished {
                    warn!("unable to finish progress bar after {}: {}", err, e);
                }
                Err(err)
            }
        }
    }
}
