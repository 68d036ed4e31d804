use log::debug;

use crate::console::Console;
use crate::errors::Result;
use crate::terminal::{Driver, OutputStream, Stream, TextChunk};

impl<D: Driver> Console<D> {
    /// Asks a yes/no question and waits for a single keystroke.
    ///
    /// The question is written to stderr as `:: <message> [Y/n]?` or
    /// `:: <message> [y/N]?` depending on `default`. Only the letter opposite
    /// to the default, in either case, changes the answer; any other key
    /// keeps it. When stdin is not a terminal nothing is written and the
    /// default is returned.
    ///
    /// # Parameters
    /// * `message` - The question, without prefix or suffix
    /// * `default` - The answer given by any key but the opposite letter
    ///
    /// # Returns
    /// The answer, or the error from reading the keystroke
    pub fn ask(&mut self, message: &[TextChunk], default: bool) -> Result<bool> {
        if !self.is_interactive(Stream::Stdin) {
            debug!("stdin is not a terminal, answering {}", default);
            return Ok(default);
        }

        let palette = &self.config().palette;
        let (frame, letter) = (palette.prompt.clone(), palette.prompt_default.clone());
        let (suffix, flips): ([TextChunk; 3], &[u8]) = if default {
            (
                [
                    TextChunk::styled(" [", frame.clone()),
                    TextChunk::styled("Y", letter),
                    TextChunk::styled("/n]?", frame.clone()),
                ],
                b"nN",
            )
        } else {
            (
                [
                    TextChunk::styled(" [y/", frame.clone()),
                    TextChunk::styled("N", letter),
                    TextChunk::styled("]?", frame.clone()),
                ],
                b"yY",
            )
        };

        let mut question = Vec::with_capacity(message.len() + 4);
        question.push(TextChunk::styled(":: ", frame));
        question.extend_from_slice(message);
        question.extend(suffix);
        self.write(OutputStream::Stderr, &question)?;

        let key = self.read();
        self.write(OutputStream::Stderr, &[TextChunk::plain("\n")])?;
        let key = key?;

        Ok(if flips.contains(&key) { !default } else { default })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConsoleConfig;
    use crate::console::Console;
    use crate::terminal::Stream;
    use crate::test_utils::MemoryDriver;

    fn ask(driver: MemoryDriver, default: bool) -> (bool, String) {
        let mut console = Console::with_driver(driver, ConsoleConfig::default());
        let answer = console.ask(&["restart".into()], default).unwrap();
        (answer, console.driver().stderr_text())
    }

    #[test]
    fn test_default_yes_flipped_by_n() {
        let (answer, out) = ask(MemoryDriver::interactive().input(b"N"), true);
        assert!(!answer);
        assert_eq!(
            out,
            concat!(
                "\x1b[35;01m:: \x1b[00mrestart",
                "\x1b[35;01m [\x1b[00m\x1b[35mY\x1b[00m\x1b[35;01m/n]?\x1b[00m",
                "\n"
            )
        );
    }

    #[test]
    fn test_other_keys_keep_default() {
        assert!(ask(MemoryDriver::interactive().input(b"y"), true).0);
        assert!(ask(MemoryDriver::interactive().input(b"x"), true).0);
        assert!(!ask(MemoryDriver::interactive().input(b"\r"), false).0);
    }

    #[test]
    fn test_default_no_flipped_by_y() {
        let (answer, out) = ask(MemoryDriver::interactive().input(b"y"), false);
        assert!(answer);
        assert!(out.contains("\x1b[35;01m [y/\x1b[00m\x1b[35mN\x1b[00m\x1b[35;01m]?\x1b[00m"));
    }

    #[test]
    fn test_non_interactive_returns_default_silently() {
        let driver = MemoryDriver::interactive().tty(Stream::Stdin, false).input(b"n");
        let (answer, out) = ask(driver, true);
        assert!(answer);
        assert!(out.is_empty());
    }

    #[test]
    fn test_newline_written_when_read_fails() {
        let mut console = Console::with_driver(MemoryDriver::interactive(), ConsoleConfig::default());
        assert!(console.ask(&["restart".into()], true).is_err());
        assert!(console.driver().stderr_text().ends_with('\n'));
        assert_eq!(
            console.driver().current_attributes(),
            MemoryDriver::interactive().current_attributes()
        );
    }
}
