use std::io::{self, Write};

use crossterm::cursor::{RestorePosition, SavePosition};
use crossterm::Command;

/// Saves the cursor position (`ESC 7`)
pub fn save_position(w: &mut dyn Write) -> io::Result<()> {
    write_command(w, SavePosition)
}

/// Moves the cursor back to the last saved position (`ESC 8`)
pub fn restore_position(w: &mut dyn Write) -> io::Result<()> {
    write_command(w, RestorePosition)
}

fn write_command(w: &mut dyn Write, command: impl Command) -> io::Result<()> {
    let mut ansi = String::new();
    command
        .write_ansi(&mut ansi)
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "failed to format escape sequence"))?;
    w.write_all(ansi.as_bytes())
}
