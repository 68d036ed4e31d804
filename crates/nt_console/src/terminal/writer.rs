use std::io::{self, Write};

use super::style::TextChunk;

/// Sequence that ends any styled run
pub const RESET: &[u8] = b"\x1b[00m";

/// Writes a caption line to `w` and flushes it.
///
/// On an interactive stream every styled chunk is wrapped in its SGR
/// sequence and followed by [`RESET`]; the reset is written even if the
/// text itself could not be. On other streams styles are dropped and only
/// the text goes out.
pub fn write_chunks(w: &mut dyn Write, interactive: bool, chunks: &[TextChunk]) -> io::Result<()> {
    for chunk in chunks {
        match chunk {
            TextChunk::Styled(text, style) if interactive => {
                w.write_all(format!("\x1b[{}m", style).as_bytes())?;
                let written = w.write_all(text.as_bytes());
                let reset = w.write_all(RESET);
                written?;
                reset?;
            }
            TextChunk::Plain(text) | TextChunk::Styled(text, _) => {
                w.write_all(text.as_bytes())?;
            }
        }
    }
    w.flush()
}
