//! Caption layout
//!
//! A caption is a single line of chunks that precedes a status indicator or
//! a progress bar. Before it is written the line is fitted to the room left
//! by the indicator, so that the indicator always lands in the same column.

use super::style::TextChunk;

/// Fits `chunks` into exactly `budget` terminal columns.
///
/// Chunks are kept whole while they fit. The first chunk that does not fit
/// is truncated from the front, keeping its last characters, and every
/// chunk after it is dropped. A line shorter than the budget is padded with
/// a single plain chunk of spaces. A budget of zero yields no chunks.
///
/// Widths are measured per grapheme cluster with `unicode-width`; a wide
/// character cut in half by the budget is replaced by a space.
///
/// # Parameters
/// * `budget` - The number of columns the caption must occupy
/// * `chunks` - The caption line to fit
///
/// # Returns
/// The fitted caption line
pub fn layout(budget: usize, chunks: &[TextChunk]) -> Vec<TextChunk> {
    let mut remaining = budget;
    let mut caption = Vec::with_capacity(chunks.len() + 1);

    for chunk in chunks {
        if remaining == 0 {
            break;
        }
        let width = chunk.width();
        if width <= remaining {
            caption.push(chunk.clone());
            remaining -= width;
        } else {
            caption.push(chunk.tail(remaining));
            remaining = 0;
        }
    }

    if remaining > 0 {
        caption.push(TextChunk::Plain(" ".repeat(remaining)));
    }

    caption
}

/// Total number of columns a caption line occupies
pub fn line_width(chunks: &[TextChunk]) -> usize {
    chunks.iter().map(TextChunk::width).sum()
}
