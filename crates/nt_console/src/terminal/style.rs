use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// An SGR parameter string, e.g. `"35;01"` for bold magenta
///
/// The code is written verbatim between `ESC[` and `m`, so any attribute
/// combination the terminal understands can be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(Cow<'static, str>);

impl Style {
    /// Creates a style from a static SGR code
    pub const fn code(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Creates a style from an owned SGR code
    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    /// The raw SGR parameters
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One piece of a caption line: either plain text or text with a style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextChunk {
    Plain(String),
    Styled(String, Style),
}

impl TextChunk {
    /// Creates a plain chunk
    pub fn plain(text: impl Into<String>) -> Self {
        TextChunk::Plain(text.into())
    }

    /// Creates a styled chunk
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        TextChunk::Styled(text.into(), style)
    }

    /// The text of the chunk, without any styling
    pub fn text(&self) -> &str {
        match self {
            TextChunk::Plain(text) | TextChunk::Styled(text, _) => text,
        }
    }

    /// The style of the chunk, if any
    pub fn style(&self) -> Option<&Style> {
        match self {
            TextChunk::Plain(_) => None,
            TextChunk::Styled(_, style) => Some(style),
        }
    }

    /// Number of terminal columns the text occupies
    ///
    /// Each grapheme cluster is measured on its own, so East Asian wide
    /// characters count as two columns and combining marks as none.
    pub fn width(&self) -> usize {
        self.text().graphemes(true).map(UnicodeWidthStr::width).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Returns a chunk with the same style holding the trailing graphemes of
    /// the text that fit in `keep` columns.
    ///
    /// When a wide character straddles the cut it is dropped and replaced by
    /// a leading space, so the result is exactly `keep` columns wide whenever
    /// the text is at least that wide.
    pub fn tail(&self, keep: usize) -> Self {
        let mut kept = Vec::new();
        let mut used = 0;
        for grapheme in self.text().graphemes(true).rev() {
            let width = grapheme.width();
            if used + width > keep {
                break;
            }
            used += width;
            kept.push(grapheme);
        }

        let pad = if self.width() >= keep { keep - used } else { 0 };
        let mut text = " ".repeat(pad);
        text.extend(kept.into_iter().rev());
        match self {
            TextChunk::Plain(_) => TextChunk::Plain(text),
            TextChunk::Styled(_, style) => TextChunk::Styled(text, style.clone()),
        }
    }
}

impl From<&str> for TextChunk {
    fn from(text: &str) -> Self {
        TextChunk::Plain(text.to_string())
    }
}

impl From<String> for TextChunk {
    fn from(text: String) -> Self {
        TextChunk::Plain(text)
    }
}

impl<T: Into<String>> From<(T, Style)> for TextChunk {
    fn from((text, style): (T, Style)) -> Self {
        TextChunk::Styled(text.into(), style)
    }
}

impl<T: Into<String>> From<(T, &Style)> for TextChunk {
    fn from((text, style): (T, &Style)) -> Self {
        TextChunk::Styled(text.into(), style.clone())
    }
}
