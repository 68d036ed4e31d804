use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::palette::Palette;
use crate::errors::Result;

/// Layout and appearance settings for a [`Console`](crate::Console)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Width used when stdout is not a terminal or its size is unknown
    pub fallback_width: usize,
    /// Columns reserved after a status caption for ` [BUSY]`
    pub status_width: usize,
    /// Total width of a progress bar, including brackets and percentage
    pub bar_length: usize,
    /// Columns of a progress bar that are not glyphs: `[`, `] ` and `100%`
    pub bar_overhead: usize,
    /// Glyph for the completed part of a progress bar
    pub fill_glyph: char,
    /// Glyph for the remaining part of a progress bar
    pub empty_glyph: char,
    /// Colors
    pub palette: Palette,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            fallback_width: 80,
            status_width: 7,
            bar_length: 30,
            bar_overhead: 7,
            fill_glyph: '#',
            empty_glyph: '-',
            palette: Palette::default(),
        }
    }
}

impl ConsoleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the width used when the terminal size is unavailable
    pub fn fallback_width(mut self, width: usize) -> Self {
        self.fallback_width = width;
        self
    }

    /// Set the default total length of progress bars
    pub fn bar_length(mut self, length: usize) -> Self {
        self.bar_length = length;
        self
    }

    /// Set the glyphs used to draw progress bars
    pub fn glyphs(mut self, fill: char, empty: char) -> Self {
        self.fill_glyph = fill;
        self.empty_glyph = empty;
        self
    }

    /// Set the color palette
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}
