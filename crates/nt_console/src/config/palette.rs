use serde::{Deserialize, Serialize};

use crate::terminal::Style;

/// Styles used for every colored element the console draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Brackets around the status indicator
    pub frame: Style,
    /// The `BUSY` label
    pub busy: Style,
    /// The `DONE` label
    pub done: Style,
    /// The `FAIL` label
    pub fail: Style,
    /// `:: error ` prefix
    pub error: Style,
    /// `:: warning ` prefix
    pub warning: Style,
    /// `:: info ` prefix
    pub info: Style,
    /// Emphasised text inside messages, e.g. an error description
    pub highlight: Style,
    /// Brackets around the progress bar
    pub bar_frame: Style,
    /// Filled and empty glyphs of the progress bar
    pub bar: Style,
    /// Percentage label next to the progress bar
    pub percent: Style,
    /// `:: ` prefix and brackets of a question
    pub prompt: Style,
    /// The default answer letter of a question
    pub prompt_default: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            frame: Style::code("35;01"),
            busy: Style::code("35"),
            done: Style::code("32;01"),
            fail: Style::code("31;01"),
            error: Style::code("31;01"),
            warning: Style::code("33;01"),
            info: Style::code("32;01"),
            highlight: Style::code("37;01"),
            bar_frame: Style::code("35"),
            bar: Style::code("35;01"),
            percent: Style::code("37;01"),
            prompt: Style::code("35;01"),
            prompt_default: Style::code("35"),
        }
    }
}
