// Config module exports
// Contains the console layout settings and the color palette

mod console_config;
mod palette;

pub use console_config::ConsoleConfig;
pub use palette::Palette;
