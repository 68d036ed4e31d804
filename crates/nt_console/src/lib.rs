#![deny(unused_imports)]

//! Status lines, progress bars and prompts for command-line programs
//!
//! Everything starts from a [`Console`]. An operation runs inside a scope
//! that borrows the console, draws its caption on stderr and always leaves
//! the terminal clean, however the operation ends:
//!
//! - [`Console::pending`] shows `[BUSY]` then `[DONE]` or `[FAIL]`
//! - [`Console::progress`] draws a bar updated through [`ProgressBar`]
//! - [`Console::without_echo`] and [`Console::flags`] change the stdin line
//!   discipline and put it back
//! - [`Console::ask`] asks a yes/no question answered with one keystroke
//!
//! Output degrades to plain text when the streams are not terminals.

pub mod config;
mod console;
pub mod errors;
mod interrupt;
pub mod scope;
pub mod terminal;
pub mod test_utils;
pub mod ui;

pub use config::{ConsoleConfig, Palette};
pub use console::Console;
pub use errors::{ConsoleError, Result};
pub use interrupt::Interrupt;
pub use scope::{ModeGuard, Status};
pub use terminal::{Driver, ModeFlags, OutputStream, Stream, Style, SystemDriver, TextChunk};
pub use ui::ProgressBar;
