//! Terminal handling module
//!
//! This module provides the low-level pieces the scopes are built from:
//! - The driver trait and the system driver
//! - Terminal attribute snapshots and local mode flags
//! - Styled text chunks and the styled writer
//! - Caption layout
//! - Cursor save/restore

mod attributes;
mod cursor;
mod driver;
mod style;
mod system;
mod text;
mod writer;

pub use attributes::{Attributes, ModeFlags, When};
pub use cursor::{restore_position, save_position};
pub use driver::{Driver, OutputStream, Stream};
pub use style::{Style, TextChunk};
pub use system::SystemDriver;
pub use text::{layout, line_width};
pub use writer::{write_chunks, RESET};
