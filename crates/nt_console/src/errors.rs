use std::io;
use thiserror::Error;

/// Errors that can occur when working with the nt_console library
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Writing to or reading from the terminal failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The user pressed Ctrl-C while an operation was running
    #[error("interrupted by user")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
