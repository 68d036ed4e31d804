pub mod progress_bar;
mod prompt;

// Re-export commonly used items
pub use progress_bar::ProgressBar;
