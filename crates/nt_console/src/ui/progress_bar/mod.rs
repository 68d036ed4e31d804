mod bar;

pub use bar::{filled_glyphs, percent, ProgressBar};
