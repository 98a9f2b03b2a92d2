//! Terminal presentation: progress display and keyboard controls.

pub mod keys;
pub mod progress;

pub use keys::{JobKey, spawn_key_reader};
pub use progress::DownloadProgressPrinter;
