//! Command handlers.
//!
//! Handlers are thin wrappers that:
//! 1. Merge CLI flags with settings
//! 2. Call the downloader
//! 3. Format output for the terminal

pub mod download;
pub mod paths;
