//! Path utilities for the bundled download tool and destination folders.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - `locate_tool` is a pure function; environment detection is kept in
//!   `platform` so tests can pass explicit roots
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod ensure;
mod error;
mod platform;
mod tool;

// Error type
pub use error::PathError;

// Platform detection and roots
pub use platform::{ExecutionMode, HostPlatform, repo_root, resource_root};

// Tool binary location
pub use tool::{TOOL_BASE_NAME, ToolRoots, locate_tool, resolve_tool_path};

// Directory operations
pub use ensure::ensure_directory;
