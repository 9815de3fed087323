//! Tracing setup with file-based output.
//!
//! The state operations are instrumented with `tracing` spans and events. This
//! module installs a subscriber that writes them to a size-rotated file:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → trace file (+ backups)
//! ```
//!
//! # Configuration
//!
//! - `trace_file`: where to write; nothing is installed when unset
//! - `trace_level`: an `EnvFilter` directive such as `"debug"` or
//!   `"bookmark_state::state=trace"`. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, DEFAULT_TRACE_LEVEL};
