//! Structured logging to a size-rotated file.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → cityfinder.log
//! ```
//!
//! # Features
//!
//! - **File Output**: `cityfinder.log` in the data directory
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Level Control**: `RUST_LOG`, then the `trace_level` option, then `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
