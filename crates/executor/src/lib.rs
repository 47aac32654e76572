//! # rexec Executor
//!
//! Drives a persistent R session: evaluates expressions inside an
//! error-trapping envelope, and stages workspaces, parquet tables and
//! resource descriptors into the session's scratch directory.
//!
//! This is the only crate users need to import. It provides:
//! - [`Executor`] - evaluate, save/load workspace, load table, load resource
//! - [`FileShuttle`] - buffered streaming of payloads into remote files
//! - [`Command`] - the exact R text every operation sends
//! - [`testing::RecordingSession`] - an in-memory session for tests
//!
//! ## Quick Start
//!
//! ```text
//! use rexec_executor::{Executor, FileSource};
//!
//! let executor = Executor::new();
//!
//! // Any expression; backend errors come back as Error::Evaluation
//! let reply = executor.execute(&mut session, "mean(c(1, 2, 3))")?;
//!
//! // Stage a parquet file and bind it to `D`, keeping two columns
//! let mut source = FileSource::new("/data/project/table.parquet");
//! executor.load_table(&mut session, &mut source, "project/table.parquet", "D",
//!     &["age".into(), "sex".into()])?;
//! ```
//!
//! ## Operations
//!
//! | Operation | R commands sent |
//! |-----------|-----------------|
//! | `execute` | `try({<expr>})` |
//! | `save_workspace` | `base::save.image()`, then `.RData` is streamed out |
//! | `load_workspace` | upload `.RData`, `base::load(...)`, `base::unlink('.RData')` |
//! | `load_table` | upload, `arrow::read_parquet(...)` into a binding, unlink |
//! | `load_resource` | upload, `resourcer::newResourceClient(...)` into a binding, unlink |
//!
//! Every command is sent inside the trap envelope, including the cleanup
//! `unlink`s.

#![warn(missing_docs)]

mod command;
mod config;
mod executor;
mod shuttle;

pub mod testing;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::{remote_file_name, string_literal, string_vector, trap, Command};
pub use config::{ConfigError, ExecutorConfig, CONFIG_FILE_NAME};
pub use executor::Executor;
pub use shuttle::FileShuttle;

// Re-export core types so users don't need rexec-core directly
pub use rexec_core::{
    display_size, ByteSource, Error, ErrorKind, FileSource, MemorySource, RSession, ReaderSource,
    Reply, ReplyData, ReplyMismatch, SessionError, SessionResult, TRANSFER_BUFFER_BYTES,
    WORKSPACE_FILE,
};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
