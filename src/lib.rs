//! rexec - command and file orchestration over a persistent R session
//!
//! rexec sits between a service and an already-open R session. It evaluates
//! expressions so that R errors come back as values instead of breaking the
//! session, and it stages payloads (workspaces, parquet tables, resource
//! descriptors) into the session's scratch directory, cleaning them up
//! afterwards.
//!
//! # Quick Start
//!
//! ```ignore
//! use rexec::{Executor, MemorySource};
//!
//! let executor = Executor::new();
//!
//! // Evaluate; a failing expression is Error::Evaluation, the session survives
//! let reply = executor.execute(&mut session, "summary(D)")?;
//!
//! // Restore a workspace saved earlier
//! let mut snapshot = MemorySource::new(saved_bytes);
//! executor.load_workspace(&mut session, &mut snapshot, "globalenv()")?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which borrows a caller-owned
//! [`RSession`] for each call. Opening, pooling and closing sessions is the
//! caller's concern.

// Re-export the public API from rexec-executor
pub use rexec_executor::*;
