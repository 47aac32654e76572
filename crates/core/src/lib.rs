//! Core types and traits for rexec
//!
//! This crate defines the foundational types shared by the executor layer:
//! - RSession: The consumed session abstraction (eval + remote file streams)
//! - Reply: Structured evaluation reply with class attributes
//! - Error: Evaluation / transport error hierarchy
//! - ByteSource: Caller-owned payloads streamed into a session
//! - Limits: Transfer buffer size, well-known file names, size formatting

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod reply;
pub mod session;
pub mod source;

pub use error::{Error, ErrorKind, Result, SessionError, SessionResult};
pub use limits::{
    display_size, NULL_REPLY_MESSAGE, TRANSFER_BUFFER_BYTES, TRY_ERROR_CLASS, WORKSPACE_FILE,
};
pub use reply::{Reply, ReplyData, ReplyMismatch};
pub use session::RSession;
pub use source::{ByteSource, FileSource, MemorySource, ReaderSource};
