//! Testing utilities for code that drives an [`RSession`](rexec_core::RSession)
//!
//! - **RecordingSession**: in-memory session with a flat remote filesystem,
//!   an ordered call transcript, scripted replies and fault injection
//!
//! # Example
//!
//! ```ignore
//! use rexec_executor::testing::{RecordingSession, SessionCall};
//! use rexec_executor::Executor;
//!
//! let mut session = RecordingSession::new();
//! Executor::new().execute(&mut session, "1 + 1")?;
//! assert_eq!(session.calls(), vec![SessionCall::Eval("try({1 + 1})".into())]);
//! ```

mod session;

pub use session::{RecordingSession, SessionCall, WriteStats};
