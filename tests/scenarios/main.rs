//! End-to-end scenario suite
//!
//! Drives the public `rexec` API against the in-memory recording session and
//! checks the exact command sequence each operation sends.
//!
//! ## Modules
//!
//! - `evaluate`: trap envelope and error classification (E1, E2)
//! - `operations`: load table / workspace / resource, save workspace (E3-E7)
//! - `host_files`: payloads read from the host filesystem
//! - `threads`: one executor serving sessions on several threads
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test scenarios
//!
//! # One module only
//! cargo test --test scenarios operations::
//! ```

use rexec::testing::SessionCall;

mod evaluate;
mod host_files;
mod operations;
mod threads;

/// The trapped form of `text`, as it appears in the session transcript.
pub fn trapped(text: &str) -> SessionCall {
    SessionCall::Eval(format!("try({{{}}})", text))
}
