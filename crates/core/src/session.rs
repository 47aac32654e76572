//! Session abstraction
//!
//! An [`RSession`] is an already-open channel to one backend instance. The
//! executor never opens, closes or pools sessions; it borrows one for the
//! length of a single operation. Callers keep a session exclusive for that
//! time (`&mut` enforces it within one thread).
//!
//! Remote file streams borrow the session mutably, so a stream cannot
//! outlive the operation that opened it, and no command can be sent while
//! a stream is still open.

use std::io::{Read, Write};

use crate::error::SessionResult;
use crate::reply::Reply;

/// An open, stateful connection to one backend
pub trait RSession {
    /// Evaluate `expr` verbatim and return the decoded reply
    ///
    /// `Ok(None)` means the backend answered without a value.
    fn eval(&mut self, expr: &str) -> SessionResult<Option<Reply>>;

    /// Open a file in the session's scratch directory for reading
    fn open_file(&mut self, name: &str) -> SessionResult<Box<dyn Read + '_>>;

    /// Create (or truncate) a file in the session's scratch directory
    fn create_file(&mut self, name: &str) -> SessionResult<Box<dyn Write + '_>>;
}

impl<S: RSession + ?Sized> RSession for &mut S {
    fn eval(&mut self, expr: &str) -> SessionResult<Option<Reply>> {
        (**self).eval(expr)
    }

    fn open_file(&mut self, name: &str) -> SessionResult<Box<dyn Read + '_>> {
        (**self).open_file(name)
    }

    fn create_file(&mut self, name: &str) -> SessionResult<Box<dyn Write + '_>> {
        (**self).create_file(name)
    }
}

impl<S: RSession + ?Sized> RSession for Box<S> {
    fn eval(&mut self, expr: &str) -> SessionResult<Option<Reply>> {
        (**self).eval(expr)
    }

    fn open_file(&mut self, name: &str) -> SessionResult<Box<dyn Read + '_>> {
        (**self).open_file(name)
    }

    fn create_file(&mut self, name: &str) -> SessionResult<Box<dyn Write + '_>> {
        (**self).create_file(name)
    }
}
