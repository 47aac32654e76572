//! Error types for rexec
//!
//! Two layers of errors live here:
//! - [`SessionError`]: faults raised by an [`RSession`](crate::RSession)
//!   implementation while talking to the backend.
//! - [`Error`]: what executor operations return to callers.
//!
//! Every [`Error`] reports one of two [`ErrorKind`]s. `Evaluation` means the
//! backend ran the command and reported a trapped error (or sent nothing
//! back). `Transport` means the command or a file stream never made it.

use std::io;
use thiserror::Error;

/// Result type alias for executor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for session implementations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Faults raised by a session while delivering a command or a file stream
#[derive(Debug, Error)]
pub enum SessionError {
    /// I/O error on the session channel or a remote file stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend answered with something the protocol does not allow
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A reply arrived but could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The session was closed before or during the call
    #[error("Session closed")]
    Closed,
}

/// Which side of the session a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend evaluated the command and reported an error
    Evaluation,
    /// The command, reply or file stream could not be delivered
    Transport,
}

/// Errors returned by executor operations
#[derive(Debug, Error)]
pub enum Error {
    /// The backend trapped an error, or returned no reply at all
    #[error("R evaluation error: {message}")]
    Evaluation {
        /// Trimmed backend messages joined by `"; "`
        message: String,
    },

    /// The session could not deliver a command, decode a reply or move a file
    #[error("R transport error: {source}")]
    Transport {
        /// Underlying session fault
        #[from]
        source: SessionError,
    },

    /// The main step failed and so did the cleanup that followed it
    ///
    /// The primary failure decides [`Error::kind`]; the cleanup failure is
    /// kept alongside it instead of replacing it.
    #[error("{primary} (cleanup also failed: {cleanup})")]
    Cleanup {
        /// Failure of the main step
        #[source]
        primary: Box<Error>,
        /// Failure of the cleanup step
        cleanup: Box<Error>,
    },
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Transport {
            source: SessionError::Io(e),
        }
    }
}

impl Error {
    /// Build an evaluation error from a backend message
    pub fn evaluation(message: impl Into<String>) -> Self {
        Error::Evaluation {
            message: message.into(),
        }
    }

    /// The error raised when the session delivers no reply at all
    pub fn null_reply() -> Self {
        Error::evaluation(crate::limits::NULL_REPLY_MESSAGE)
    }

    /// Kind of the failure, looking through attached cleanup failures
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Evaluation { .. } => ErrorKind::Evaluation,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Cleanup { primary, .. } => primary.kind(),
        }
    }

    /// Human-readable detail of the primary failure
    pub fn message(&self) -> String {
        match self {
            Error::Evaluation { message } => message.clone(),
            Error::Transport { source } => source.to_string(),
            Error::Cleanup { primary, .. } => primary.message(),
        }
    }

    /// The cleanup failure attached to this error, if any
    pub fn cleanup_failure(&self) -> Option<&Error> {
        match self {
            Error::Cleanup { cleanup, .. } => Some(cleanup),
            _ => None,
        }
    }

    /// Attach a failed cleanup to this error without replacing it
    pub fn with_cleanup(self, cleanup: Error) -> Self {
        Error::Cleanup {
            primary: Box::new(self),
            cleanup: Box::new(cleanup),
        }
    }

    /// Check if this is an evaluation error
    pub fn is_evaluation(&self) -> bool {
        self.kind() == ErrorKind::Evaluation
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
