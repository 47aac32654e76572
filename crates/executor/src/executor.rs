//! The Executor - single entry point for work on an R session.
//!
//! The Executor is a stateless value that turns operations into a sequence
//! of file uploads, trapped evaluations and cleanup commands on a session
//! the caller owns.

use std::io::{self, Read};

use rexec_core::{ByteSource, Error, RSession, Reply, Result, SessionError};
use tracing::{debug, warn};

use crate::command::{remote_file_name, trap, Command};
use crate::config::ExecutorConfig;
use crate::shuttle::FileShuttle;

/// Runs commands and load/save operations on a caller-owned session.
///
/// The Executor is **stateless**: it holds settings but no session and no
/// state between calls. One Executor can serve any number of sessions.
///
/// # Concurrency
///
/// Every operation blocks until it completes. The session's scratch
/// directory is shared by every operation on that session, so two
/// operations staging the same file name (for example two workspace loads)
/// must not run on one session at the same time. `&mut` access to the
/// session enforces this within a thread.
///
/// # Example
///
/// ```ignore
/// use rexec_executor::{Executor, MemorySource};
///
/// let executor = Executor::new();
///
/// let reply = executor.execute(&mut session, "1 + 1")?;
///
/// let mut parquet = MemorySource::new(bytes);
/// executor.load_table(&mut session, &mut parquet, "project/table.parquet", "D", &[])?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executor {
    shuttle: FileShuttle,
    workspace_file: String,
}

impl Default for Executor {
    fn default() -> Self {
        Self::with_config(&ExecutorConfig::default())
    }
}

impl Executor {
    /// Create an executor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor from a loaded configuration.
    pub fn with_config(config: &ExecutorConfig) -> Self {
        Self {
            shuttle: FileShuttle::new(config.transfer_buffer_bytes),
            workspace_file: config.workspace_file.clone(),
        }
    }

    /// The shuttle used for uploads.
    pub fn shuttle(&self) -> &FileShuttle {
        &self.shuttle
    }

    /// Name of the workspace file in the scratch directory.
    pub fn workspace_file(&self) -> &str {
        &self.workspace_file
    }

    /// Evaluate `cmd` inside the trap envelope.
    ///
    /// Returns the reply unchanged unless the backend trapped an error.
    ///
    /// # Errors
    ///
    /// - `Evaluation` with the trimmed messages joined by `"; "` when the
    ///   reply carries the `try-error` class
    /// - `Evaluation` with `"Eval returned null"` when there is no reply
    /// - `Transport` when the session fails or the error reply cannot be
    ///   read as strings
    pub fn execute<S>(&self, session: &mut S, cmd: &str) -> Result<Reply>
    where
        S: RSession + ?Sized,
    {
        debug!(target: "rexec::executor", "Evaluate {}", cmd);
        let reply = session.eval(&trap(cmd))?.ok_or_else(Error::null_reply)?;
        if reply.is_try_error() {
            let messages = reply
                .as_strings()
                .map_err(|e| SessionError::Decode(e.to_string()))?;
            let detail: Vec<&str> = messages.iter().map(|m| m.trim()).collect();
            return Err(Error::evaluation(detail.join("; ")));
        }
        Ok(reply)
    }

    /// Save the session's workspace and hand the saved file to `sink`.
    ///
    /// The stream is only valid inside `sink` and is read straight from the
    /// session; it is closed when `sink` returns, whether it succeeded or not.
    /// Returns whatever `sink` returns.
    pub fn save_workspace<S, F, T>(&self, session: &mut S, sink: F) -> Result<T>
    where
        S: RSession + ?Sized,
        F: FnOnce(&mut dyn Read) -> io::Result<T>,
    {
        debug!(target: "rexec::executor", "Save workspace");
        self.execute(session, &Command::SaveImage.to_string())?;
        let mut stream = session.open_file(&self.workspace_file)?;
        Ok(sink(&mut stream)?)
    }

    /// Load a saved workspace into the environment given by `environment`.
    ///
    /// `environment` is an R expression such as `globalenv()` and is sent
    /// as-is; it must not come from untrusted input.
    pub fn load_workspace<S>(
        &self,
        session: &mut S,
        source: &mut dyn ByteSource,
        environment: &str,
    ) -> Result<()>
    where
        S: RSession + ?Sized,
    {
        debug!(target: "rexec::executor", "Load workspace into {}", environment);
        let file = self.workspace_file.as_str();
        self.with_staged_file(session, source, file, |session| {
            let cmd = Command::LoadImage {
                file,
                envir: environment,
            };
            self.execute(session, &cmd.to_string()).map(|_| ())
        })
    }

    /// Load a parquet table into the global binding `symbol`.
    ///
    /// With an empty `columns` every column is read; otherwise only the
    /// requested columns that exist in the file are.
    pub fn load_table<S>(
        &self,
        session: &mut S,
        source: &mut dyn ByteSource,
        filename: &str,
        symbol: &str,
        columns: &[String],
    ) -> Result<()>
    where
        S: RSession + ?Sized,
    {
        debug!(
            target: "rexec::executor",
            "Load table from file {} into {}", filename, symbol
        );
        let file = remote_file_name(filename);
        self.with_staged_file(session, source, &file, |session| {
            let cmd = Command::ReadParquet {
                symbol,
                file: &file,
                columns,
            };
            self.execute(session, &cmd.to_string()).map(|_| ())
        })
    }

    /// Load a serialized resource descriptor into the global binding `symbol`
    /// as a resource client.
    pub fn load_resource<S>(
        &self,
        session: &mut S,
        source: &mut dyn ByteSource,
        filename: &str,
        symbol: &str,
    ) -> Result<()>
    where
        S: RSession + ?Sized,
    {
        debug!(
            target: "rexec::executor",
            "Load resource from file {} into {}", filename, symbol
        );
        let file = remote_file_name(filename);
        self.with_staged_file(session, source, &file, |session| {
            let cmd = Command::ReadResource {
                symbol,
                file: &file,
            };
            self.execute(session, &cmd.to_string()).map(|_| ())
        })
    }

    /// Upload `source` to `remote`, run `main`, then unlink `remote`.
    ///
    /// The unlink runs on every path, including a failed or partial upload.
    /// A failed unlink never replaces an earlier failure; it is attached to
    /// it instead.
    fn with_staged_file<S, T, F>(
        &self,
        session: &mut S,
        source: &mut dyn ByteSource,
        remote: &str,
        main: F,
    ) -> Result<T>
    where
        S: RSession + ?Sized,
        F: FnOnce(&mut S) -> Result<T>,
    {
        let outcome = self
            .shuttle
            .upload(session, source, remote)
            .and_then(|_| main(&mut *session));
        let cleanup = self.execute(session, &Command::Unlink { file: remote }.to_string());

        match (outcome, cleanup) {
            (Ok(value), Ok(_)) => Ok(value),
            (Ok(_), Err(cleanup)) => Err(cleanup),
            (Err(primary), Ok(_)) => Err(primary),
            (Err(primary), Err(cleanup)) => {
                warn!(
                    target: "rexec::executor",
                    remote = %remote,
                    error = %cleanup,
                    "Cleanup failed after an earlier error"
                );
                Err(primary.with_cleanup(cleanup))
            }
        }
    }
}
