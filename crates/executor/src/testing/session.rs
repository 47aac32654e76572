//! In-memory recording session
//!
//! Behaves like a backend with an empty workspace:
//! - `create_file` / `open_file` work against a flat in-memory directory
//! - a trapped `base::unlink('<name>')` removes `<name>` from that directory
//! - every other eval is answered by the reply handler (default: `FALSE`)
//!
//! Clones share state, so a test can keep one handle for assertions while
//! another is moved into the code under test.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use rexec_core::{RSession, Reply, SessionError, SessionResult};

/// One call made on the session, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    /// Text passed to `eval`, exactly as sent
    Eval(String),
    /// Name passed to `create_file`
    CreateFile(String),
    /// Name passed to `open_file`
    OpenFile(String),
}

/// Write pattern observed on one remote file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Number of `write` calls that reached the remote file
    pub writes: usize,
    /// Largest single `write` in bytes
    pub largest_write: usize,
    /// Total bytes written
    pub bytes: u64,
}

type ReplyHandler = Box<dyn FnMut(&str) -> SessionResult<Option<Reply>> + Send>;

enum RemoteFile {
    Stored(Vec<u8>),
    /// Readable content generated on the fly; nothing is kept in memory
    Generated { len: u64, fill: u8 },
}

struct State {
    files: HashMap<String, RemoteFile>,
    stats: HashMap<String, WriteStats>,
    calls: Vec<SessionCall>,
    handler: Arc<Mutex<ReplyHandler>>,
    failing_evals: Vec<String>,
    fail_create: bool,
    fail_writes: bool,
    discard_writes: bool,
    closed: bool,
}

/// In-memory [`RSession`] that records every call
#[derive(Clone)]
pub struct RecordingSession {
    state: Arc<Mutex<State>>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    /// Create a session with an empty scratch directory
    pub fn new() -> Self {
        RecordingSession {
            state: Arc::new(Mutex::new(State {
                files: HashMap::new(),
                stats: HashMap::new(),
                calls: Vec::new(),
                handler: Arc::new(Mutex::new(Box::new(|_| Ok(Some(Reply::logical([false])))))),
                failing_evals: Vec::new(),
                fail_create: false,
                fail_writes: false,
                discard_writes: false,
                closed: false,
            })),
        }
    }

    // =========================================================================
    // Scripting
    // =========================================================================

    /// Answer every eval with the given handler
    ///
    /// The handler runs without the session lock held, so it may inspect a
    /// clone or install a new handler. It must not eval on a clone.
    pub fn on_eval<F>(&self, handler: F)
    where
        F: FnMut(&str) -> SessionResult<Option<Reply>> + Send + 'static,
    {
        self.state.lock().handler = Arc::new(Mutex::new(Box::new(handler)));
    }

    /// Answer every eval with a clone of `reply`
    pub fn reply_with(&self, reply: Option<Reply>) {
        self.on_eval(move |_| Ok(reply.clone()));
    }

    /// Fail evals whose text contains `pattern` with a protocol error
    pub fn fail_evals_containing(&self, pattern: impl Into<String>) {
        self.state.lock().failing_evals.push(pattern.into());
    }

    /// Fail every `create_file`
    pub fn fail_file_creation(&self) {
        self.state.lock().fail_create = true;
    }

    /// Let `create_file` succeed but fail every write on the file
    pub fn fail_file_writes(&self) {
        self.state.lock().fail_writes = true;
    }

    /// Count written bytes without storing them
    pub fn discard_writes(&self) {
        self.state.lock().discard_writes = true;
    }

    /// Close the session; every later call fails with [`SessionError::Closed`]
    pub fn close(&self) {
        self.state.lock().closed = true;
    }

    /// Place a file in the scratch directory
    pub fn put_remote_file(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .files
            .insert(name.into(), RemoteFile::Stored(bytes.into()));
    }

    /// Place a file whose `len` bytes are generated while it is read
    pub fn put_generated_file(&self, name: impl Into<String>, len: u64, fill: u8) {
        self.state
            .lock()
            .files
            .insert(name.into(), RemoteFile::Generated { len, fill });
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<SessionCall> {
        self.state.lock().calls.clone()
    }

    /// Text of every eval so far, in order
    pub fn evals(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SessionCall::Eval(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Contents of a stored remote file
    pub fn remote_file(&self, name: &str) -> Option<Vec<u8>> {
        match self.state.lock().files.get(name) {
            Some(RemoteFile::Stored(bytes)) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Check whether a remote file exists
    pub fn has_remote_file(&self, name: &str) -> bool {
        self.state.lock().files.contains_key(name)
    }

    /// Names of all remote files, sorted
    pub fn remote_files(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().files.keys().cloned().collect();
        names.sort();
        names
    }

    /// Write pattern observed on a remote file
    pub fn write_stats(&self, name: &str) -> Option<WriteStats> {
        self.state.lock().stats.get(name).copied()
    }
}

/// `try({base::unlink('<name>')})` -> `<name>`, with the literal decoded
fn unlink_target(expr: &str) -> Option<String> {
    let literal = expr
        .strip_prefix("try({base::unlink('")?
        .strip_suffix("')})")?;
    unescape_literal(literal)
}

/// Undo the escapes `string_literal` applies; `None` on a malformed escape
fn unescape_literal(literal: &str) -> Option<String> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(match chars.next()? {
                '\\' => '\\',
                '\'' => '\'',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                _ => return None,
            }),
            '\'' => return None,
            _ => out.push(c),
        }
    }
    Some(out)
}

impl RSession for RecordingSession {
    fn eval(&mut self, expr: &str) -> SessionResult<Option<Reply>> {
        let handler = {
            let mut state = self.state.lock();
            state.calls.push(SessionCall::Eval(expr.to_string()));
            if state.closed {
                return Err(SessionError::Closed);
            }
            if state.failing_evals.iter().any(|p| expr.contains(p.as_str())) {
                return Err(SessionError::Protocol(format!("eval failed: {}", expr)));
            }
            if let Some(name) = unlink_target(expr) {
                state.files.remove(&name);
            }
            Arc::clone(&state.handler)
        };
        // State is unlocked here so the handler may inspect or script a clone.
        let mut answer = handler.lock();
        let reply = (*answer)(expr);
        reply
    }

    fn open_file(&mut self, name: &str) -> SessionResult<Box<dyn Read + '_>> {
        let mut state = self.state.lock();
        state.calls.push(SessionCall::OpenFile(name.to_string()));
        if state.closed {
            return Err(SessionError::Closed);
        }
        match state.files.get(name) {
            Some(RemoteFile::Stored(bytes)) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Some(RemoteFile::Generated { len, fill }) => {
                Ok(Box::new(io::repeat(*fill).take(*len)))
            }
            None => Err(SessionError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such remote file: {}", name),
            ))),
        }
    }

    fn create_file(&mut self, name: &str) -> SessionResult<Box<dyn Write + '_>> {
        let mut state = self.state.lock();
        state.calls.push(SessionCall::CreateFile(name.to_string()));
        if state.closed {
            return Err(SessionError::Closed);
        }
        if state.fail_create {
            return Err(SessionError::Protocol(format!(
                "cannot create remote file {}",
                name
            )));
        }
        state
            .files
            .insert(name.to_string(), RemoteFile::Stored(Vec::new()));
        state.stats.insert(name.to_string(), WriteStats::default());
        Ok(Box::new(RemoteWriter {
            state: Arc::clone(&self.state),
            name: name.to_string(),
        }))
    }
}

struct RemoteWriter {
    state: Arc<Mutex<State>>,
    name: String,
}

impl Write for RemoteWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "remote write failed"));
        }
        let discard = state.discard_writes;
        if !discard {
            if let Some(RemoteFile::Stored(bytes)) = state.files.get_mut(&self.name) {
                bytes.extend_from_slice(buf);
            }
        }
        let stats = state.stats.entry(self.name.clone()).or_default();
        stats.writes += 1;
        stats.largest_write = stats.largest_write.max(buf.len());
        stats.bytes += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
