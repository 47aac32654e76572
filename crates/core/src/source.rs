//! Byte sources
//!
//! A [`ByteSource`] is a caller-owned payload the executor streams into a
//! remote file. The executor opens it once per operation, reads it to the
//! end, and keeps no reference once the operation returns.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

/// A payload that can be opened for reading
pub trait ByteSource {
    /// Open a fresh reader over the payload
    fn open(&mut self) -> io::Result<Box<dyn Read + '_>>;

    /// Payload length in bytes, when known up front
    fn content_length(&self) -> Option<u64> {
        None
    }

    /// Short human-readable description for log lines
    fn description(&self) -> String;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        (**self).open()
    }

    fn content_length(&self) -> Option<u64> {
        (**self).content_length()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// A file on the host filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Wrap a host path; the file is opened lazily
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Host path of the payload
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn content_length(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    fn description(&self) -> String {
        format!("file [{}]", self.path.display())
    }
}

/// An in-memory payload
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Wrap owned bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        MemorySource {
            bytes: bytes.into(),
        }
    }
}

impl ByteSource for MemorySource {
    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }

    fn content_length(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }

    fn description(&self) -> String {
        format!("byte array ({} bytes)", self.bytes.len())
    }
}

/// A one-shot payload backed by an arbitrary reader
///
/// The reader is handed out on the first `open`; later opens fail because
/// the stream cannot be rewound.
pub struct ReaderSource<R> {
    reader: Option<R>,
    length: Option<u64>,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a reader of unknown length
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader: Some(reader),
            length: None,
        }
    }

    /// Wrap a reader whose length is known
    pub fn with_length(reader: R, length: u64) -> Self {
        ReaderSource {
            reader: Some(reader),
            length: Some(length),
        }
    }

    /// Check whether the reader has already been handed out
    pub fn is_consumed(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        match self.reader.take() {
            Some(reader) => Ok(Box::new(reader)),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "stream source has already been read",
            )),
        }
    }

    fn content_length(&self) -> Option<u64> {
        self.length
    }

    fn description(&self) -> String {
        "input stream".to_string()
    }
}
