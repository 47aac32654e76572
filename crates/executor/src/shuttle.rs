//! Streaming uploads into the session's scratch directory.
//!
//! The shuttle copies a [`ByteSource`] into a remote file through a
//! fixed-size write buffer. Each write on the session channel carries
//! framing overhead, so host writes are batched into buffer-sized chunks.
//! The payload is never held in memory as a whole.

use std::io::{self, BufWriter, Read, Write};
use std::time::Instant;

use rexec_core::{display_size, ByteSource, RSession, Result, TRANSFER_BUFFER_BYTES};
use tracing::{debug, info};

/// Copies byte sources into remote files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileShuttle {
    buffer_bytes: usize,
}

impl Default for FileShuttle {
    fn default() -> Self {
        FileShuttle {
            buffer_bytes: TRANSFER_BUFFER_BYTES,
        }
    }
}

impl FileShuttle {
    /// Create a shuttle with a custom write batch size.
    ///
    /// A zero size falls back to [`TRANSFER_BUFFER_BYTES`].
    pub fn new(buffer_bytes: usize) -> Self {
        if buffer_bytes == 0 {
            return Self::default();
        }
        FileShuttle { buffer_bytes }
    }

    /// Write batch size in bytes.
    pub fn buffer_bytes(&self) -> usize {
        self.buffer_bytes
    }

    /// Stream `source` into the remote file `remote`, returning the byte count.
    ///
    /// Reads are capped at the batch size and the write buffer has the same
    /// capacity, so no single write on the remote file exceeds it.
    ///
    /// On failure the remote file may be left partially written; removing
    /// it is the caller's job.
    pub fn upload<S>(&self, session: &mut S, source: &mut dyn ByteSource, remote: &str) -> Result<u64>
    where
        S: RSession + ?Sized,
    {
        info!(target: "rexec::shuttle", "Copying '{}' to R...", remote);
        debug!(
            target: "rexec::shuttle",
            source = %source.description(),
            length = ?source.content_length(),
            "Opening payload"
        );
        let started = Instant::now();

        let mut reader = source.open()?;
        let remote_file = session.create_file(remote)?;
        let mut writer = BufWriter::with_capacity(self.buffer_bytes, remote_file);
        let size = copy_chunked(&mut reader, &mut writer, self.buffer_bytes)?;
        writer.flush()?;
        drop(writer);

        let elapsed_micros = (started.elapsed().as_micros() as u64).max(1);
        debug!(
            target: "rexec::shuttle",
            "Copied {} in {}ms [{:.3} MB/s]",
            display_size(size),
            elapsed_micros / 1000,
            size as f64 / elapsed_micros as f64
        );
        Ok(size)
    }
}

/// Copy `reader` into `writer` with reads of at most `chunk` bytes.
fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, chunk: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
}
