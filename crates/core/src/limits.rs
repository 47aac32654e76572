//! Fixed sizes and well-known names
//!
//! These values are part of the wire contract with the backend and of the
//! user-visible log format, so they are constants rather than settings.
//! `TRANSFER_BUFFER_BYTES` is only the default; the executor config may
//! override it.

/// Host-side write batch used when streaming a payload into a remote file (64 KiB)
pub const TRANSFER_BUFFER_BYTES: usize = 65536;

/// File the backend's `save.image()` writes and `load()` reads
pub const WORKSPACE_FILE: &str = ".RData";

/// Class attribute the trap envelope puts on a caught error
pub const TRY_ERROR_CLASS: &str = "try-error";

/// Message of the evaluation error raised for an empty reply
pub const NULL_REPLY_MESSAGE: &str = "Eval returned null";

const ONE_KB: u64 = 1024;
const UNITS: [(u64, &str); 6] = [
    (ONE_KB << 50, "EB"),
    (ONE_KB << 40, "PB"),
    (ONE_KB << 30, "TB"),
    (ONE_KB << 20, "GB"),
    (ONE_KB << 10, "MB"),
    (ONE_KB, "KB"),
];

/// Render a byte count in the largest whole 1024-based unit
///
/// The count is truncated, not rounded: 1535 bytes is `1 KB`.
///
/// ```
/// use rexec_core::display_size;
/// assert_eq!(display_size(17), "17 bytes");
/// assert_eq!(display_size(64 * 1024 * 1024), "64 MB");
/// ```
pub fn display_size(bytes: u64) -> String {
    for (unit, label) in UNITS {
        if bytes / unit > 0 {
            return format!("{} {}", bytes / unit, label);
        }
    }
    format!("{} bytes", bytes)
}
