//! Logging tests: the debug/info lines operators rely on.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;

use crate::testing::RecordingSession;
use crate::{Executor, MemorySource, ReaderSource};

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a debug-level subscriber and return everything it logged.
fn capture_logs<F: FnOnce()>(f: F) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = log.0.lock().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_execute_logs_expression() {
    let output = capture_logs(|| {
        let mut session = RecordingSession::new();
        Executor::new().execute(&mut session, "1 + 1").unwrap();
    });

    assert!(output.contains("Evaluate 1 + 1"), "log was: {}", output);
}

#[test]
fn test_load_table_logs_transfer() {
    let output = capture_logs(|| {
        let mut session = RecordingSession::new();
        let mut source = MemorySource::new(vec![0u8; 17]);
        Executor::new()
            .load_table(&mut session, &mut source, "p/t.parquet", "D", &[])
            .unwrap();
    });

    assert!(output.contains("Load table from file p/t.parquet into D"));
    assert!(output.contains("INFO"));
    assert!(output.contains("Copying 'p_t.parquet' to R..."));
    assert!(output.contains("Copied 17 bytes in "), "log was: {}", output);
    assert!(output.contains(" MB/s]"));
    assert!(output.contains("Evaluate base::unlink('p_t.parquet')"));
}

#[test]
fn test_upload_logs_source_description_and_length() {
    let output = capture_logs(|| {
        let mut session = RecordingSession::new();
        let mut memory = MemorySource::new(vec![0u8; 17]);
        let mut stream = ReaderSource::new(io::Cursor::new(b"RDS".to_vec()));
        let executor = Executor::new();
        executor
            .load_table(&mut session, &mut memory, "t.parquet", "D", &[])
            .unwrap();
        executor
            .load_resource(&mut session, &mut stream, "r.rds", "R")
            .unwrap();
    });

    let lines: Vec<&str> = output
        .lines()
        .filter(|l| l.contains("Opening payload"))
        .collect();
    assert_eq!(lines.len(), 2, "log was: {}", output);
    assert!(lines[0].contains("source=byte array (17 bytes)"), "line was: {}", lines[0]);
    assert!(lines[0].contains("length=Some(17)"), "line was: {}", lines[0]);
    assert!(lines[1].contains("source=input stream"), "line was: {}", lines[1]);
    assert!(lines[1].contains("length=None"), "line was: {}", lines[1]);
}

#[test]
fn test_workspace_and_resource_log_lines() {
    let output = capture_logs(|| {
        let mut session = RecordingSession::new();
        session.put_remote_file(".RData", b"RDX3".to_vec());
        let executor = Executor::new();

        executor.save_workspace(&mut session, |_| Ok(())).unwrap();
        let mut snapshot = MemorySource::new(b"RDX3".to_vec());
        executor
            .load_workspace(&mut session, &mut snapshot, "globalenv()")
            .unwrap();
        let mut resource = MemorySource::new(b"RDS".to_vec());
        executor
            .load_resource(&mut session, &mut resource, "r.rds", "R")
            .unwrap();
    });

    assert!(output.contains("Save workspace"));
    assert!(output.contains("Load workspace into globalenv()"));
    assert!(output.contains("Load resource from file r.rds into R"));
}

#[test]
fn test_throughput_has_three_decimals() {
    let output = capture_logs(|| {
        let mut session = RecordingSession::new();
        let mut source = MemorySource::new(vec![0u8; 2048]);
        Executor::new()
            .load_resource(&mut session, &mut source, "r.rds", "R")
            .unwrap();
    });

    let line = output
        .lines()
        .find(|l| l.contains("Copied 2 KB in "))
        .expect("transfer line logged");
    let rate = line
        .rsplit('[')
        .next()
        .and_then(|s| s.strip_suffix(" MB/s]"))
        .expect("rate suffix");
    let decimals = rate.split('.').nth(1).expect("decimal point");
    assert_eq!(decimals.len(), 3, "line was: {}", line);
}
