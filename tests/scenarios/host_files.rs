//! Payloads read from files on the host.

use std::io::Write;

use rexec::testing::RecordingSession;
use rexec::{ByteSource, Executor, FileSource};
use tempfile::NamedTempFile;

#[test]
fn load_table_from_host_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"PAR1 fake parquet body PAR1").unwrap();
    file.flush().unwrap();

    let mut session = RecordingSession::new();
    let mut source = FileSource::new(file.path());
    assert_eq!(source.content_length(), Some(27));

    Executor::new()
        .load_table(&mut session, &mut source, "study/cohort.parquet", "cohort", &[])
        .unwrap();

    let stats = session.write_stats("study_cohort.parquet").unwrap();
    assert_eq!(stats.bytes, 27);
    assert!(session.remote_files().is_empty());
}

#[test]
fn missing_host_file_still_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = RecordingSession::new();
    let mut source = FileSource::new(dir.path().join("gone.rds"));

    let err = Executor::new()
        .load_resource(&mut session, &mut source, "gone.rds", "R")
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(session.evals(), vec!["try({base::unlink('gone.rds')})"]);
}
