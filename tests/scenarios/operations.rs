//! E3-E7: staged loads and workspace saves.

use std::io::Read;

use rexec::testing::{RecordingSession, SessionCall};
use rexec::{Executor, MemorySource};

use crate::trapped;

#[test]
fn e3_load_table_without_columns() {
    let mut session = RecordingSession::new();
    let mut source = MemorySource::new(vec![0x50u8; 17]);

    Executor::new()
        .load_table(&mut session, &mut source, "a/b/c.parquet", "D", &[])
        .unwrap();

    assert_eq!(
        session.calls(),
        vec![
            SessionCall::CreateFile("a_b_c.parquet".into()),
            trapped("is.null(base::assign('D', value={arrow::read_parquet('a_b_c.parquet')}))"),
            trapped("base::unlink('a_b_c.parquet')"),
        ]
    );
    assert_eq!(session.write_stats("a_b_c.parquet").unwrap().bytes, 17);
}

#[test]
fn e4_load_table_with_columns() {
    let mut session = RecordingSession::new();
    let mut source = MemorySource::new(b"PAR1".to_vec());
    let columns = vec!["v1".to_string(), "v2".to_string()];

    Executor::new()
        .load_table(&mut session, &mut source, "t.parquet", "D", &columns)
        .unwrap();

    let evals = session.evals();
    assert!(evals[0].contains("tidyselect::any_of(c('v1','v2'))"));
    assert_eq!(evals[1], "try({base::unlink('t.parquet')})");
}

#[test]
fn e5_load_workspace() {
    let mut session = RecordingSession::new();
    let mut source = MemorySource::new(b"RDX3".to_vec());

    Executor::new()
        .load_workspace(&mut session, &mut source, "globalenv()")
        .unwrap();

    assert_eq!(
        session.calls(),
        vec![
            SessionCall::CreateFile(".RData".into()),
            trapped("base::load(file='.RData', envir=globalenv())"),
            trapped("base::unlink('.RData')"),
        ]
    );
}

#[test]
fn e6_save_workspace() {
    let mut session = RecordingSession::new();
    session.put_remote_file(".RData", b"RDX3 saved".to_vec());
    let mut received = Vec::new();
    let mut sink_calls = 0;

    Executor::new()
        .save_workspace(&mut session, |stream| {
            sink_calls += 1;
            stream.read_to_end(&mut received).map(|_| ())
        })
        .unwrap();

    assert_eq!(sink_calls, 1);
    assert_eq!(received, b"RDX3 saved");
    assert_eq!(
        session.calls(),
        vec![
            trapped("base::save.image()"),
            SessionCall::OpenFile(".RData".into()),
        ]
    );
}

#[test]
fn e7_load_resource() {
    let mut session = RecordingSession::new();
    let mut source = MemorySource::new(b"RDS".to_vec());

    Executor::new()
        .load_resource(&mut session, &mut source, "r.rds", "R")
        .unwrap();

    assert_eq!(
        session.calls(),
        vec![
            SessionCall::CreateFile("r.rds".into()),
            trapped("is.null(base::assign('R', value={resourcer::newResourceClient(base::readRDS('r.rds'))}))"),
            trapped("base::unlink('r.rds')"),
        ]
    );
}

#[test]
fn save_then_restore_round_trip() {
    let mut first = RecordingSession::new();
    first.put_remote_file(".RData", b"RDX3 state".to_vec());
    let executor = Executor::new();

    let saved = executor
        .save_workspace(&mut first, |stream| {
            let mut bytes = Vec::new();
            stream.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
        .unwrap();

    let mut second = RecordingSession::new();
    let mut snapshot = MemorySource::new(saved);
    executor
        .load_workspace(&mut second, &mut snapshot, "globalenv()")
        .unwrap();

    assert_eq!(second.write_stats(".RData").unwrap().bytes, 10);
    assert!(second.remote_files().is_empty());
}
