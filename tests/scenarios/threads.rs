//! Thread-per-caller use: one executor, one session per thread.

use std::sync::Arc;
use std::thread;

use rexec::testing::RecordingSession;
use rexec::{Executor, MemorySource};

#[test]
fn shared_executor_serves_independent_sessions() {
    let executor = Arc::new(Executor::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                let mut session = RecordingSession::new();
                let mut source = MemorySource::new(vec![i as u8; 1000 * (i + 1)]);
                let name = format!("part/{}.parquet", i);
                executor
                    .load_table(&mut session, &mut source, &name, "D", &[])
                    .unwrap();
                session
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let session = handle.join().unwrap();
        let remote = format!("part_{}.parquet", i);
        assert_eq!(
            session.write_stats(&remote).unwrap().bytes,
            1000 * (i as u64 + 1)
        );
        assert_eq!(session.evals().len(), 2);
    }
}
