//! E1, E2: evaluation through the trap envelope.

use rexec::testing::RecordingSession;
use rexec::{Error, Executor, Reply};

use crate::trapped;

#[test]
fn e1_evaluate_returns_reply_unchanged() {
    let mut session = RecordingSession::new();
    session.reply_with(Some(Reply::double([2.0])));

    let reply = Executor::new().execute(&mut session, "1 + 1").unwrap();

    assert_eq!(reply, Reply::double([2.0]));
    assert_eq!(session.calls(), vec![trapped("1 + 1")]);
}

#[test]
fn e2_trapped_error_becomes_evaluation_error() {
    let mut session = RecordingSession::new();
    session.reply_with(Some(Reply::try_error(["boom"])));

    let result = Executor::new().execute(&mut session, "stop('boom')");

    match result {
        Err(Error::Evaluation { message }) => assert_eq!(message, "boom"),
        other => panic!("Expected Evaluation(\"boom\"), got {:?}", other),
    }
    assert_eq!(session.calls(), vec![trapped("stop('boom')")]);
}
