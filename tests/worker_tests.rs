use test_utils::*;

use std::{sync::atomic::Ordering, thread, time::Duration};

use mill_engine::{
    engine::Engine, error::EngineError, position::Position, types::GameStatus,
    worker::SearchWorker,
};

fn worker_with_depth(depth: u8) -> SearchWorker {
    SearchWorker::new(engine_with_depth(depth))
}

#[test]
fn test_background_search_matches_foreground() {
    let position = Position::default();
    let expected = engine_with_depth(3).search(&position);

    let mut worker = worker_with_depth(3);
    let id = worker.start(position, Vec::new()).unwrap();
    let report = worker.wait().expect("Search should report");

    assert_eq!(report.search_id, id);
    assert_eq!(report.result.best_move, expected.best_move);
    assert_eq!(report.result.evaluation, expected.evaluation);
    assert_eq!(report.result.status, GameStatus::InProgress);
    assert!(!worker.is_searching(), "Engine is back after wait");
}

#[test]
fn test_second_start_while_searching_fails() {
    let mut worker = worker_with_depth(3);
    worker.start(Position::default(), Vec::new()).unwrap();

    assert!(worker.is_searching());
    assert!(worker.engine_mut().is_none(), "Engine belongs to the search thread");
    assert_eq!(
        worker.start(Position::default(), Vec::new()),
        Err(EngineError::SearchInProgress)
    );

    worker.wait().expect("First search should still report");
    assert!(worker.engine_mut().is_some());
}

#[test]
fn test_search_ids_increase() {
    let mut worker = worker_with_depth(2);

    let first = worker.start(Position::default(), Vec::new()).unwrap();
    assert_eq!(worker.wait().map(|report| report.search_id), Some(first));

    let second = worker.start(Position::default(), Vec::new()).unwrap();
    assert_eq!(worker.wait().map(|report| report.search_id), Some(second));
    assert!(second > first);
}

#[test]
fn test_stop_returns_a_move() {
    // Far too deep to finish on its own
    let mut worker = worker_with_depth(30);
    let position = Position::default();

    worker.start(position, Vec::new()).unwrap();
    thread::sleep(Duration::from_millis(50));
    worker.stop();

    let report = worker.wait().expect("Stopped search should report");
    assert!(report.result.aborted);
    let best = report.result.best_move.expect("Aborted search still picks a move");
    assert!(position.is_legal(best));

    // The stop request does not carry over to the next search
    let engine: &mut Engine = worker.engine_mut().unwrap();
    engine.set_config(fixed_config(2)).unwrap();
    worker.start(position, Vec::new()).unwrap();
    let next = worker.wait().unwrap();
    assert!(!next.result.aborted);
}

#[test]
fn test_stop_raised_while_idle_does_not_abort_next_search() {
    let mut worker = worker_with_depth(2);
    worker.start(Position::default(), Vec::new()).unwrap();
    worker.wait().expect("First search should report");

    // A late stop lands after the search already finished
    let engine: &mut Engine = worker.engine_mut().unwrap();
    engine.stop_handle().store(true, Ordering::Relaxed);
    worker.stop();

    worker.start(Position::default(), Vec::new()).unwrap();
    let report = worker.wait().expect("Second search should report");
    assert!(!report.result.aborted, "Stale stop request is dropped on start");
    assert_eq!(report.result.depth, 2);
}

#[test]
fn test_try_recv_polls_without_blocking() {
    let mut worker = worker_with_depth(2);
    assert!(worker.try_recv().is_none(), "Nothing to report while idle");

    let id = worker.start(Position::default(), Vec::new()).unwrap();

    let mut report = None;
    for _ in 0..500 {
        report = worker.try_recv();
        if report.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    let report = report.expect("Shallow search should finish within five seconds");
    assert_eq!(report.search_id, id);
    assert!(!worker.is_searching());
    assert!(worker.try_recv().is_none(), "Each report is delivered once");
}
