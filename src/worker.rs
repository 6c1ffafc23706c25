//! Runs searches on a background thread.
//!
//! The worker owns the engine while idle and hands it to the search thread for
//! the duration of one search. The thread sends its report and then the engine
//! back over the same channel, so the engine and its transposition table are
//! reused by the next search.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, warn};

use crate::{
    engine::{Engine, SearchResult},
    error::{EngineError, Result},
    position::Position,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub search_id: u64,
    pub result: SearchResult,
}

/// How often [`SearchWorker::wait`] checks that the search thread is alive
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Messages from the search thread
enum WorkerMessage {
    Finished(SearchReport),
    EngineReturn(Box<Engine>),
}

pub struct SearchWorker {
    engine: Option<Box<Engine>>,
    stop: Arc<AtomicBool>,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
    next_search_id: u64,
    /// Report that arrived while waiting for the engine
    pending_report: Option<SearchReport>,
}

impl SearchWorker {
    pub fn new(engine: Engine) -> Self {
        let (tx, rx) = unbounded();

        Self {
            stop: engine.stop_handle(),
            engine: Some(Box::new(engine)),
            tx,
            rx,
            handle: None,
            next_search_id: 1,
            pending_report: None,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.engine.is_none()
    }

    /// The engine, while no search is running
    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.engine.as_deref_mut()
    }

    /// Start searching `position` on a new thread. Returns the id that the
    /// matching [`SearchReport`] will carry.
    pub fn start(&mut self, position: Position, history: Vec<u64>) -> Result<u64> {
        let mut engine = self.engine.take().ok_or(EngineError::SearchInProgress)?;

        let search_id = self.next_search_id;
        self.next_search_id += 1;

        // A stop aimed at an earlier search may have landed after that search
        // lowered the flag. Requests from here on target this search.
        self.stop.store(false, Ordering::Relaxed);

        let tx = self.tx.clone();
        debug!("starting background search {search_id}");

        self.handle = Some(thread::spawn(move || {
            let result = engine.search_with_history(&position, &history);

            if tx
                .send(WorkerMessage::Finished(SearchReport { search_id, result }))
                .is_err()
            {
                warn!("search {search_id} finished after the worker was dropped");
            }

            // Ignored: without a receiver there is nobody left to use the engine
            let _ = tx.send(WorkerMessage::EngineReturn(engine));
        }));

        Ok(search_id)
    }

    /// Ask the running search to return its best move so far
    pub fn stop(&self) {
        if self.is_searching() {
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    /// Non-blocking: the report of the finished search, if any
    pub fn try_recv(&mut self) -> Option<SearchReport> {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }

        if self.is_searching() {
            None
        } else {
            self.pending_report.take()
        }
    }

    /// Block until the running search has finished and the engine is back.
    /// Returns `None` if the search thread died without reporting.
    pub fn wait(&mut self) -> Option<SearchReport> {
        while self.is_searching() {
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(message) => self.handle_message(message),
                Err(RecvTimeoutError::Timeout) => {
                    let thread_gone = self.handle.as_ref().is_none_or(JoinHandle::is_finished);
                    if thread_gone && self.rx.is_empty() {
                        warn!("search thread exited without returning the engine");
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.pending_report.take()
    }

    fn handle_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Finished(report) => {
                debug!("background search {} finished", report.search_id);
                self.pending_report = Some(report);
            }
            WorkerMessage::EngineReturn(engine) => {
                self.engine = Some(engine);

                if let Some(handle) = self.handle.take() {
                    if handle.join().is_err() {
                        warn!("search thread panicked");
                    }
                }
            }
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.stop();

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
