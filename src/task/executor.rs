use crate::core::suggestion::Suggestion;
use crate::error::SearchError;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::warn;

pub type SearchResult<T> = Result<Vec<Suggestion<T>>, SearchError>;

/// A finished lookup, tagged with the generation that issued it.
#[derive(Debug)]
pub struct Completion<T> {
    pub generation: u64,
    pub result: SearchResult<T>,
}

/// Runs lookups on worker threads and funnels their results into one channel
/// that the event loop drains.
pub struct SearchExecutor<T> {
    completion_tx: Sender<Completion<T>>,
    completion_rx: Receiver<Completion<T>>,
}

impl<T: Send + 'static> SearchExecutor<T> {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<Completion<T>>();
        Self {
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn<F>(&self, generation: u64, job: F)
    where
        F: FnOnce() -> SearchResult<T> + Send + 'static,
    {
        let completion_tx = self.completion_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("search-{generation}"))
            .spawn(move || {
                let result = job();
                let _ = completion_tx.send(Completion { generation, result });
            });

        if let Err(err) = spawned {
            warn!(generation, error = %err, "could not start search worker");
            let _ = self.completion_tx.send(Completion {
                generation,
                result: Err(SearchError::failed(format!("spawn failed: {err}"))),
            });
        }
    }

    pub fn drain_ready(&self) -> Vec<Completion<T>> {
        let mut out = Vec::<Completion<T>>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion<T>> {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl<T: Send + 'static> Default for SearchExecutor<T> {
    fn default() -> Self {
        Self::new()
    }
}
