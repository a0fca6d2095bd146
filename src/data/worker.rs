//! Background question loading.
//!
//! Each load runs on its own thread and reports back over a channel; the UI
//! thread picks the result up with [`LoadHandle::try_recv`] on its own turn.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::error;

use crate::config::ParserConfig;

use super::loader::{LoadError, LoadOutcome, load_questions};

pub type LoadResult = Result<LoadOutcome, LoadError>;

/// Receiving end of a background load.
pub struct LoadHandle {
    path: PathBuf,
    receiver: Receiver<LoadResult>,
}

impl LoadHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The load result if it is ready. A worker that died without
    /// reporting shows up as a read error.
    pub fn try_recv(&self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Read {
                path: self.path.clone(),
                source: std::io::Error::other("question loader stopped unexpectedly"),
            })),
        }
    }

    /// Block until the load finishes.
    pub fn wait(self) -> LoadResult {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(LoadError::Read {
                path: self.path.clone(),
                source: std::io::Error::other("question loader stopped unexpectedly"),
            })
        })
    }
}

/// Start loading `path` on a new thread.
pub fn spawn_load(path: impl Into<PathBuf>, config: ParserConfig) -> LoadHandle {
    let path = path.into();
    let (tx, rx) = mpsc::channel();
    let worker_path = path.clone();

    let spawned = thread::Builder::new()
        .name("question-loader".to_string())
        .spawn(move || {
            let result = load_questions(&worker_path, &config);
            let _ = tx.send(result);
        });

    if let Err(e) = spawned {
        // The sender was dropped with the closure, so try_recv reports the failure.
        error!("Failed to start question loader: {}", e);
    }

    LoadHandle { path, receiver: rx }
}
