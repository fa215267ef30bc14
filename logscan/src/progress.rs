//! Progress reporting — lightweight messages sent from worker threads to a
//! single consumer that owns the display.
//!
//! Workers never touch shared presentation state directly; everything they
//! have to say travels through a crossbeam channel. Events are advisory:
//! they carry no part of the durable result contract, and a run with no
//! subscriber simply passes `None` for the sender.

use std::path::PathBuf;

use crate::results::ScanSummary;

/// Events emitted during a scan run.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Directory listing finished.
    Listed { files: usize },
    /// Workers have been spawned (empty chunks excluded).
    Started { workers: usize },
    /// A single file could not be read; the owning worker moved on.
    FileFailed { path: PathBuf, message: String },
    /// One worker finished its whole chunk.
    WorkerFinished {
        worker: usize,
        files_scanned: usize,
        matches: usize,
    },
    /// The run completed; the output file has been written.
    Completed { summary: ScanSummary },
}

/// Events emitted while generating a synthetic corpus.
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    /// Writers have been spawned (empty chunks excluded).
    Started { workers: usize, files: usize },
    /// A single file could not be written; the owning writer moved on.
    FileFailed { path: PathBuf, message: String },
    /// One writer finished its whole chunk.
    WriterFinished { worker: usize, files_written: usize },
}

/// Sending half of the progress channel; `None` disables reporting.
pub type EventSender<E> = Option<crossbeam_channel::Sender<E>>;

/// Sends an event if a subscriber is attached, ignoring a disconnected
/// receiver — a vanished consumer must never stall a worker.
pub(crate) fn emit<E>(sender: &EventSender<E>, event: E) {
    if let Some(tx) = sender {
        let _ = tx.send(event);
    }
}
