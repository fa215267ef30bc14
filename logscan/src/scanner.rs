//! The scan engine: worker bodies and the coordinating run loop.
//!
//! A run is a fixed fan-out of fresh OS threads, one per non-empty chunk of
//! the file list. Each worker owns its chunk for its whole lifetime; the
//! only mutable state shared across workers is the [`ResultSink`]. The
//! coordinator blocks on the join barrier, drains the sink, and writes the
//! output file exactly once.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::thread;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::lister::{list_files, FileEntry};
use crate::output::write_report;
use crate::partition::partition;
use crate::progress::{emit, EventSender, ScanEvent};
use crate::results::{Match, ScanOutcome, ScanReport, ScanSummary};
use crate::sink::ResultSink;

const BUFFER_CAPACITY: usize = 8192;

/// What one worker saw while scanning its chunk.
#[derive(Debug, Clone, Copy, Default)]
struct WorkerStats {
    files_scanned: usize,
    files_failed: usize,
    matches: usize,
}

/// Scans a single file line by line, pushing each match into the sink as it
/// is found. Returns the number of matches, or the read error for this file.
///
/// A line matches iff it contains `keyword` as a literal substring; no
/// regex, no case folding, no trimming. The file handle is scoped to this
/// call and released before the caller moves on.
fn scan_file(entry: &FileEntry, keyword: &str, sink: &ResultSink) -> ScanResult<usize> {
    let file = File::open(&entry.path).map_err(|e| ScanError::file_read(&entry.path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);

    let mut line = String::with_capacity(256);
    let mut line_number: u64 = 0;
    let mut found = 0;

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| ScanError::file_read(&entry.path, e))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let content = line.trim_end_matches(['\n', '\r']);
        if content.contains(keyword) {
            sink.add(Match {
                file_name: entry.name.clone(),
                line_number,
                line_content: content.to_string(),
            });
            found += 1;
        }
    }

    debug!("Found {} match(es) in {}", found, entry.path.display());
    Ok(found)
}

/// The worker body: scans every file in the chunk, reporting per-file read
/// failures on the event channel and carrying on. A failed file never aborts
/// the worker.
fn scan_chunk(
    worker: usize,
    chunk: &[FileEntry],
    keyword: &str,
    sink: &ResultSink,
    events: &EventSender<ScanEvent>,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    for entry in chunk {
        match scan_file(entry, keyword, sink) {
            Ok(found) => {
                stats.files_scanned += 1;
                stats.matches += found;
            }
            Err(e) => {
                stats.files_failed += 1;
                warn!("Worker {}: {}", worker, e);
                emit(
                    events,
                    ScanEvent::FileFailed {
                        path: entry.path.clone(),
                        message: e.to_string(),
                    },
                );
            }
        }
    }

    debug!(
        "Worker {} finished: {} scanned, {} failed, {} match(es)",
        worker, stats.files_scanned, stats.files_failed, stats.matches
    );
    emit(
        events,
        ScanEvent::WorkerFinished {
            worker,
            files_scanned: stats.files_scanned,
            matches: stats.matches,
        },
    );
    stats
}

/// Runs a full scan: validate, list, partition, fan out, join, aggregate,
/// write the result file.
///
/// Coordinator-level failures (bad input, missing directory, unwritable
/// output) abort the run and are returned; per-file failures inside workers
/// only reduce coverage. Zero files found is a success with a "no results"
/// output. The output file is overwritten on every run.
pub fn run_scan(config: &ScanConfig, events: EventSender<ScanEvent>) -> ScanResult<ScanReport> {
    config.validate()?;

    info!(
        "Scanning {} for keyword {:?}",
        config.root_dir.display(),
        config.keyword
    );

    let files = list_files(&config.root_dir, config.file_prefix.as_deref())?;
    info!("Found {} file(s) to scan", files.len());
    emit(&events, ScanEvent::Listed { files: files.len() });

    let chunks = partition(&files, config.thread_count);
    let sink = ResultSink::new();
    let mut summary = ScanSummary::default();

    thread::scope(|scope| {
        let sink = &sink;
        let events = &events;
        let keyword = config.keyword.as_str();

        summary.workers_spawned = chunks.iter().filter(|chunk| !chunk.is_empty()).count();
        debug!(
            "Spawning {} worker(s) over {} chunk(s)",
            summary.workers_spawned,
            chunks.len()
        );
        emit(
            events,
            ScanEvent::Started {
                workers: summary.workers_spawned,
            },
        );

        let handles: Vec<_> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(worker, chunk)| {
                let chunk = *chunk;
                scope.spawn(move || scan_chunk(worker, chunk, keyword, sink, events))
            })
            .collect();

        // Join barrier: nothing below runs until every worker is done.
        for handle in handles {
            match handle.join() {
                Ok(stats) => {
                    summary.files_scanned += stats.files_scanned;
                    summary.files_failed += stats.files_failed;
                }
                Err(_) => warn!("A scan worker panicked; its chunk is incomplete"),
            }
        }
    });

    let matches = sink.drain();
    summary.matches_found = matches.len();
    let report = ScanReport {
        outcome: ScanOutcome::from_matches(matches),
        summary,
    };

    if let Err(e) = write_report(&config.output_path, &config.keyword, report.outcome.matches()) {
        // Surface the computed report alongside the failure rather than
        // dropping it on the floor.
        return Err(match e {
            ScanError::OutputWrite { path, source, .. } => {
                ScanError::output_write_with_report(path, source, report)
            }
            other => other,
        });
    }

    info!(
        "Scan complete: {} match(es) across {} file(s), {} worker(s), {} failed file(s)",
        summary.matches_found, summary.files_scanned, summary.workers_spawned, summary.files_failed
    );
    emit(&events, ScanEvent::Completed { summary });

    Ok(report)
}
