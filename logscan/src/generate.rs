//! Synthetic log corpus generator.
//!
//! Builds a directory of dated log files using the same static-partitioning
//! pattern as the scanner: the file indices `0..file_count` are split into
//! contiguous chunks and one writer thread produces the files of each
//! non-empty chunk. Roughly one line in a thousand carries the keyword, the
//! rest are filler, so a generated corpus gives a scan something sparse to
//! find.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

use crate::config::GenerateConfig;
use crate::errors::{ScanError, ScanResult};
use crate::partition::partition;
use crate::progress::{emit, EventSender, GenerateEvent};

/// One keyword line per this many lines, on average.
const KEYWORD_RARITY: u32 = 1000;

/// Counts reported after a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub files_written: usize,
    pub files_failed: usize,
    pub workers_spawned: usize,
}

/// File name for day `index`: `log_<dd_MM_yy>.txt` counted from the start
/// date, one calendar day per file.
fn file_name_for(start_date: NaiveDate, index: usize) -> String {
    let date = start_date
        .checked_add_days(Days::new(index as u64))
        .unwrap_or(start_date);
    format!("log_{}.txt", date.format("%d_%m_%y"))
}

fn log_line(date: NaiveDate, line: usize, keyword: &str, rng: &mut StdRng) -> String {
    let value = rng.gen_range(0..KEYWORD_RARITY);
    if value == 0 {
        format!("[{date}] INFO  user=99 action={keyword} from=127.0.0.1 line={line}")
    } else {
        format!("[{date}] DEBUG some other event occurred at line={line} value={value}")
    }
}

fn write_log_file(
    path: &PathBuf,
    date: NaiveDate,
    lines: usize,
    keyword: &str,
    rng: &mut StdRng,
) -> ScanResult<()> {
    let file = File::create(path).map_err(|e| ScanError::file_write(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in 1..=lines {
        writeln!(writer, "{}", log_line(date, line, keyword, rng))
            .map_err(|e| ScanError::file_write(path, e))?;
    }
    writer.flush().map_err(|e| ScanError::file_write(path, e))
}

/// The writer-thread body: produces every file of its chunk with a
/// thread-local RNG, skipping files that fail to write.
fn write_chunk(
    worker: usize,
    indices: &[usize],
    config: &GenerateConfig,
    events: &EventSender<GenerateEvent>,
) -> (usize, usize) {
    let mut rng = StdRng::from_entropy();
    let mut written = 0;
    let mut failed = 0;

    for &index in indices {
        let date = config
            .start_date
            .checked_add_days(Days::new(index as u64))
            .unwrap_or(config.start_date);
        let path = config.dir.join(file_name_for(config.start_date, index));

        match write_log_file(&path, date, config.lines_per_file, &config.keyword, &mut rng) {
            Ok(()) => written += 1,
            Err(e) => {
                failed += 1;
                warn!("Writer {}: {}", worker, e);
                emit(
                    events,
                    GenerateEvent::FileFailed {
                        path,
                        message: e.to_string(),
                    },
                );
            }
        }
    }

    debug!("Writer {} finished: {} written, {} failed", worker, written, failed);
    emit(
        events,
        GenerateEvent::WriterFinished {
            worker,
            files_written: written,
        },
    );
    (written, failed)
}

/// Generates the corpus: creates the target directory, partitions the file
/// indices across writer threads, and blocks until every writer is done.
///
/// Per-file write failures are reported and skipped; only failing to create
/// the target directory aborts the run.
pub fn run_generate(
    config: &GenerateConfig,
    events: EventSender<GenerateEvent>,
) -> ScanResult<GenerateSummary> {
    fs::create_dir_all(&config.dir)?;

    let indices: Vec<usize> = (0..config.file_count).collect();
    let chunks = partition(&indices, config.thread_count);
    let mut summary = GenerateSummary::default();

    info!(
        "Generating {} file(s) x {} line(s) in {}",
        config.file_count,
        config.lines_per_file,
        config.dir.display()
    );

    thread::scope(|scope| {
        let events = &events;

        summary.workers_spawned = chunks.iter().filter(|chunk| !chunk.is_empty()).count();
        emit(
            events,
            GenerateEvent::Started {
                workers: summary.workers_spawned,
                files: config.file_count,
            },
        );

        let handles: Vec<_> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(worker, chunk)| {
                let chunk = *chunk;
                scope.spawn(move || write_chunk(worker, chunk, config, events))
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok((written, failed)) => {
                    summary.files_written += written;
                    summary.files_failed += failed;
                }
                Err(_) => warn!("A writer thread panicked; its chunk is incomplete"),
            }
        }
    });

    info!(
        "Generated {} file(s) with {} worker(s), {} failed",
        summary.files_written, summary.workers_spawned, summary.files_failed
    );
    Ok(summary)
}
