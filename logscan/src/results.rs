//! Value types produced by a scan run.
//!
//! A [`Match`] is owned by the worker that found it until it is handed to the
//! sink; after the join barrier the coordinator assembles the drained matches
//! into a [`ScanReport`]. No ordering is defined over the match set.

/// One line in one file containing the keyword.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    /// Base name of the file the line was found in
    pub file_name: String,
    /// 1-based line number within that file
    pub line_number: u64,
    /// The raw line text, without the trailing newline
    pub line_content: String,
}

/// The aggregate result of a completed run.
///
/// Distinguishes "the scan ran and found nothing" from a scan that never
/// happened; `Matches` is non-empty by construction.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    NoMatches,
    Matches(Vec<Match>),
}

impl ScanOutcome {
    pub fn from_matches(matches: Vec<Match>) -> Self {
        if matches.is_empty() {
            Self::NoMatches
        } else {
            Self::Matches(matches)
        }
    }

    pub fn matches(&self) -> &[Match] {
        match self {
            Self::NoMatches => &[],
            Self::Matches(matches) => matches,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoMatches)
    }
}

/// Counts reported to the caller when a run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files successfully scanned to the end
    pub files_scanned: usize,
    /// Files skipped because they could not be read
    pub files_failed: usize,
    /// Total matches across all workers
    pub matches_found: usize,
    /// Workers actually spawned (empty chunks are skipped)
    pub workers_spawned: usize,
}

/// Everything a completed run hands back to the caller.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    pub summary: ScanSummary,
}
