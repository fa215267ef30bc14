//! Thread-safe, unordered collection of matches.

use std::sync::{Mutex, PoisonError};

use crate::results::Match;

/// An append-only multiset of matches shared by all workers.
///
/// `add` is safe under arbitrary interleaving from any number of threads and
/// never drops or duplicates an element. `drain` is meant to be called once,
/// after the coordinator's join barrier, when no worker can still be adding;
/// the ordering of the drained vector carries no meaning.
#[derive(Debug, Default)]
pub struct ResultSink {
    matches: Mutex<Vec<Match>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one match. Blocks only for the duration of the push.
    pub fn add(&self, m: Match) {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(m);
    }

    /// Takes every match accumulated so far, leaving the sink empty.
    pub fn drain(&self) -> Vec<Match> {
        std::mem::take(
            &mut *self
                .matches
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    pub fn len(&self) -> usize {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
