use std::time::Duration;

use crate::scoring::{Metrics, Score};

/// Live values pushed to the presentation layer after each scoring pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub score: Score,
    pub metrics: Metrics,
    pub time_remaining: u32,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndReason {
    #[strum(serialize = "completed")]
    Completed,
    #[strum(serialize = "time up")]
    TimeUp,
}

/// Final values of a finished session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub snapshot: Snapshot,
    pub elapsed: Duration,
    pub reason: EndReason,
}

impl Report {
    pub fn wpm(&self) -> u32 {
        self.snapshot.metrics.wpm
    }

    pub fn cpm(&self) -> u32 {
        self.snapshot.metrics.cpm
    }

    pub fn accuracy(&self) -> u32 {
        self.snapshot.metrics.accuracy
    }

    pub fn errors(&self) -> usize {
        self.snapshot.score.errors
    }
}

/// Receives what the session computes; never feeds back into it
pub trait PresentationSink {
    fn snapshot(&mut self, snapshot: &Snapshot);
    fn finished(&mut self, report: &Report);
    fn started(&mut self) {}
    fn reset(&mut self) {}
}

/// Sink that keeps every call, for headless runs and tests
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub snapshots: Vec<Snapshot>,
    pub reports: Vec<Report>,
    pub starts: usize,
    pub resets: usize,
}

impl RecordingSink {
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.reports.last()
    }
}

impl PresentationSink for RecordingSink {
    fn snapshot(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(*snapshot);
    }

    fn finished(&mut self, report: &Report) {
        self.reports.push(*report);
    }

    fn started(&mut self) {
        self.starts += 1;
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
