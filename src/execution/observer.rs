use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Events emitted by the [`super::BatchRunner`].
#[derive(Debug, Clone)]
pub enum BatchEvent {
    BatchStarted { jobs: usize },
    ReportStarted { index: usize, name: String },
    ReportFinished {
        index: usize,
        name: String,
        /// Rows rendered, or `None` if the report failed.
        rows: Option<usize>,
        elapsed: Duration,
    },
    BatchFinished {
        elapsed: Duration,
        metrics: BatchMetricsSnapshot,
    },
}

/// Observer hook for batch events.
pub trait BatchObserver: Send + Sync {
    fn on_event(&self, event: &BatchEvent);
}

/// A simple stderr logger for batch events.
#[derive(Debug, Default)]
pub struct StdErrBatchObserver;

impl BatchObserver for StdErrBatchObserver {
    fn on_event(&self, event: &BatchEvent) {
        match event {
            BatchEvent::BatchFinished { metrics, .. } => eprintln!("[batch] finished: {metrics}"),
            other => eprintln!("[batch] {other:?}"),
        }
    }
}

/// Live counters for a batch run.
///
/// The runner updates these while reports execute; callers can snapshot them at any time,
/// including from another thread mid-batch.
#[derive(Debug)]
pub struct BatchMetrics {
    batch_id: AtomicU64,
    started_at: Mutex<Option<Instant>>,
    elapsed_ns: AtomicU64,

    reports_started: AtomicU64,
    reports_succeeded: AtomicU64,
    reports_failed: AtomicU64,
    rows_rendered: AtomicU64,

    active_reports: AtomicUsize,
    max_active_reports: AtomicUsize,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            batch_id: AtomicU64::new(0),
            started_at: Mutex::new(None),
            elapsed_ns: AtomicU64::new(0),
            reports_started: AtomicU64::new(0),
            reports_succeeded: AtomicU64::new(0),
            reports_failed: AtomicU64::new(0),
            rows_rendered: AtomicU64::new(0),
            active_reports: AtomicUsize::new(0),
            max_active_reports: AtomicUsize::new(0),
        }
    }

    pub(crate) fn begin_batch(&self) {
        self.batch_id.fetch_add(1, Ordering::SeqCst);
        *self.started_at.lock() = Some(Instant::now());

        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.reports_started.store(0, Ordering::SeqCst);
        self.reports_succeeded.store(0, Ordering::SeqCst);
        self.reports_failed.store(0, Ordering::SeqCst);
        self.rows_rendered.store(0, Ordering::SeqCst);
        self.active_reports.store(0, Ordering::SeqCst);
        self.max_active_reports.store(0, Ordering::SeqCst);
    }

    pub(crate) fn end_batch(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub(crate) fn on_report_start(&self) {
        self.reports_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_reports.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_reports.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn on_report_end(&self, rows: Option<usize>) {
        match rows {
            Some(n) => {
                self.reports_succeeded.fetch_add(1, Ordering::SeqCst);
                self.rows_rendered.fetch_add(n as u64, Ordering::SeqCst);
            }
            None => {
                self.reports_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        self.active_reports.fetch_sub(1, Ordering::SeqCst);
    }

    /// Time since the current batch started, or the final elapsed time once it finished.
    fn elapsed(&self) -> Option<Duration> {
        match self.elapsed_ns.load(Ordering::SeqCst) {
            0 => {
                let started = *self.started_at.lock();
                started.map(|t| t.elapsed())
            }
            ns => Some(Duration::from_nanos(ns)),
        }
    }

    pub fn snapshot(&self) -> BatchMetricsSnapshot {
        BatchMetricsSnapshot {
            batch_id: self.batch_id.load(Ordering::SeqCst),
            elapsed: self.elapsed(),
            reports_started: self.reports_started.load(Ordering::SeqCst),
            reports_succeeded: self.reports_succeeded.load(Ordering::SeqCst),
            reports_failed: self.reports_failed.load(Ordering::SeqCst),
            rows_rendered: self.rows_rendered.load(Ordering::SeqCst),
            max_active_reports: self.max_active_reports.load(Ordering::SeqCst),
        }
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`BatchMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMetricsSnapshot {
    pub batch_id: u64,
    pub elapsed: Option<Duration>,
    pub reports_started: u64,
    pub reports_succeeded: u64,
    pub reports_failed: u64,
    pub rows_rendered: u64,
    pub max_active_reports: usize,
}

impl fmt::Display for BatchMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch_id={}, reports={}/{} ok, failed={}, rows_rendered={}, max_active_reports={}, elapsed={:?}",
            self.batch_id,
            self.reports_succeeded,
            self.reports_started,
            self.reports_failed,
            self.rows_rendered,
            self.max_active_reports,
            self.elapsed
        )
    }
}
