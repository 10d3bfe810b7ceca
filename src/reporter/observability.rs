use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::error::ReportError;
use crate::types::Value;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the run failed).
    Error,
    /// Critical error (the data source rejected the query or is unreachable).
    Critical,
}

impl ReportSeverity {
    /// Severity of a failed run.
    pub fn for_error(error: &ReportError) -> Self {
        match error {
            ReportError::Query { .. } | ReportError::Io(_) => ReportSeverity::Critical,
            _ => ReportSeverity::Error,
        }
    }
}

/// Context about one report run.
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Report name (empty when the executor was configured without one).
    pub name: String,
    /// Bound query.
    pub query: String,
    /// Bound parameter values.
    pub params: Vec<Value>,
}

/// Minimal stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Number of accumulated rows.
    pub rows: usize,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// Observer interface for report run outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReportObserver: Send + Sync {
    /// Called when a run succeeds.
    fn on_success(&self, _ctx: &ReportContext, _stats: RunStats) {}

    /// Called when a run fails.
    fn on_failure(&self, _ctx: &ReportContext, _severity: ReportSeverity, _error: &ReportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Options controlling how an executor reports run outcomes.
#[derive(Clone)]
pub struct ReportOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ReportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReportSeverity,
}

impl fmt::Debug for ReportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: ReportSeverity::Critical,
        }
    }
}

impl ReportOptions {
    /// Report the outcome of a run to the configured observer, if any.
    pub(crate) fn notify<T>(&self, ctx: &ReportContext, result: &Result<T, ReportError>, stats: RunStats) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        match result {
            Ok(_) => obs.on_success(ctx, stats),
            Err(e) => {
                let sev = ReportSeverity::for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= self.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ReportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReportObserver for CompositeObserver {
    fn on_success(&self, ctx: &ReportContext, stats: RunStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs report runs to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReportObserver for StdErrObserver {
    fn on_success(&self, ctx: &ReportContext, stats: RunStats) {
        eprintln!(
            "[report][ok] name={:?} rows={} elapsed={:?}",
            ctx.name, stats.rows, stats.elapsed
        );
    }

    fn on_failure(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        eprintln!(
            "[report][{:?}] name={:?} query={:?} err={}",
            severity, ctx.name, ctx.query, error
        );
    }

    fn on_alert(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        eprintln!(
            "[ALERT][report][{:?}] name={:?} query={:?} err={}",
            severity, ctx.name, ctx.query, error
        );
    }
}

/// Appends report run events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ReportObserver for FileObserver {
    fn on_success(&self, ctx: &ReportContext, stats: RunStats) {
        self.append_line(&format!(
            "{} ok name={:?} rows={} elapsed_ms={}",
            unix_ts(),
            ctx.name,
            stats.rows,
            stats.elapsed.as_millis()
        ));
    }

    fn on_failure(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        self.append_line(&format!(
            "{} fail severity={:?} name={:?} err={}",
            unix_ts(),
            severity,
            ctx.name,
            error
        ));
    }

    fn on_alert(&self, ctx: &ReportContext, severity: ReportSeverity, error: &ReportError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} name={:?} err={}",
            unix_ts(),
            severity,
            ctx.name,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
