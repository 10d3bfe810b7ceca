//! Concurrent execution of independent reports.
//!
//! A [`Reporter`] runs one report synchronously. [`BatchRunner`] sits above it and runs a list
//! of [`ReportJob`]s on a rayon pool, one executor per job, all sharing a single
//! [`DataSource`] handle. It provides:
//!
//! - Configurable parallelism ([`ExecutionOptions`])
//! - Results in job order, with one failure never affecting another job
//! - Real-time metrics + observer hooks for monitoring

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::ReportResult;
use crate::rdl::ReportDescriptor;
use crate::render::OutputFormat;
use crate::reporter::{ReportOptions, Reporter};
use crate::source::DataSource;
use crate::types::Value;

pub use observer::{BatchEvent, BatchMetrics, BatchMetricsSnapshot, BatchObserver, StdErrBatchObserver};

/// Configuration for the [`BatchRunner`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

/// One report to run as part of a batch.
#[derive(Debug, Clone)]
pub struct ReportJob {
    /// Parsed report definition.
    pub descriptor: ReportDescriptor,
    /// Positional parameter values.
    pub params: Vec<Value>,
    /// Column keys that get a footer total.
    pub totals: Vec<String>,
    /// Output format.
    pub format: OutputFormat,
}

impl ReportJob {
    /// A job with no parameters, no totals and HTML output.
    pub fn new(descriptor: ReportDescriptor) -> Self {
        Self {
            descriptor,
            params: Vec::new(),
            totals: Vec::new(),
            format: OutputFormat::default(),
        }
    }

    pub fn with_params<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.params = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_totals<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.totals = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Runs independent report jobs in parallel.
pub struct BatchRunner {
    pool: ThreadPool,
    report_options: ReportOptions,
    observer: Option<Arc<dyn BatchObserver>>,
    metrics: Arc<BatchMetrics>,
}

impl BatchRunner {
    /// Create a runner with its own worker pool.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::ThreadPool`] if the pool cannot be built.
    pub fn new(opts: ExecutionOptions) -> ReportResult<Self> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            report_options: ReportOptions::default(),
            observer: None,
            metrics: Arc::new(BatchMetrics::new()),
        })
    }

    /// Attach an observer for batch events.
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Options handed to every report executor (per-report observer, alert threshold).
    pub fn with_report_options(mut self, options: ReportOptions) -> Self {
        self.report_options = options;
        self
    }

    /// Get a handle to real-time batch metrics.
    pub fn metrics(&self) -> Arc<BatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every job and return the rendered outputs in job order.
    pub fn run(&self, source: &dyn DataSource, jobs: &[ReportJob]) -> Vec<ReportResult<String>> {
        let start = Instant::now();
        self.metrics.begin_batch();
        self.emit(BatchEvent::BatchStarted { jobs: jobs.len() });

        let results = self.pool.install(|| {
            jobs.par_iter()
                .enumerate()
                .map(|(index, job)| self.run_job(source, index, job))
                .collect::<Vec<_>>()
        });

        self.metrics.end_batch(start.elapsed());
        self.emit(BatchEvent::BatchFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        results
    }

    fn run_job(&self, source: &dyn DataSource, index: usize, job: &ReportJob) -> ReportResult<String> {
        let start = Instant::now();
        let name = job.descriptor.name.clone();
        self.metrics.on_report_start();
        self.emit(BatchEvent::ReportStarted {
            index,
            name: name.clone(),
        });

        let totals: Vec<&str> = job.totals.iter().map(String::as_str).collect();
        let mut reporter = Reporter::from_descriptor(source, &job.descriptor)
            .params(job.params.iter().cloned())
            .columns(job.descriptor.columns_with_totals(&totals))
            .with_options(self.report_options.clone());
        let outcome = reporter
            .run()
            .map(|r| (r.rows().len(), r.render(job.format)));

        let rows = outcome.as_ref().ok().map(|(rows, _)| *rows);
        self.metrics.on_report_end(rows);
        self.emit(BatchEvent::ReportFinished {
            index,
            name,
            rows,
            elapsed: start.elapsed(),
        });

        outcome.map(|(_, output)| output)
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
