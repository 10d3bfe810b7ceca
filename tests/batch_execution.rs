use std::sync::{Arc, Mutex};

use rapid_reporter::catalog::{Catalog, CatalogOptions};
use rapid_reporter::execution::{
    BatchEvent, BatchObserver, BatchRunner, ExecutionOptions, ReportJob, StdErrBatchObserver,
};
use rapid_reporter::render::OutputFormat;
use rapid_reporter::reporter::{
    CompositeObserver, ReportContext, ReportObserver, ReportOptions, ReportSeverity, RunStats,
    StdErrObserver,
};
use rapid_reporter::source::{MemoryDataSource, MemoryResult};
use rapid_reporter::types::Value;
use rapid_reporter::ReportError;

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl BatchObserver for EventLog {
    fn on_event(&self, event: &BatchEvent) {
        let line = match event {
            BatchEvent::BatchStarted { jobs } => format!("start {jobs}"),
            BatchEvent::ReportStarted { name, .. } => format!("begin {name}"),
            BatchEvent::ReportFinished { name, rows, .. } => format!("end {name} {rows:?}"),
            BatchEvent::BatchFinished { metrics, .. } => {
                format!("finish {}/{}", metrics.reports_succeeded, metrics.reports_started)
            }
        };
        self.0.lock().unwrap().push(line);
    }
}

fn source(catalog: &Catalog) -> MemoryDataSource {
    let sales = catalog.get("sales by region").unwrap();
    let inventory = catalog.get("inventory").unwrap();
    MemoryDataSource::new()
        .with_result(
            sales.query.clone(),
            MemoryResult::new(["region", "units", "unit_price"])
                .expect_params(1)
                .row([Value::from("north"), Value::Int64(10), Value::Float64(2.5)])
                .row([Value::from("south"), Value::Int64(4), Value::Float64(10.0)]),
        )
        .with_result(
            inventory.query.clone(),
            MemoryResult::new(["sku", "on_hand", "reorder_level"])
                .row([Value::from("A-1"), Value::Int64(3), Value::Int64(10)])
                .row([Value::from("B-2"), Value::Int64(12), Value::Int64(5)]),
        )
}

#[test]
fn catalog_reports_run_as_a_batch() {
    let catalog = Catalog::load_dir("tests/fixtures/reports", &CatalogOptions::default()).unwrap();
    let src = source(&catalog);

    let jobs = vec![
        ReportJob::new(catalog.get("sales by region").unwrap().clone())
            .with_params([2024])
            .with_totals(["units", "revenue"])
            .with_format(OutputFormat::Csv),
        ReportJob::new(catalog.get("inventory").unwrap().clone()).with_format(OutputFormat::Json),
        // Missing parameter: rejected by the source.
        ReportJob::new(catalog.get("sales by region").unwrap().clone()),
    ];

    let log = Arc::new(EventLog::default());
    let runner = BatchRunner::new(ExecutionOptions { num_threads: Some(2) })
        .unwrap()
        .with_observer(log.clone());
    let results = runner.run(&src, &jobs);

    assert_eq!(
        results[0].as_ref().unwrap(),
        "Region,Units,Revenue\nnorth,10,25\nsouth,4,40\n,14,65\n"
    );
    assert_eq!(
        results[1].as_ref().unwrap(),
        r#"{"columns":["SKU","On hand","Shortfall"],"rows":[["A-1",3,7],["B-2",12,-7]]}"#
    );
    assert!(matches!(results[2], Err(ReportError::Query { .. })));

    let events = log.0.lock().unwrap().clone();
    assert_eq!(events.first().map(String::as_str), Some("start 3"));
    assert_eq!(events.last().map(String::as_str), Some("finish 2/3"));
    assert!(events.contains(&"end inventory Some(2)".to_string()));
    assert!(events.contains(&"end sales by region None".to_string()));

    let snap = runner.metrics().snapshot();
    assert_eq!(snap.rows_rendered, 4);
    assert_eq!(snap.reports_failed, 1);
    assert_eq!(src.released_cursors(), src.opened_cursors());
}

#[test]
fn runner_can_be_reused_across_batches() {
    let catalog = Catalog::load_dir("tests/fixtures/reports", &CatalogOptions::default()).unwrap();
    let src = source(&catalog);
    let jobs = vec![ReportJob::new(catalog.get("inventory").unwrap().clone())];

    let runner = BatchRunner::new(ExecutionOptions::default()).unwrap();
    let first = runner.run(&src, &jobs);
    let second = runner.run(&src, &jobs);

    assert_eq!(first[0].as_ref().unwrap(), second[0].as_ref().unwrap());
    let snap = runner.metrics().snapshot();
    assert_eq!(snap.batch_id, 2);
    assert_eq!(snap.reports_started, 1);
}

#[derive(Default)]
struct Outcomes(Mutex<Vec<String>>);

impl ReportObserver for Outcomes {
    fn on_success(&self, ctx: &ReportContext, stats: RunStats) {
        self.0.lock().unwrap().push(format!("ok {} {}", ctx.name, stats.rows));
    }

    fn on_failure(&self, ctx: &ReportContext, severity: ReportSeverity, _error: &ReportError) {
        self.0.lock().unwrap().push(format!("fail {} {severity:?}", ctx.name));
    }

    fn on_alert(&self, ctx: &ReportContext, severity: ReportSeverity, _error: &ReportError) {
        self.0.lock().unwrap().push(format!("alert {} {severity:?}", ctx.name));
    }
}

#[test]
fn report_options_reach_every_job() {
    let catalog = Catalog::load_dir("tests/fixtures/reports", &CatalogOptions::default()).unwrap();
    let src = source(&catalog);
    let jobs = vec![
        ReportJob::new(catalog.get("inventory").unwrap().clone()),
        ReportJob::new(catalog.get("sales by region").unwrap().clone()).with_params([2024]),
        ReportJob::new(catalog.get("sales by region").unwrap().clone()),
    ];

    let outcomes = Arc::new(Outcomes::default());
    let observer = CompositeObserver::new(vec![
        outcomes.clone() as Arc<dyn ReportObserver>,
        Arc::new(StdErrObserver) as Arc<dyn ReportObserver>,
    ]);
    let runner = BatchRunner::new(ExecutionOptions { num_threads: Some(2) })
        .unwrap()
        .with_observer(Arc::new(StdErrBatchObserver))
        .with_report_options(ReportOptions {
            observer: Some(Arc::new(observer)),
            alert_at_or_above: ReportSeverity::Critical,
        });
    let results = runner.run(&src, &jobs);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);

    let mut seen = outcomes.0.lock().unwrap().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            "alert sales by region Critical",
            "fail sales by region Critical",
            "ok inventory 2",
            "ok sales by region 2",
        ]
    );
}
