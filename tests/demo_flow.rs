//! End-to-end tests for the simulated analysis flow.
//!
//! There is nothing external to gate on: every async test runs under
//! Tokio's paused clock (`start_paused = true`), so the five 800 ms stage
//! delays elapse in virtual time and the suite finishes in milliseconds
//! while still asserting exact stage timing.
//!
//! Run with:
//!   cargo test --test demo_flow -- --nocapture

use chrono::{TimeZone, Utc};
use futures::StreamExt;
use neuraldocs::{
    export, export_at, AnalysisProgressCallback, AnalysisResult, DocumentSession, MockAnalyzer,
    ProcessingTask, ProcessorConfig, ProgressEvent, ResultProducer, RunEvent, SelectedFile,
    StatsCounter, BANNER_STATS, PDF_MIME,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::{assert_pending, assert_ready, task};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// The default per-stage pause; a full run spans five of these.
const STAGE_DELAY: Duration = Duration::from_millis(800);

fn report_pdf() -> SelectedFile {
    SelectedFile::new("report.pdf", 2_097_152, PDF_MIME)
}

fn seeded_config(seed: u64) -> ProcessorConfig {
    ProcessorConfig::builder().seed(seed).build()
}

/// Assert `events` is one complete scripted run: five progress events at
/// 20/40/60/80/100 with their labels, then exactly one completion.
fn assert_full_run_script(events: &[RunEvent]) {
    assert_eq!(
        events.len(),
        6,
        "expected 5 stage events + 1 completion, got {}",
        events.len()
    );

    let script: [(u8, &str); 5] = [
        (20, "Extracting document structure..."),
        (40, "Analyzing semantic content..."),
        (60, "Building knowledge graph..."),
        (80, "Generating insights..."),
        (100, "Processing complete!"),
    ];

    for (event, (percent, label)) in events.iter().zip(script) {
        match event {
            RunEvent::Progress(p) => {
                assert_eq!(p.percent, percent, "stage percent out of script");
                assert_eq!(p.label, label, "stage label out of script");
            }
            RunEvent::Completed(_) => panic!("completion arrived before the final stage"),
        }
    }

    match events.last() {
        Some(RunEvent::Completed(result)) => {
            assert!(
                (10..60).contains(&result.page_count),
                "page count {} outside the mock's range",
                result.page_count
            );
        }
        other => panic!("last event must be Completed, got {other:?}"),
    }
}

/// Counts `analyze` invocations before delegating to the seeded mock.
struct CountingProducer {
    calls: AtomicUsize,
    inner: MockAnalyzer,
}

impl CountingProducer {
    fn new(seed: u64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: MockAnalyzer::seeded(seed),
        }
    }
}

impl ResultProducer for CountingProducer {
    fn analyze(&self, file: &SelectedFile) -> AnalysisResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.analyze(file)
    }
}

/// Records every callback invocation for later assertion.
#[derive(Default)]
struct RecordingCallback {
    run_starts: AtomicUsize,
    stage_percents: Mutex<Vec<u8>>,
    completions: AtomicUsize,
}

impl AnalysisProgressCallback for RecordingCallback {
    fn on_run_start(&self, _file: &SelectedFile, total_stages: usize) {
        assert_eq!(total_stages, 5, "the script always has five stages");
        self.run_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stage(&self, event: &ProgressEvent) {
        self.stage_percents.lock().unwrap().push(event.percent);
    }

    fn on_complete(&self, _result: &AnalysisResult) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Run script ───────────────────────────────────────────────────────────────

/// A drained run emits the five scripted stages in order, then the result.
#[tokio::test(start_paused = true)]
async fn full_run_emits_the_scripted_sequence() {
    let events: Vec<RunEvent> = ProcessingTask::with_config(report_pdf(), seeded_config(7))
        .run()
        .collect()
        .await;

    assert_full_run_script(&events);

    match events.last() {
        Some(RunEvent::Completed(result)) => {
            assert_eq!(result.filename, "report.pdf");
            assert_eq!(result.size_label, "2.00 MB");
            assert_eq!(result.headings.len(), 6);
            assert_eq!(result.insights.len(), 4);
            assert_eq!(result.processing_time_seconds, 3.2);
        }
        other => panic!("last event must be Completed, got {other:?}"),
    }
}

/// Each stage is preceded by exactly one `stage_delay` pause; the completion
/// event follows the final stage with no extra delay.
#[tokio::test(start_paused = true)]
async fn stages_arrive_on_the_configured_cadence() {
    let start = Instant::now();
    let mut events = ProcessingTask::with_config(report_pdf(), seeded_config(7)).run();

    let mut stages_seen = 0u32;
    while let Some(event) = events.next().await {
        match event {
            RunEvent::Progress(_) => {
                stages_seen += 1;
                assert_eq!(
                    start.elapsed(),
                    STAGE_DELAY * stages_seen,
                    "stage {stages_seen} off cadence"
                );
            }
            RunEvent::Completed(_) => {
                assert_eq!(start.elapsed(), STAGE_DELAY * 5);
            }
        }
    }
    assert_eq!(stages_seen, 5);
}

/// Constructing the stream schedules nothing; the first stage timer is armed
/// at the first poll.
#[tokio::test(start_paused = true)]
async fn run_is_lazy_until_first_polled() {
    let mut events = ProcessingTask::with_config(report_pdf(), seeded_config(7)).run();

    // Time passing before the first poll must not count against the run.
    tokio::time::sleep(Duration::from_secs(60)).await;

    let start = Instant::now();
    let first = events.next().await.expect("first stage event");
    assert!(matches!(first, RunEvent::Progress(_)));
    assert_eq!(
        start.elapsed(),
        STAGE_DELAY,
        "first stage must take a full delay measured from the first poll"
    );
}

/// Manual polling: a poll stays pending until the stage delay fully elapses
/// and becomes ready exactly at the boundary.
#[tokio::test(start_paused = true)]
async fn polls_pend_until_the_stage_boundary() {
    let mut stream =
        task::spawn(ProcessingTask::with_config(report_pdf(), seeded_config(7)).run());

    // The first poll arms the timer; nothing is ready a tick before it fires.
    assert_pending!(stream.poll_next());
    tokio::time::advance(STAGE_DELAY - Duration::from_millis(1)).await;
    assert_pending!(stream.poll_next());

    tokio::time::advance(Duration::from_millis(1)).await;
    match assert_ready!(stream.poll_next()) {
        Some(RunEvent::Progress(p)) => assert_eq!(p.percent, 20),
        other => panic!("expected the first stage, got {other:?}"),
    }
}

/// Dropping the stream mid-run releases the pending timer, and the result is
/// never synthesized.
#[tokio::test(start_paused = true)]
async fn dropping_the_stream_cancels_the_run() {
    let producer = Arc::new(CountingProducer::new(7));
    let config = ProcessorConfig::builder()
        .producer(Arc::clone(&producer) as Arc<dyn ResultProducer>)
        .build();

    let mut events = ProcessingTask::with_config(report_pdf(), config).run();
    for expected in [20u8, 40] {
        match events.next().await.expect("stage event") {
            RunEvent::Progress(p) => assert_eq!(p.percent, expected),
            RunEvent::Completed(_) => panic!("run must not complete after two polls"),
        }
    }
    drop(events);

    // Run far past where the abandoned run would have finished.
    tokio::time::sleep(STAGE_DELAY * 20).await;

    assert_eq!(
        producer.calls.load(Ordering::SeqCst),
        0,
        "a cancelled run must never synthesize a result"
    );
}

/// The same seed gives identical results across runs.
#[tokio::test(start_paused = true)]
async fn seeded_runs_are_reproducible() {
    let first = ProcessingTask::with_config(report_pdf(), seeded_config(42))
        .process()
        .await;
    let second = ProcessingTask::with_config(report_pdf(), seeded_config(42))
        .process()
        .await;

    assert_eq!(first, second);
    assert_eq!(first.filename, "report.pdf");
    assert!((10..60).contains(&first.page_count));
}

// ── Progress callbacks ───────────────────────────────────────────────────────

/// The eager path notifies the callback once at start, once per stage, and
/// once on completion.
#[tokio::test(start_paused = true)]
async fn eager_path_fires_callbacks_for_every_stage() {
    let recording = Arc::new(RecordingCallback::default());
    let config = ProcessorConfig::builder()
        .seed(7)
        .progress(Arc::clone(&recording) as Arc<dyn AnalysisProgressCallback>)
        .build();

    let result = ProcessingTask::with_config(report_pdf(), config)
        .process()
        .await;

    assert_eq!(recording.run_starts.load(Ordering::SeqCst), 1);
    assert_eq!(
        *recording.stage_percents.lock().unwrap(),
        vec![20, 40, 60, 80, 100]
    );
    assert_eq!(recording.completions.load(Ordering::SeqCst), 1);
    assert_eq!(result.filename, "report.pdf");
}

/// The eager future is `Send`: hosts can drive it from `tokio::spawn`.
#[tokio::test(start_paused = true)]
async fn process_is_send_across_spawn() {
    let recording = Arc::new(RecordingCallback::default());
    let config = ProcessorConfig::builder()
        .seed(3)
        .progress(Arc::clone(&recording) as Arc<dyn AnalysisProgressCallback>)
        .build();
    let task = ProcessingTask::with_config(report_pdf(), config);

    let result = tokio::spawn(task.process())
        .await
        .expect("spawn must succeed");

    assert_eq!(result.filename, "report.pdf");
    assert_eq!(recording.completions.load(Ordering::SeqCst), 1);
}

// ── Session flow ─────────────────────────────────────────────────────────────

/// The full demo walk: reject a non-PDF, accept a PDF, run to completion,
/// export, and save the artifact.
#[tokio::test(start_paused = true)]
async fn session_walks_the_whole_demo_flow() {
    let mut session = DocumentSession::with_config(seeded_config(42));

    let err = session
        .select(SelectedFile::new(
            "slides.pptx",
            512,
            "application/vnd.ms-powerpoint",
        ))
        .expect_err("non-PDF must be rejected");
    assert_eq!(err.reason_code(), "unsupported-type");
    assert!(session.selected_file().is_none());

    session.select(report_pdf()).expect("pdf passes the gate");

    let mut events = session.begin_run().expect("run starts");
    while let Some(event) = events.next().await {
        session.apply(&event);
    }

    assert!(!session.progress().is_running());
    assert_eq!(session.progress().percent(), 100);
    assert_eq!(session.progress().stage_label(), "Processing complete!");

    let artifact = session.export().expect("completed run must be exportable");
    assert_eq!(artifact.filename, "analysis-report.json");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = artifact.write_to_dir(dir.path()).expect("artifact written");
    let value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).expect("read back")).expect("valid JSON");
    assert_eq!(value["documentInfo"]["filename"], "report.pdf");
    assert_eq!(value["documentInfo"]["size"], "2.00 MB");
    assert_eq!(value["metadata"]["processingTime"], 3.2);
}

/// An interrupted run leaves no result behind, and the selection stays
/// runnable.
#[tokio::test(start_paused = true)]
async fn interrupted_run_leaves_no_result_behind() {
    let mut session = DocumentSession::with_config(seeded_config(7));
    session.select(report_pdf()).expect("pdf passes the gate");

    let mut events = session.begin_run().expect("run starts");
    for _ in 0..3 {
        let event = events.next().await.expect("stage event");
        session.apply(&event);
    }
    assert_eq!(session.progress().percent(), 60);

    drop(events);
    session.abandon_run();

    assert!(!session.progress().is_running());
    assert_eq!(session.progress().percent(), 0);
    assert!(session.result().is_none());
    assert_eq!(
        session
            .export()
            .expect_err("nothing to export")
            .reason_code(),
        "no-result-available"
    );

    // The same selection can be run again from the top.
    let mut events = session.begin_run().expect("runnable again after abandon");
    match events.next().await.expect("fresh run emits") {
        RunEvent::Progress(p) => assert_eq!(p.percent, 20, "fresh run starts at the first stage"),
        RunEvent::Completed(_) => panic!("fresh run must not begin with completion"),
    }
}

/// A rejected candidate never disturbs the stored result; an accepted one
/// discards it.
#[tokio::test(start_paused = true)]
async fn fresh_selection_discards_the_finished_result() {
    let mut session = DocumentSession::with_config(seeded_config(7));
    session.select(report_pdf()).expect("pdf passes the gate");

    let mut events = session.begin_run().expect("run starts");
    while let Some(event) = events.next().await {
        session.apply(&event);
    }
    assert!(session.result().is_some());

    assert!(session
        .select(SelectedFile::new("photo.png", 99, "image/png"))
        .is_err());
    assert!(
        session.result().is_some(),
        "rejection must not disturb the stored result"
    );

    session
        .select(SelectedFile::new("minutes.pdf", 4_194_304, PDF_MIME))
        .expect("pdf passes the gate");
    assert!(session.result().is_none(), "stale result must be discarded");
    assert_eq!(
        session.selected_file().map(|f| f.size_label()),
        Some("4.00 MB".to_string())
    );
}

// ── Export document ──────────────────────────────────────────────────────────

/// The exported document mirrors the run result under the published
/// three-group layout, stamped with the supplied timestamp.
#[tokio::test(start_paused = true)]
async fn exported_document_mirrors_the_run_result() {
    let result = ProcessingTask::with_config(report_pdf(), seeded_config(42))
        .process()
        .await;
    let artifact = export_at(
        &result,
        Utc.with_ymd_and_hms(2026, 8, 26, 9, 30, 5).unwrap(),
    )
    .expect("export");

    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).expect("valid JSON");
    let expected = serde_json::json!({
        "documentInfo": {
            "filename": "report.pdf",
            "size": "2.00 MB",
            "pages": result.page_count,
        },
        "analysis": {
            "headings": result.headings,
            "semanticStructure": {
                "title": "Advanced Research Document",
                "sections": result.semantic_structure.sections,
            },
            "insights": result.insights,
        },
        "metadata": {
            "processingTime": 3.2,
            "timestamp": "2026-08-26T09:30:05.000Z",
        },
    });
    assert_eq!(value, expected);
}

/// Write failures surface the artifact path in the error.
#[tokio::test(start_paused = true)]
async fn export_write_failure_names_the_artifact_path() {
    let result = ProcessingTask::with_config(report_pdf(), seeded_config(1))
        .process()
        .await;
    let artifact = export(&result).expect("encode");

    let dir = tempfile::tempdir().expect("tempdir");
    let clash = dir.path().join("not-a-directory");
    std::fs::write(&clash, b"occupied").expect("seed file");

    let err = artifact
        .write_to_dir(&clash)
        .expect_err("cannot write into a regular file");
    assert_eq!(err.reason_code(), "export-write-failed");
    assert!(
        err.to_string().contains("analysis-report.json"),
        "error must name the artifact path, got: {err}"
    );
}

// ── Landing banner ───────────────────────────────────────────────────────────

/// Every published banner statistic counts up to exactly its target.
#[tokio::test(start_paused = true)]
async fn banner_counters_land_on_their_published_targets() {
    for stat in BANNER_STATS {
        let values: Vec<u64> = StatsCounter::new(stat.target).values().collect().await;
        assert_eq!(
            values.last().copied(),
            Some(stat.target),
            "{} must land on its target",
            stat.label
        );
        assert!(
            values.iter().all(|v| *v <= stat.target),
            "{} must never overshoot",
            stat.label
        );
    }
}
