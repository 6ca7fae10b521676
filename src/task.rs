//! The simulated analysis run: five timed stages, then a canned result.
//!
//! ## Why a lazy stream?
//!
//! A run is pacing, not computation. Modelling it as a `Stream` keeps the
//! caller in charge of time: no timer starts until the stream is first
//! polled, and dropping the stream mid-run releases the pending timer
//! without emitting another event. The eager [`ProcessingTask::process`]
//! drains the same stream internally and fires
//! [`crate::progress::AnalysisProgressCallback`] hooks for callers that
//! prefer push-style notifications over polling.

use crate::config::ProcessorConfig;
use crate::producer::{MockAnalyzer, ResultProducer};
use crate::progress::{ProgressEvent, Stage};
use crate::result::AnalysisResult;
use crate::upload::SelectedFile;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, info};

/// A boxed stream of run events.
///
/// The stream is finite: zero or more [`RunEvent::Progress`] items (exactly
/// five when driven to the end) followed by exactly one
/// [`RunEvent::Completed`], after which it yields `None`.
pub type RunStream = Pin<Box<dyn Stream<Item = RunEvent> + Send>>;

/// One observable step of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// A stage boundary was reached; carries the stage, percent, and label.
    Progress(ProgressEvent),
    /// The run finished; carries the synthesized result. Always the final
    /// event of a stream that is driven to completion.
    Completed(AnalysisResult),
}

/// A single analysis run over one accepted file.
///
/// A task is consumed by [`run`](ProcessingTask::run) or
/// [`process`](ProcessingTask::process): one task, one run. Re-running a
/// file means constructing a new task, which is how callers that gate on
/// "already running" keep a run from being started twice.
///
/// # Example
/// ```rust,no_run
/// use neuraldocs::{ProcessingTask, RunEvent, SelectedFile};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let file = SelectedFile::new("report.pdf", 2_097_152, "application/pdf");
/// let mut events = ProcessingTask::new(file).run();
/// while let Some(event) = events.next().await {
///     match event {
///         RunEvent::Progress(p) => println!("{:>3}% {}", p.percent, p.label),
///         RunEvent::Completed(result) => println!("{} pages", result.page_count),
///     }
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProcessingTask {
    file: SelectedFile,
    config: ProcessorConfig,
}

impl ProcessingTask {
    /// Create a task with the default configuration (800 ms per stage,
    /// unseeded page count).
    pub fn new(file: SelectedFile) -> Self {
        Self::with_config(file, ProcessorConfig::default())
    }

    pub fn with_config(file: SelectedFile, config: ProcessorConfig) -> Self {
        Self { file, config }
    }

    /// The file this task will report on.
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    /// Start the run as a lazy event stream.
    ///
    /// Each of the five stages is preceded by one `stage_delay` pause, so a
    /// fully drained stream takes five times the configured delay. The
    /// result is synthesized from selection metadata only; the file's
    /// content never enters the pipeline.
    pub fn run(self) -> RunStream {
        let delay = self.config.stage_delay;
        let producer = resolve_producer(&self.config);
        let file = self.file;

        info!(
            file = %file.name,
            stage_delay_ms = delay.as_millis() as u64,
            "starting analysis run"
        );

        let stages = stream::iter(Stage::SEQUENCE).then(move |stage| async move {
            sleep(delay).await;
            let event = ProgressEvent::for_stage(stage);
            debug!(stage = ?stage, percent = event.percent, "stage reached");
            RunEvent::Progress(event)
        });

        let completion = stream::once(async move {
            let result = producer.analyze(&file);
            info!(file = %result.filename, pages = result.page_count, "analysis complete");
            RunEvent::Completed(result)
        });

        Box::pin(stages.chain(completion))
    }

    /// Run to completion, firing progress callbacks along the way.
    ///
    /// This is the push-style counterpart of [`run`](ProcessingTask::run):
    /// it drains the event stream internally and notifies
    /// `config.progress` (when set) at run start, per stage, and on
    /// completion. Cancellation still works the stream way: drop the future
    /// and the pending timer is released.
    pub async fn process(self) -> AnalysisResult {
        let callback = self.config.progress.clone();
        if let Some(ref cb) = callback {
            cb.on_run_start(&self.file, Stage::SEQUENCE.len());
        }

        let mut events = self.run();
        while let Some(event) = events.next().await {
            match event {
                RunEvent::Progress(ref progress) => {
                    if let Some(ref cb) = callback {
                        cb.on_stage(progress);
                    }
                }
                RunEvent::Completed(result) => {
                    if let Some(ref cb) = callback {
                        cb.on_complete(&result);
                    }
                    return result;
                }
            }
        }

        // The stream is a five-stage walk chained with exactly one
        // completion event, so it cannot end without yielding `Completed`.
        unreachable!("run stream ended without a completion event")
    }
}

/// Resolve the result producer, from most-specific to least-specific:
/// a pre-built `config.producer` wins, then a seeded [`MockAnalyzer`] when
/// `config.seed` is set, then an unseeded one.
fn resolve_producer(config: &ProcessorConfig) -> Arc<dyn ResultProducer> {
    if let Some(ref producer) = config.producer {
        return Arc::clone(producer);
    }
    match config.seed {
        Some(seed) => Arc::new(MockAnalyzer::seeded(seed)),
        None => Arc::new(MockAnalyzer::new()),
    }
}
