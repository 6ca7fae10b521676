//! One user's journey through the demo: select, run, observe, export.
//!
//! [`DocumentSession`] owns the pieces the library exposes separately (the
//! upload gate, the progress state, the result store) and wires them into
//! the product's flow:
//!
//! 1. [`select`](DocumentSession::select) a file; acceptance discards any
//!    result from an earlier run.
//! 2. [`begin_run`](DocumentSession::begin_run) to obtain the event stream;
//!    at most one run may be active per session.
//! 3. [`apply`](DocumentSession::apply) each event so the observable state
//!    tracks the run. Dropping the stream instead cancels the run;
//!    [`abandon_run`](DocumentSession::abandon_run) returns the state to
//!    idle afterwards.
//! 4. [`export`](DocumentSession::export) the stored result as a JSON
//!    artifact.
//!
//! The run stream does not borrow the session, so a host can hold the
//! session mutably between polls:
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use neuraldocs::{DocumentSession, SelectedFile};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), neuraldocs::NeuralDocsError> {
//! let mut session = DocumentSession::new();
//! session.select(SelectedFile::new("report.pdf", 2_097_152, "application/pdf"))?;
//!
//! let mut events = session.begin_run()?;
//! while let Some(event) = events.next().await {
//!     session.apply(&event);
//!     println!("{:>3}% {}", session.progress().percent(), session.progress().stage_label());
//! }
//!
//! let artifact = session.export()?;
//! artifact.write_to_dir(".")?;
//! # Ok(())
//! # }
//! ```

use crate::config::ProcessorConfig;
use crate::error::NeuralDocsError;
use crate::export::{self, ExportArtifact};
use crate::progress::ProgressState;
use crate::result::{AnalysisResult, ResultStore};
use crate::task::{ProcessingTask, RunEvent, RunStream};
use crate::upload::{SelectedFile, UploadGate};
use tracing::{debug, info, warn};

/// Session state for one document-analysis flow.
#[derive(Debug)]
pub struct DocumentSession {
    config: ProcessorConfig,
    gate: UploadGate,
    progress: ProgressState,
    store: ResultStore,
}

impl DocumentSession {
    /// Create a session with the default run configuration.
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            config,
            gate: UploadGate::default(),
            progress: ProgressState::default(),
            store: ResultStore::new(),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Offer a file to the session.
    ///
    /// Acceptance replaces the current selection, discards any stored
    /// result, and resets the progress state. Rejection (wrong declared
    /// MIME type) leaves the session exactly as it was.
    pub fn select(&mut self, candidate: SelectedFile) -> Result<&SelectedFile, NeuralDocsError> {
        self.gate.select(candidate)?;
        self.store.clear();
        self.progress.reset();
        debug!("selection accepted, prior result discarded");
        // The gate holds the file it just accepted.
        self.gate.selected().ok_or(NeuralDocsError::NoFileSelected)
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.gate.selected()
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Start an analysis run over the selected file.
    ///
    /// Returns the run's event stream. The stream owns a copy of the
    /// selection and the config, so the session stays free for
    /// [`apply`](DocumentSession::apply) calls between polls. Fails with
    /// [`NeuralDocsError::NoFileSelected`] when nothing passed the gate and
    /// with [`NeuralDocsError::RunInProgress`] while another run is active.
    pub fn begin_run(&mut self) -> Result<RunStream, NeuralDocsError> {
        if self.progress.is_running() {
            warn!("rejecting run start, another run is active");
            return Err(NeuralDocsError::RunInProgress);
        }
        let file = match self.gate.selected() {
            Some(file) => file.clone(),
            None => {
                warn!("rejecting run start, no file selected");
                return Err(NeuralDocsError::NoFileSelected);
            }
        };

        self.progress.begin();
        Ok(ProcessingTask::with_config(file, self.config.clone()).run())
    }

    /// Fold one run event into the observable state.
    ///
    /// Progress events move percent and label; the completion event stores
    /// the result and flips the session back to not-running.
    pub fn apply(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Progress(progress) => self.progress.advance(progress),
            RunEvent::Completed(result) => {
                self.progress.finish();
                self.store.set(result.clone());
            }
        }
    }

    /// Declare the active run abandoned and return to idle.
    ///
    /// Dropping the run stream is what actually cancels the timers; this
    /// merely resets the observable state afterwards. Harmless when no run
    /// is active.
    pub fn abandon_run(&mut self) {
        if self.progress.is_running() {
            info!("abandoning active run");
        }
        self.progress.reset();
    }

    // ── Observation and export ────────────────────────────────────────────

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// The most recent completed run's result, if any.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.store.get()
    }

    /// Encode the stored result as a timestamped export artifact.
    pub fn export(&self) -> Result<ExportArtifact, NeuralDocsError> {
        match self.store.get() {
            Some(result) => export::export(result),
            None => Err(NeuralDocsError::NoResultAvailable),
        }
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}
