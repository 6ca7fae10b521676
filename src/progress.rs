//! Progress vocabulary: stages, events, observable state, and callbacks.
//!
//! A processing run walks the five-entry stage table in order, emitting one
//! [`ProgressEvent`] per stage. Consumers observe a run in one of two ways:
//!
//! * pull the event stream returned by [`crate::task::ProcessingTask::run`],
//!   folding events into a [`ProgressState`] (what the session does), or
//! * register an [`AnalysisProgressCallback`] on the config and let the eager
//!   [`crate::task::ProcessingTask::process`] push events as they happen.
//!
//! # Why callbacks in addition to the stream?
//!
//! The callback is the least-invasive integration point for hosts that
//! already have an event loop: forward events to a channel, a WebSocket, or
//! a terminal progress bar without restructuring around a stream consumer.
//! The trait is `Send + Sync` with default no-op methods so callers override
//! only what they care about.

use crate::result::AnalysisResult;
use crate::upload::SelectedFile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Stage table ──────────────────────────────────────────────────────────

/// One discrete step of the simulated processing sequence.
///
/// Stages are ordered, non-skippable, and each carries a fixed
/// percent-complete value and a user-facing label. The table is the
/// product's script; there is nothing configurable about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    ExtractingStructure,
    AnalyzingSemantics,
    BuildingKnowledgeGraph,
    GeneratingInsights,
    Complete,
}

impl Stage {
    /// The five stages in execution order.
    pub const SEQUENCE: [Stage; 5] = [
        Stage::ExtractingStructure,
        Stage::AnalyzingSemantics,
        Stage::BuildingKnowledgeGraph,
        Stage::GeneratingInsights,
        Stage::Complete,
    ];

    /// Fixed percent-complete value reported when this stage is reached.
    pub fn percent(self) -> u8 {
        match self {
            Stage::ExtractingStructure => 20,
            Stage::AnalyzingSemantics => 40,
            Stage::BuildingKnowledgeGraph => 60,
            Stage::GeneratingInsights => 80,
            Stage::Complete => 100,
        }
    }

    /// User-facing label shown while this stage is reported.
    pub fn label(self) -> &'static str {
        match self {
            Stage::ExtractingStructure => "Extracting document structure...",
            Stage::AnalyzingSemantics => "Analyzing semantic content...",
            Stage::BuildingKnowledgeGraph => "Building knowledge graph...",
            Stage::GeneratingInsights => "Generating insights...",
            Stage::Complete => "Processing complete!",
        }
    }

    /// Whether this is the final stage of the sequence.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete)
    }
}

/// A single progress notification emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub stage: Stage,
    /// Percent complete in [0, 100]; identical to `stage.percent()`.
    pub percent: u8,
    /// Label for display; identical to `stage.label()`.
    pub label: &'static str,
}

impl ProgressEvent {
    pub fn for_stage(stage: Stage) -> Self {
        Self {
            stage,
            percent: stage.percent(),
            label: stage.label(),
        }
    }
}

// ── Observable run state ─────────────────────────────────────────────────

/// What a consumer sees of the current run: percent, label, running flag.
///
/// Mutated only by the session as it folds run events; everyone else reads.
/// Reset to 0/idle when a new run starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    percent: u8,
    stage_label: String,
    is_running: bool,
}

impl ProgressState {
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn stage_label(&self) -> &str {
        &self.stage_label
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// A new run starts: back to 0, no label, running.
    pub(crate) fn begin(&mut self) {
        self.percent = 0;
        self.stage_label.clear();
        self.is_running = true;
    }

    /// Fold one progress event into the state.
    pub(crate) fn advance(&mut self, event: &ProgressEvent) {
        self.percent = event.percent;
        self.stage_label = event.label.to_string();
    }

    /// The run delivered its result; percent and label keep their terminal
    /// values so the UI can continue showing "complete".
    pub(crate) fn finish(&mut self) {
        self.is_running = false;
    }

    /// Back to idle (abandoned run).
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Progress callbacks ───────────────────────────────────────────────────

/// Called by the eager processing path as the run advances.
///
/// Implementations must be `Send + Sync`; all methods have default no-op
/// implementations so callers only override what they need.
pub trait AnalysisProgressCallback: Send + Sync {
    /// Called once when the run starts, before any stage timer is armed.
    ///
    /// # Arguments
    /// * `file`         — the accepted file the run was started for
    /// * `total_stages` — number of stage events the run will emit
    fn on_run_start(&self, file: &SelectedFile, total_stages: usize) {
        let _ = (file, total_stages);
    }

    /// Called once per stage, after its delay elapses.
    fn on_stage(&self, event: &ProgressEvent) {
        let _ = event;
    }

    /// Called once with the synthesized result, after the terminal stage.
    fn on_complete(&self, result: &AnalysisResult) {
        let _ = result;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProcessorConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
