//! Result records produced by a completed run, and the last-result store.

use serde::{Deserialize, Serialize};

/// The terminal output record of a processing run.
///
/// Created exactly once per completed run and immutable thereafter; a later
/// run supersedes (never merges with) the stored record. Only the file name
/// and declared size flow in from the selection — everything else is
/// synthesized by the configured producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Name of the analyzed file, verbatim from the selection.
    pub filename: String,
    /// Display size, e.g. `"2.00 MB"` (see `SelectedFile::size_label`).
    pub size_label: String,
    /// Reported page count (> 0).
    pub page_count: u32,
    /// Extracted headings, in document order.
    pub headings: Vec<String>,
    pub semantic_structure: SemanticStructure,
    /// Key insights, in presentation order.
    pub insights: Vec<String>,
    /// Reported processing time in seconds.
    pub processing_time_seconds: f64,
}

/// Document-level structure with per-section confidence scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticStructure {
    pub title: String,
    pub sections: Vec<SectionScore>,
}

/// One recognized section and the confidence of its classification, in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScore {
    pub name: String,
    pub confidence: f64,
}

/// Holds the last-produced result for rendering and export.
#[derive(Debug, Default)]
pub struct ResultStore {
    current: Option<AnalysisResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result, superseding any previous one.
    pub fn set(&mut self, result: AnalysisResult) {
        self.current = Some(result);
    }

    pub fn get(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    /// Discard the stored result (a new valid selection makes it stale).
    pub fn clear(&mut self) {
        self.current = None;
    }
}
