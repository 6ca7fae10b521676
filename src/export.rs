//! JSON export of a completed analysis.
//!
//! ## The export document
//!
//! The artifact is pretty-printed UTF-8 JSON with three fixed groups:
//!
//! ```json
//! {
//!   "documentInfo": { "filename": "report.pdf", "size": "2.00 MB", "pages": 42 },
//!   "analysis": { "headings": [], "semanticStructure": {}, "insights": [] },
//!   "metadata": { "processingTime": 3.2, "timestamp": "2026-08-26T12:00:00.000Z" }
//! }
//! ```
//!
//! Encoding is a pure function of the result and the supplied timestamp;
//! [`export_at`] takes the timestamp explicitly so tests can pin it and
//! assert on exact bytes. Writing goes through a temp file and a rename, so
//! a crash mid-write never leaves a truncated artifact under the final name.

use crate::error::NeuralDocsError;
use crate::result::{AnalysisResult, SemanticStructure};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ── Document shape ───────────────────────────────────────────────────────
//
// Borrowed views over `AnalysisResult`, regrouped into the published
// three-part layout. Field order here is the key order in the output.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    document_info: DocumentInfo<'a>,
    analysis: AnalysisBody<'a>,
    metadata: RunMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo<'a> {
    filename: &'a str,
    size: &'a str,
    pages: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisBody<'a> {
    headings: &'a [String],
    semantic_structure: &'a SemanticStructure,
    insights: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunMetadata {
    processing_time: f64,
    timestamp: String,
}

// ── Artifact ─────────────────────────────────────────────────────────────

/// A ready-to-save export: the artifact file name plus its JSON bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Derived name, e.g. `analysis-report.json` for `report.pdf`.
    pub filename: String,
    /// Pretty-printed UTF-8 JSON document.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its derived name, creating the
    /// directory if needed. Returns the full path of the written file.
    ///
    /// The bytes land in a `.json.tmp` sibling first and are renamed into
    /// place, so readers only ever observe complete artifacts.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, NeuralDocsError> {
        let dir = dir.as_ref();
        let path = dir.join(&self.filename);

        fs::create_dir_all(dir).map_err(|e| NeuralDocsError::ExportWriteFailed {
            path: path.clone(),
            source: e,
        })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &self.bytes).map_err(|e| NeuralDocsError::ExportWriteFailed {
            path: path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| NeuralDocsError::ExportWriteFailed {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), bytes = self.bytes.len(), "export artifact written");
        Ok(path)
    }
}

// ── Encoding ─────────────────────────────────────────────────────────────

/// Derive the artifact file name: `analysis-<stem>.json`, where the stem is
/// the analyzed file's name with one trailing `.pdf` removed.
///
/// The match is case-sensitive and suffix-only: `report.PDF` keeps its
/// extension in the stem, and `a.pdf.pdf` loses only the final `.pdf`.
pub fn export_filename(result: &AnalysisResult) -> String {
    let stem = result
        .filename
        .strip_suffix(".pdf")
        .unwrap_or(&result.filename);
    format!("analysis-{stem}.json")
}

/// Encode `result` as an export artifact stamped with the current time.
pub fn export(result: &AnalysisResult) -> Result<ExportArtifact, NeuralDocsError> {
    export_at(result, Utc::now())
}

/// Encode `result` with an explicit timestamp.
///
/// The output is a pure function of the arguments: same result, same
/// timestamp, same bytes. The timestamp is rendered in RFC 3339 with
/// millisecond precision and a `Z` offset, e.g. `2026-08-26T12:00:00.000Z`.
pub fn export_at(
    result: &AnalysisResult,
    timestamp: DateTime<Utc>,
) -> Result<ExportArtifact, NeuralDocsError> {
    let document = ExportDocument {
        document_info: DocumentInfo {
            filename: &result.filename,
            size: &result.size_label,
            pages: result.page_count,
        },
        analysis: AnalysisBody {
            headings: &result.headings,
            semantic_structure: &result.semantic_structure,
            insights: &result.insights,
        },
        metadata: RunMetadata {
            processing_time: result.processing_time_seconds,
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    };

    let bytes = serde_json::to_vec_pretty(&document)
        .map_err(|e| NeuralDocsError::ExportEncodeFailed { source: e })?;

    Ok(ExportArtifact {
        filename: export_filename(result),
        bytes,
    })
}
