//! Error types for the neuraldocs library.
//!
//! The simulated pipeline is deliberately hard to break: the run itself is
//! infallible by contract. What remains are the edges where a caller can
//! hand us something wrong or the host system can refuse us:
//!
//! * selection of a non-PDF input (the only error the original product
//!   surfaces to its users),
//! * starting a run with no selection, or while another run is active,
//! * encoding the export document and delivering its bytes to the
//!   filesystem.
//!
//! Each variant carries a stable machine-readable [`reason_code`] so hosting
//! UIs can map errors to notifications without parsing display strings.
//!
//! [`reason_code`]: NeuralDocsError::reason_code

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the neuraldocs library.
#[derive(Debug, Error)]
pub enum NeuralDocsError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The declared MIME type of the selected input is not the PDF type.
    ///
    /// Only `application/pdf` passes the gate; the check is an exact string
    /// comparison on the declared type, never a content sniff.
    #[error("Unsupported file type '{mime}'\nPlease select a PDF file (application/pdf).")]
    UnsupportedType { mime: String },

    /// A run was requested before any file passed the gate.
    #[error("No file selected\nSelect a PDF document before starting an analysis run.")]
    NoFileSelected,

    // ── Run errors ────────────────────────────────────────────────────────
    /// A run was requested while another run is still active.
    ///
    /// At most one run may be active per session; the session rejects the
    /// second request instead of queueing it.
    #[error("An analysis run is already in progress\nWait for it to finish (or abandon it) before starting another.")]
    RunInProgress,

    // ── Export errors ─────────────────────────────────────────────────────
    /// Export was requested before any run delivered a result.
    #[error("No analysis result available\nRun an analysis to completion before exporting.")]
    NoResultAvailable,

    /// Could not encode the analysis result as an export document.
    #[error("Failed to encode export document: {source}")]
    ExportEncodeFailed {
        #[source]
        source: serde_json::Error,
    },

    /// Could not write the export artifact to disk.
    #[error("Failed to write export artifact '{path}': {source}")]
    ExportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NeuralDocsError {
    /// Stable machine-readable code for each error kind.
    ///
    /// `"unsupported-type"` is part of the selection contract; the others
    /// follow the same naming scheme.
    pub fn reason_code(&self) -> &'static str {
        match self {
            NeuralDocsError::UnsupportedType { .. } => "unsupported-type",
            NeuralDocsError::NoFileSelected => "no-file-selected",
            NeuralDocsError::RunInProgress => "run-in-progress",
            NeuralDocsError::NoResultAvailable => "no-result-available",
            NeuralDocsError::ExportEncodeFailed { .. } => "export-encode-failed",
            NeuralDocsError::ExportWriteFailed { .. } => "export-write-failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_display_names_the_mime() {
        let e = NeuralDocsError::UnsupportedType {
            mime: "image/png".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("image/png"), "got: {msg}");
        assert!(msg.contains("PDF"), "got: {msg}");
    }

    #[test]
    fn unsupported_type_reason_code_is_stable() {
        let e = NeuralDocsError::UnsupportedType {
            mime: "text/plain".into(),
        };
        assert_eq!(e.reason_code(), "unsupported-type");
    }

    #[test]
    fn run_in_progress_display() {
        let msg = NeuralDocsError::RunInProgress.to_string();
        assert!(msg.contains("already in progress"), "got: {msg}");
    }

    #[test]
    fn export_write_failed_display_names_the_path() {
        let e = NeuralDocsError::ExportWriteFailed {
            path: PathBuf::from("/tmp/analysis-report.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = e.to_string();
        assert!(msg.contains("analysis-report.json"), "got: {msg}");
    }

    #[test]
    fn every_variant_has_a_distinct_reason_code() {
        let codes = [
            NeuralDocsError::UnsupportedType { mime: "x".into() }.reason_code(),
            NeuralDocsError::NoFileSelected.reason_code(),
            NeuralDocsError::RunInProgress.reason_code(),
            NeuralDocsError::NoResultAvailable.reason_code(),
            NeuralDocsError::ExportEncodeFailed {
                source: serde_json::from_str::<u32>("not json").unwrap_err(),
            }
            .reason_code(),
            NeuralDocsError::ExportWriteFailed {
                path: PathBuf::new(),
                source: std::io::Error::other("x"),
            }
            .reason_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
