//! File-selection gate: declared-MIME validation and the current selection.
//!
//! ## Why a metadata check and not a parser?
//!
//! The product's upload step never reads file content. It trusts the declared
//! MIME type exactly as the host environment reports it, which is the entire
//! contract: `application/pdf` passes, everything else is rejected with a
//! visible notification and no state change. No size limit, no magic-byte
//! sniffing, no malformed-file detection — those belong to a real analyzer,
//! which this crate deliberately does not contain.

use crate::error::NeuralDocsError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The only declared MIME type the gate accepts.
pub const PDF_MIME: &str = "application/pdf";

/// A file selection as the host reported it: name, declared length, declared
/// MIME type. Content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    /// File name as presented by the host (e.g. `report.pdf`).
    pub name: String,
    /// Declared length in bytes.
    pub byte_size: u64,
    /// Declared MIME type string, compared verbatim against [`PDF_MIME`].
    pub mime_type: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
        }
    }

    /// Human-readable size, always in megabytes with two decimals.
    ///
    /// 2,097,152 bytes → `"2.00 MB"`. The unit does not scale down for small
    /// files (a 3 KB file reads `"0.00 MB"`), matching the product's display.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.byte_size as f64 / 1024.0 / 1024.0)
    }
}

/// Holds the current (accepted) selection and validates candidates.
///
/// A successful [`select`] replaces the previous selection; a rejected one
/// leaves it untouched. The gate itself never clears a stored result — that
/// is the session's job, signalled by the `Ok` return.
///
/// [`select`]: UploadGate::select
#[derive(Debug, Default)]
pub struct UploadGate {
    current: Option<SelectedFile>,
}

impl UploadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a candidate and, on success, make it the current selection.
    ///
    /// # Errors
    /// [`NeuralDocsError::UnsupportedType`] when the declared MIME type is
    /// anything other than `application/pdf` (exact, case-sensitive match).
    /// The previous selection is preserved in that case.
    pub fn select(&mut self, candidate: SelectedFile) -> Result<&SelectedFile, NeuralDocsError> {
        if candidate.mime_type != PDF_MIME {
            warn!(
                "Rejected file '{}': unsupported type '{}'",
                candidate.name, candidate.mime_type
            );
            return Err(NeuralDocsError::UnsupportedType {
                mime: candidate.mime_type,
            });
        }

        info!(
            "Accepted file '{}' ({})",
            candidate.name,
            candidate.size_label()
        );
        Ok(&*self.current.insert(candidate))
    }

    /// The current accepted selection, if any.
    pub fn selected(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_declared_pdf() {
        let mut gate = UploadGate::new();
        let accepted = gate
            .select(SelectedFile::new("report.pdf", 2_097_152, PDF_MIME))
            .expect("application/pdf must pass the gate");
        assert_eq!(accepted.name, "report.pdf");
        assert_eq!(gate.selected().map(|f| f.name.as_str()), Some("report.pdf"));
    }

    #[test]
    fn rejects_anything_else() {
        let mut gate = UploadGate::new();
        for mime in ["image/png", "text/plain", "application/json", ""] {
            let err = gate
                .select(SelectedFile::new("file.pdf", 10, mime))
                .expect_err("non-PDF MIME must be rejected");
            assert_eq!(err.reason_code(), "unsupported-type");
        }
        assert!(gate.selected().is_none(), "rejections must not store state");
    }

    #[test]
    fn mime_comparison_is_case_sensitive() {
        let mut gate = UploadGate::new();
        assert!(gate
            .select(SelectedFile::new("f.pdf", 1, "Application/PDF"))
            .is_err());
    }

    #[test]
    fn rejection_preserves_prior_selection() {
        let mut gate = UploadGate::new();
        gate.select(SelectedFile::new("first.pdf", 100, PDF_MIME))
            .expect("valid file");

        let err = gate
            .select(SelectedFile::new("second.png", 200, "image/png"))
            .expect_err("png must be rejected");
        assert_eq!(err.reason_code(), "unsupported-type");

        let kept = gate.selected().expect("prior selection must survive");
        assert_eq!(kept.name, "first.pdf");
        assert_eq!(kept.byte_size, 100);
    }

    #[test]
    fn new_valid_selection_replaces_prior() {
        let mut gate = UploadGate::new();
        gate.select(SelectedFile::new("first.pdf", 100, PDF_MIME))
            .expect("valid file");
        gate.select(SelectedFile::new("second.pdf", 200, PDF_MIME))
            .expect("valid file");
        assert_eq!(gate.selected().map(|f| f.name.as_str()), Some("second.pdf"));
    }

    #[test]
    fn size_label_formats_two_decimal_megabytes() {
        let two_mb = SelectedFile::new("report.pdf", 2_097_152, PDF_MIME);
        assert_eq!(two_mb.size_label(), "2.00 MB");

        let one_and_a_half = SelectedFile::new("a.pdf", 1_572_864, PDF_MIME);
        assert_eq!(one_and_a_half.size_label(), "1.50 MB");

        let tiny = SelectedFile::new("tiny.pdf", 3_072, PDF_MIME);
        assert_eq!(tiny.size_label(), "0.00 MB");

        let empty = SelectedFile::new("empty.pdf", 0, PDF_MIME);
        assert_eq!(empty.size_label(), "0.00 MB");
    }
}
