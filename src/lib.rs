//! # neuraldocs
//!
//! The document-analysis pipeline behind the Neural Docs demo: a staged,
//! timed "analysis" of an uploaded PDF with canned insights and JSON export.
//!
//! ## Why a simulation?
//!
//! The demo sells the *experience* of document analysis: pick a PDF, watch
//! five named stages tick by, read an academic-looking report, download it
//! as JSON. None of that needs a real analyzer, but all of it needs exact
//! behaviour: the gate only accepts `application/pdf`, the stages land at
//! 20/40/60/80/100 % with an 800 ms pause before each, and the export is a
//! stable three-group document. This crate is that behaviour, testable and
//! reusable without a UI; the content seam ([`ResultProducer`]) is where a
//! genuine backend would plug in.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF selection (metadata only; file bytes are never read)
//!  │
//!  ├─ 1. Gate     accept application/pdf, reject everything else
//!  ├─ 2. Run      five timed stages, 20 → 100 %, one delay before each
//!  ├─ 3. Result   canned academic payload + randomized page count
//!  └─ 4. Export   pretty-JSON artifact, analysis-<stem>.json
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use neuraldocs::{DocumentSession, SelectedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), neuraldocs::NeuralDocsError> {
//!     let mut session = DocumentSession::new();
//!     session.select(SelectedFile::new("report.pdf", 2_097_152, "application/pdf"))?;
//!
//!     let mut events = session.begin_run()?;
//!     while let Some(event) = events.next().await {
//!         session.apply(&event);
//!         eprintln!("{:>3}% {}", session.progress().percent(), session.progress().stage_label());
//!     }
//!
//!     let artifact = session.export()?;
//!     println!("{}", String::from_utf8_lossy(&artifact.bytes));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `neuraldocs` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! neuraldocs = { version = "0.1", default-features = false }
//! ```
//!
//! ## Real vs. Simulated
//!
//! | Surface | Behaviour |
//! |---------|-----------|
//! | Upload gate | Real validation of the declared MIME type |
//! | Stage timing | Real timers, 800 ms per stage (configurable) |
//! | Analysis content | Canned payload; the page count is the only variable |
//! | Export | Real file, pretty JSON, temp-file + rename write |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod counter;
pub mod error;
pub mod export;
pub mod producer;
pub mod progress;
pub mod result;
pub mod session;
pub mod task;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessorConfig, ProcessorConfigBuilder};
pub use counter::{BannerStat, CounterStream, StatsCounter, BANNER_STATS};
pub use error::NeuralDocsError;
pub use export::{export, export_at, export_filename, ExportArtifact};
pub use producer::{MockAnalyzer, ResultProducer};
pub use progress::{
    AnalysisProgressCallback, NoopProgressCallback, ProgressCallback, ProgressEvent,
    ProgressState, Stage,
};
pub use result::{AnalysisResult, ResultStore, SectionScore, SemanticStructure};
pub use session::DocumentSession;
pub use task::{ProcessingTask, RunEvent, RunStream};
pub use upload::{SelectedFile, UploadGate, PDF_MIME};
