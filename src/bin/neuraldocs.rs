//! CLI binary for neuraldocs.
//!
//! A thin shim over the library crate: maps CLI flags to `ProcessorConfig`,
//! drives one session run in the terminal, and writes (or prints) the
//! export artifact.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use neuraldocs::{
    AnalysisResult, DocumentSession, ProcessorConfig, RunEvent, SelectedFile, StatsCounter,
    BANNER_STATS, PDF_MIME,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a PDF; writes analysis-<name>.json into the current directory
  neuraldocs report.pdf

  # Choose where the artifact goes
  neuraldocs report.pdf -o exports/

  # Print the export document to stdout instead of writing a file
  neuraldocs report.pdf --json

  # Deterministic page count for demos and CI
  neuraldocs report.pdf --seed 42

  # Faster stages for quick demos
  neuraldocs report.pdf --stage-delay-ms 100

  # Watch the gate reject a non-PDF
  neuraldocs notes.txt --size-bytes 1024

  # No file on disk? Declare its metadata (content is never read)
  neuraldocs slides.pdf --size-bytes 2097152

ENVIRONMENT VARIABLES:
  NEURALDOCS_OUTPUT_DIR       Artifact directory (same as -o)
  NEURALDOCS_MIME             Override the declared MIME type
  NEURALDOCS_STAGE_DELAY_MS   Delay before each stage in ms (default 800)
  NEURALDOCS_SEED             Seed for the randomized page count
  NEURALDOCS_JSON             Print the export document to stdout
  NEURALDOCS_NO_PROGRESS      Disable the progress bar
  NEURALDOCS_NO_BANNER        Skip the animated banner
  NEURALDOCS_VERBOSE          DEBUG-level tracing logs
  NEURALDOCS_QUIET            Suppress all output except errors

NOTE:
  The analysis is simulated. The file's content is never read; only its
  name, size, and declared MIME type flow into the run. The stages, the
  report, and the export format are the product's real behaviour.
"#;

/// Run the Neural Docs analysis demo from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "neuraldocs",
    version,
    about = "Staged document analysis demo with canned insights and JSON export",
    long_about = "Run the Neural Docs analysis flow in the terminal: select a PDF, watch the \
five processing stages tick by, read the generated report, and save it as a JSON artifact. \
The analysis itself is simulated; the pacing, the gate, and the export format are real.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path of the PDF to analyze. Only metadata is used.
    input: String,

    /// Directory the export artifact is written into.
    #[arg(short, long, env = "NEURALDOCS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the export document to stdout instead of writing a file.
    #[arg(long, env = "NEURALDOCS_JSON")]
    json: bool,

    /// Declared MIME type; derived from the file extension if not set.
    #[arg(long, env = "NEURALDOCS_MIME")]
    mime: Option<String>,

    /// Declared size in bytes; read from the filesystem if not set.
    #[arg(long)]
    size_bytes: Option<u64>,

    /// Delay before each processing stage, in milliseconds.
    #[arg(long, env = "NEURALDOCS_STAGE_DELAY_MS", default_value_t = 800)]
    stage_delay_ms: u64,

    /// Seed for the randomized page count (reproducible runs).
    #[arg(long, env = "NEURALDOCS_SEED")]
    seed: Option<u64>,

    /// Disable the progress bar.
    #[arg(long, env = "NEURALDOCS_NO_PROGRESS")]
    no_progress: bool,

    /// Skip the animated statistics banner.
    #[arg(long, env = "NEURALDOCS_NO_BANNER")]
    no_banner: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NEURALDOCS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NEURALDOCS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let decorate = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Banner ───────────────────────────────────────────────────────────
    if decorate && !cli.no_banner {
        print_banner().await;
    }

    // ── Declare the file and open the session ────────────────────────────
    let file = declared_file(&cli)?;

    let mut builder = ProcessorConfig::builder()
        .stage_delay(Duration::from_millis(cli.stage_delay_ms));
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let mut session = DocumentSession::with_config(builder.build());

    if let Err(err) = session.select(file) {
        // The product's rejection toast, verbatim.
        eprintln!("{} {}", red("✗"), bold("Invalid File"));
        eprintln!("   Please select a PDF file");
        tracing::debug!(code = err.reason_code(), "selection rejected");
        std::process::exit(1);
    }
    if decorate {
        if let Some(selected) = session.selected_file() {
            eprintln!(
                "{} {}  {}",
                cyan("◆"),
                bold(&selected.name),
                dim(&format!("({})", selected.size_label()))
            );
        }
    }

    // ── Drive the run ────────────────────────────────────────────────────
    let mut events = session.begin_run().context("Could not start the run")?;

    let bar = if show_progress {
        Some(spinner_bar())
    } else {
        None
    };
    let mut bar_active = false;
    let mut stage_start = Instant::now();

    while let Some(event) = events.next().await {
        session.apply(&event);
        match &event {
            RunEvent::Progress(progress) => {
                let elapsed = stage_start.elapsed().as_secs_f64();
                stage_start = Instant::now();
                if let Some(ref bar) = bar {
                    if !bar_active {
                        activate_stage_bar(bar);
                        bar_active = true;
                    }
                    bar.set_position(progress.percent as u64);
                    bar.set_message(progress.label);
                    bar.println(format!(
                        "  {} {:>3}%  {:<36} {}",
                        green("✓"),
                        progress.percent,
                        progress.label,
                        dim(&format!("{elapsed:.1}s")),
                    ));
                } else if decorate {
                    eprintln!("  {:>3}%  {}", progress.percent, progress.label);
                }
            }
            RunEvent::Completed(_) => {
                if let Some(ref bar) = bar {
                    bar.finish_and_clear();
                }
            }
        }
    }

    let result = session.result().context("Run produced no result")?;

    if decorate {
        eprintln!("{} {}", green("✔"), bold("Analysis Complete"));
        eprintln!(
            "   {}",
            dim(&format!(
                "Document processed successfully in {}s",
                result.processing_time_seconds
            ))
        );
        render_result(result);
    }

    // ── Export ───────────────────────────────────────────────────────────
    let artifact = session.export().context("Export failed")?;

    if cli.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(&artifact.bytes)
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    } else {
        let path = artifact
            .write_to_dir(&cli.output_dir)
            .context("Failed to write export artifact")?;
        if !cli.quiet {
            eprintln!(
                "{}  {} pages  {}s  →  {}",
                green("✔"),
                result.page_count,
                result.processing_time_seconds,
                bold(&path.display().to_string()),
            );
        }
    }

    Ok(())
}

// ── Banner ───────────────────────────────────────────────────────────────────

/// Animate the landing page's four statistics on one stderr line.
async fn print_banner() {
    eprintln!("{} {}", cyan("◆"), bold("Neural Docs"));

    let mut current = [0u64; BANNER_STATS.len()];
    let streams: Vec<_> = BANNER_STATS
        .iter()
        .enumerate()
        .map(|(i, stat)| StatsCounter::new(stat.target).values().map(move |v| (i, v)))
        .collect();

    let mut merged = stream::select_all(streams);
    while let Some((i, value)) = merged.next().await {
        current[i] = value;
        let line = BANNER_STATS
            .iter()
            .zip(current.iter())
            .map(|(stat, value)| {
                format!("{} {}", bold(&format!("{value}{}", stat.suffix)), dim(stat.label))
            })
            .collect::<Vec<_>>()
            .join("   ");
        eprint!("\r  {line}");
    }
    eprintln!("\n");
}

// ── Progress bar ─────────────────────────────────────────────────────────────

/// Initial style: spinner only, while the first stage timer runs.
fn spinner_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);

    let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

    bar.set_style(spinner_style);
    bar.set_prefix("Analyzing");
    bar.set_message("Starting analysis…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Switch to the full percent bar once the first stage lands.
fn activate_stage_bar(bar: &ProgressBar) {
    let progress_style = ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  \
         [{bar:42.green/238}] {pos:>3}%  {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

    bar.set_style(progress_style);
}

// ── Result rendering ─────────────────────────────────────────────────────────

/// Print the four report views the product shows as tabs.
fn render_result(result: &AnalysisResult) {
    eprintln!();
    eprintln!("{} {}", cyan("◆"), bold("Overview"));
    eprintln!("   Pages      {}", result.page_count);
    eprintln!("   Size       {}", result.size_label);
    eprintln!("   Sections   {}", result.semantic_structure.sections.len());
    eprintln!("   Time       {}s", result.processing_time_seconds);

    eprintln!();
    eprintln!("{} {}", cyan("◆"), bold("Document Structure"));
    for (i, heading) in result.headings.iter().enumerate() {
        eprintln!("   {}. {}", i + 1, heading);
    }

    eprintln!();
    eprintln!("{} {}", cyan("◆"), bold("Semantic Analysis"));
    eprintln!("   {}", bold(&result.semantic_structure.title));
    for section in &result.semantic_structure.sections {
        let percent = (section.confidence * 100.0).round() as u32;
        let filled = ((section.confidence * 20.0).round() as usize).min(20);
        eprintln!(
            "   {:<18} [{}{}] {:>3}%",
            section.name,
            "█".repeat(filled),
            "░".repeat(20 - filled),
            percent,
        );
    }

    eprintln!();
    eprintln!("{} {}", cyan("◆"), bold("Key Insights"));
    for insight in &result.insights {
        eprintln!("   • {insight}");
    }
    eprintln!();
}

// ── Input handling ───────────────────────────────────────────────────────────

/// Build the declared-metadata view of the input that a browser file input
/// would hand the page: name, size, MIME by extension. Content is not read.
fn declared_file(cli: &Cli) -> Result<SelectedFile> {
    let path = Path::new(&cli.input);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| cli.input.clone());

    let byte_size = match cli.size_bytes {
        Some(size) => size,
        None => std::fs::metadata(path)
            .with_context(|| {
                format!(
                    "Cannot stat '{}' (pass --size-bytes to declare a size instead)",
                    cli.input
                )
            })?
            .len(),
    };

    let mime = cli.mime.clone().unwrap_or_else(|| mime_for_path(path));
    Ok(SelectedFile::new(name, byte_size, mime))
}

/// The MIME type a browser would declare for this extension.
fn mime_for_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => PDF_MIME.to_string(),
        Some("txt") | Some("md") => "text/plain".to_string(),
        Some("png") => "image/png".to_string(),
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some("json") => "application/json".to_string(),
        Some("doc") => "application/msword".to_string(),
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string()
        }
        _ => "application/octet-stream".to_string(),
    }
}
