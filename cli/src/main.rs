//! outliner CLI - document outline extraction tool
//!
//! Consumes JSON fragment dumps produced by an external byte-level
//! extractor and writes one outline artifact per input document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use outliner::{
    BatchRunner, Config, DocumentStatus, Error, FragmentSource, FragmentStream, JsonFormat,
    Outliner, SourceRegistry,
};

#[derive(Parser)]
#[command(name = "outliner")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document outlines from text-fragment dumps", long_about = None)]
struct Cli {
    /// Maximum input size in MB; larger files are skipped
    #[arg(long, env = "OUTLINER_MAX_FILE_SIZE_MB", default_value = "100")]
    max_file_size_mb: u32,

    /// Maximum headings emitted per document
    #[arg(long, env = "OUTLINER_MAX_HEADINGS", default_value = "50")]
    max_headings: usize,

    /// Per-document timeout in seconds
    #[arg(long, env = "OUTLINER_TIMEOUT_SECS", default_value = "300")]
    timeout_secs: u64,

    /// Parse retry attempts for transient failures
    #[arg(long, env = "OUTLINER_RETRY_ATTEMPTS", default_value = "3")]
    retry_attempts: u32,

    /// Consecutive failures before remaining documents are skipped
    #[arg(long, env = "OUTLINER_BREAKER_THRESHOLD", default_value = "5")]
    breaker_threshold: u32,

    /// Worker pool size (0 = one per core)
    #[arg(long, env = "OUTLINER_WORKERS", default_value = "0")]
    workers: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every fragment dump in a directory
    Run {
        /// Input directory containing *.json fragment dumps
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory for outline artifacts
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Extract the outline of a single fragment dump
    Extract {
        /// Input fragment dump
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show fragment statistics for a dump
    Info {
        /// Input fragment dump
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    if let Err(e) = config.validate() {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(2);
    }

    let result = match cli.command {
        Commands::Run { ref input, ref output } => cmd_run(input, output.as_deref(), &config),
        Commands::Extract {
            ref input,
            ref output,
            compact,
        } => cmd_extract(input, output.as_deref(), compact, &config),
        Commands::Info { ref input } => cmd_info(input, &config),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn build_config(cli: &Cli) -> Config {
    Config::default()
        .with_max_file_size_mb(cli.max_file_size_mb)
        .with_max_headings(cli.max_headings)
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_retry(cli.retry_attempts, Duration::from_secs(1), 2.0)
        .with_breaker_threshold(cli.breaker_threshold)
        .with_workers(cli.workers)
}

/// Source wrapper that advances the progress bar as documents are picked
/// up by workers. Retried parses count once.
struct TrackedSource {
    inner: Box<dyn FragmentSource>,
    bar: ProgressBar,
    counted: std::sync::atomic::AtomicBool,
}

impl FragmentSource for TrackedSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fragments(&self) -> outliner::Result<FragmentStream> {
        if !self.counted.swap(true, std::sync::atomic::Ordering::SeqCst) {
            self.bar.inc(1);
        }
        self.inner.fragments()
    }
}

/// A discovered input whose source could not be opened; reproduces the
/// open failure so the batch still emits a result record for it.
struct UnopenableSource {
    name: String,
    oversize: Option<(f64, u32)>,
    message: String,
}

impl UnopenableSource {
    fn new(path: &Path, error: Error) -> Self {
        let name = stem_of(path);
        let oversize = match &error {
            Error::OversizeInput { size_mb, limit_mb } => Some((*size_mb, *limit_mb)),
            _ => None,
        };
        Self {
            name,
            oversize,
            message: error.to_string(),
        }
    }
}

impl FragmentSource for UnopenableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragments(&self) -> outliner::Result<FragmentStream> {
        match self.oversize {
            Some((size_mb, limit_mb)) => Err(Error::OversizeInput { size_mb, limit_mb }),
            None => Err(Error::Parse(self.message.clone())),
        }
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_run(
    input: &Path,
    output: Option<&Path>,
    config: &Config,
) -> Result<i32, Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("outlines"));
    fs::create_dir_all(&output_dir)?;

    let mut paths: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        println!("{}", "No fragment dumps found in input directory".yellow());
        println!("  looked in: {}", input.display());
        return Ok(0);
    }

    println!(
        "{} {} document(s) from {}",
        "Processing".cyan().bold(),
        paths.len(),
        input.display()
    );

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let registry = SourceRegistry::with_defaults();
    let sources: Vec<Box<dyn FragmentSource>> = paths
        .iter()
        .map(|path| {
            let inner: Box<dyn FragmentSource> =
                match registry.open(path, config.max_file_size_mb) {
                    Ok(source) => source,
                    Err(e) => Box::new(UnopenableSource::new(path, e)),
                };
            Box::new(TrackedSource {
                inner,
                bar: pb.clone(),
                counted: std::sync::atomic::AtomicBool::new(false),
            }) as Box<dyn FragmentSource>
        })
        .collect();

    let runner = BatchRunner::new(config.clone())?;
    let report = runner.run(&sources);
    pb.finish_and_clear();

    for result in &report.results {
        match &result.status {
            DocumentStatus::Succeeded { outline } => {
                let out_path = output_dir.join(format!("{}.json", result.document));
                let json = outliner::render::to_json(outline, JsonFormat::Pretty)?;
                fs::write(&out_path, json)?;
                println!(
                    "  {} {} ({} headings)",
                    "ok".green(),
                    result.document,
                    outline.heading_count()
                );
                for warning in &result.warnings {
                    println!("     {} {}", "warning:".yellow(), warning);
                }
            }
            DocumentStatus::Failed { reason } => {
                println!("  {} {} ({})", "failed".red(), result.document, reason);
            }
            DocumentStatus::Skipped { reason } => {
                println!("  {} {} ({})", "skipped".yellow(), result.document, reason);
            }
        }
    }

    let summary = &report.summary;
    log::info!(
        "Processing complete: {}",
        serde_json::to_string(summary).unwrap_or_default()
    );
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Total".bold(), summary.total);
    println!("{}: {}", "Succeeded".bold(), summary.succeeded);
    println!("{}: {}", "Failed".bold(), summary.failed);
    println!("{}: {}", "Skipped".bold(), summary.skipped);
    println!("{}: {:.1}%", "Success rate".bold(), summary.success_rate);
    println!("{}: {:?}", "Duration".bold(), summary.duration);
    println!();
    println!("{} {}", "Outlines written to".green(), output_dir.display());

    Ok(if summary.failed > 0 { 1 } else { 0 })
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: &Config,
) -> Result<i32, Box<dyn std::error::Error>> {
    let result = Outliner::new()
        .with_config(config.clone())
        .engine()?
        .process(
            SourceRegistry::with_defaults()
                .open(input, config.max_file_size_mb)?
                .as_ref(),
        );

    match &result.status {
        DocumentStatus::Succeeded { outline } => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = outliner::render::to_json(outline, format)?;

            if let Some(path) = output {
                fs::write(path, &json)?;
                println!("{} {}", "Saved to".green(), path.display());
            } else {
                println!("{}", json);
            }
            Ok(0)
        }
        DocumentStatus::Failed { reason } | DocumentStatus::Skipped { reason } => {
            eprintln!("{}: {}", "Error".red().bold(), reason);
            Ok(1)
        }
    }
}

fn cmd_info(input: &Path, config: &Config) -> Result<i32, Box<dyn std::error::Error>> {
    let source = SourceRegistry::with_defaults().open(input, config.max_file_size_mb)?;
    let stream = source.fragments()?;
    let outline = outliner::classify(&stream, config);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), stream.page_count);
    println!("{}: {}", "Fragments".bold(), stream.len());

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Title".bold(), outline.title);
    println!("{}: {}", "Headings".bold(), outline.heading_count());

    let mut by_level = [0usize; 3];
    for heading in &outline.outline {
        by_level[(heading.level.depth() - 1) as usize] += 1;
    }
    println!(
        "{}: H1({}) H2({}) H3({})",
        "Levels".bold(),
        by_level[0],
        by_level[1],
        by_level[2]
    );

    Ok(0)
}
