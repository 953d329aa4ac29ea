//! ltc-stamper CLI.
//!
//! Walks an input directory for video clips, reads the timecode marker
//! from the head of each clip, and writes a copy with a synthesized LTC
//! audio track into the output directory. The batch attempts every
//! discovered file; per-file failures are reported and skipped.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lts_core::config::{ConfigManager, Settings};
use lts_core::jobs::{self, ClipJob};
use lts_core::orchestrator::{JobResult, QueueProcessor};
use lts_core::tools::ToolPaths;

/// Exit code for usage and startup failures.
const EXIT_STARTUP_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "ltc-stamper",
    version,
    about = "Add LTC audio tracks to video clips, timed from their QR start markers"
)]
struct Cli {
    /// Input directory, scanned recursively for video files.
    input_dir: PathBuf,

    /// Output directory; input subpaths are mirrored beneath it.
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = load_settings();

    let logs_dir = PathBuf::from(&settings.paths.logs_folder);
    let _log_guard = match init_tracing(&logs_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            return ExitCode::from(EXIT_STARTUP_FAILURE);
        }
    };

    let tools = match ToolPaths::resolve(&settings.tools) {
        Ok(tools) => tools,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_STARTUP_FAILURE);
        }
    };

    let jobs = match jobs::discover_clips(&cli.input_dir) {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_STARTUP_FAILURE);
        }
    };

    println!("Scanning for video files in: {}", cli.input_dir.display());
    println!("-----------------------------------");

    if jobs.is_empty() {
        println!("No video files found in: {}", cli.input_dir.display());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = std::fs::create_dir_all(&cli.output_dir) {
        eprintln!(
            "error: cannot create output directory {}: {e}",
            cli.output_dir.display()
        );
        return ExitCode::from(EXIT_STARTUP_FAILURE);
    }

    tracing::info!(
        "starting batch: {} clip(s) from {} into {}",
        jobs.len(),
        cli.input_dir.display(),
        cli.output_dir.display()
    );

    let processor = QueueProcessor::new(
        settings.clone(),
        tools,
        logs_dir,
        PathBuf::from(&settings.paths.temp_root),
        cli.output_dir.clone(),
    );

    let results = processor.process_queue(&jobs, |_| None);
    report(&jobs, &results);

    // The batch always finishes; per-file failures do not change the
    // exit code.
    ExitCode::SUCCESS
}

/// Load settings from the default config location, creating the file on
/// first run. Falls back to defaults when the config is unusable.
fn load_settings() -> Settings {
    let Some(config_path) = ConfigManager::default_config_path() else {
        return Settings::default();
    };

    let mut manager = ConfigManager::new(&config_path);
    match manager.load_or_create() {
        Ok(settings) => settings.clone(),
        Err(e) => {
            eprintln!(
                "warning: could not load config from {} ({e}), using defaults",
                config_path.display()
            );
            Settings::default()
        }
    }
}

/// Set up tracing with console output plus a batch log file.
fn init_tracing(
    logs_dir: &std::path::Path,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, "ltc-stamper.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

/// Print one line per file plus the batch summary.
fn report(jobs: &[ClipJob], results: &[JobResult]) {
    for result in results {
        if result.success {
            let output = result
                .output_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("OK    {} -> {}", result.input_path.display(), output);
        } else {
            let reason = result.error.as_deref().unwrap_or("unknown error");
            println!("SKIP  {}: {}", result.input_path.display(), reason);
        }
    }

    let processed = results.iter().filter(|r| r.success).count();
    let skipped = results.len() - processed;
    println!("-----------------------------------");
    println!(
        "Processed {} of {} clip(s), {} skipped",
        processed,
        jobs.len(),
        skipped
    );
}
