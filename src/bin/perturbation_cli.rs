use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use midi_perturbation::analysis::extraction::extract_all;
use midi_perturbation::analysis::{analyze_stream, PerturbationAnalysis};
use midi_perturbation::config::{AnalysisOptions, DEFAULT_THRESHOLD};
use midi_perturbation::error::{
    log_analysis_error, log_midi_error, AnalysisError, ErrorCode, MidiError,
};
use midi_perturbation::fixtures::{ExpectationDiff, FixtureCatalog, FixtureMetadata};
use midi_perturbation::midi::decode_file;
use midi_perturbation::report::render_report;

#[derive(Parser, Debug)]
#[command(
    name = "perturbation_cli",
    about = "Perturbation-index harness for MIDI rhythm data"
)]
struct Cli {
    /// Override directory containing fixture assets (defaults to ./fixtures)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a MIDI file and optionally compare against expectations
    Analyze {
        /// Fixture name or direct path to a .mid file
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Maximum events to analyze (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
        /// Tempo override in BPM (0 = use the file tempo)
        #[arg(long, default_value_t = 0.0)]
        bpm: f64,
    },
    /// Print the human-readable perturbation report for a MIDI file
    Report {
        /// Fixture name or direct path to a .mid file
        #[arg(long)]
        fixture: String,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Maximum events to analyze (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
        /// Tempo override in BPM (0 = use the file tempo)
        #[arg(long, default_value_t = 0.0)]
        bpm: f64,
    },
    /// Stream extracted note events for a MIDI file to stdout
    Events {
        /// Fixture name or direct path to a .mid file
        #[arg(long)]
        fixture: String,
    },
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            if let Some(analysis_err) = err.downcast_ref::<AnalysisError>() {
                log_analysis_error(analysis_err, "perturbation_cli");
                eprintln!("Error {}: {}", analysis_err.code(), analysis_err.message());
            } else if let Some(midi_err) = err.downcast_ref::<MidiError>() {
                log_midi_error(midi_err, "perturbation_cli");
                eprintln!("Error {}: {}", midi_err.code(), midi_err.message());
            } else {
                eprintln!("Error: {err:?}");
            }
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_else(FixtureCatalog::default);

    match cli.command {
        Commands::Analyze {
            fixture,
            expect,
            output,
            skip,
            limit,
            threshold,
            bpm,
        } => run_analyze(&catalog, &fixture, expect, output, skip, limit, threshold, bpm),
        Commands::Report {
            fixture,
            skip,
            limit,
            threshold,
            bpm,
        } => run_report(&catalog, &fixture, skip, limit, threshold, bpm),
        Commands::Events { fixture } => run_events(&catalog, &fixture),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn build_options(
    metadata: &FixtureMetadata,
    skip: usize,
    limit: usize,
    threshold: f64,
    bpm: f64,
) -> AnalysisOptions {
    let display_name = metadata
        .midi_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| metadata.name.clone());

    let mut options = AnalysisOptions::default().with_display_name(display_name);
    options.skip = skip;
    options.limit = (limit > 0).then_some(limit);
    options.threshold = threshold;
    if bpm > 0.0 {
        options.bpm = Some(bpm);
    }
    options
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    catalog: &FixtureCatalog,
    fixture: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
    skip: usize,
    limit: usize,
    threshold: f64,
    bpm: f64,
) -> Result<ExitCode> {
    let (metadata, expectations) = catalog.load(fixture, override_expect)?;
    let stream = decode_file(&metadata.midi_path)?;
    let options = build_options(&metadata, skip, limit, threshold, bpm);
    let analysis = analyze_stream(&stream, &options)
        .with_context(|| format!("analyzing fixture {}", fixture))?;

    emit_bundle(&analysis, output_path)?;

    if let Some(expectations) = expectations {
        match expectations.verify(&analysis) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_report(
    catalog: &FixtureCatalog,
    fixture: &str,
    skip: usize,
    limit: usize,
    threshold: f64,
    bpm: f64,
) -> Result<ExitCode> {
    let (metadata, _) = catalog.load(fixture, None)?;
    let stream = decode_file(&metadata.midi_path)?;
    let options = build_options(&metadata, skip, limit, threshold, bpm);
    let analysis = analyze_stream(&stream, &options)
        .with_context(|| format!("analyzing fixture {}", fixture))?;

    print!("{}", render_report(&analysis));
    Ok(ExitCode::from(0))
}

fn run_events(catalog: &FixtureCatalog, fixture: &str) -> Result<ExitCode> {
    let (metadata, _) = catalog.load(fixture, None)?;
    let stream = decode_file(&metadata.midi_path)?;

    for event in extract_all(&stream) {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_bundle(analysis: &PerturbationAnalysis, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(analysis)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}
