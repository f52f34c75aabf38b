//! pgn-annotate - engine-backed PGN game annotation.
//!
//! Converts each input game to an engine-friendly notation, drives the
//! bundled analysis tool over it, and writes the annotated game plus a
//! statistics report beside the input. The chess knowledge lives in the
//! external tools; this binary resolves options, validates inputs, and
//! sequences the pipeline.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use annotate_core::config::Config;
use annotate_core::pipeline::Pipeline;
use annotate_core::request::{AnalysisRequest, Color, Overrides};
use annotate_core::toolchain::Toolchain;
use annotate_core::validate;

/// Depth above which the run prints a non-fatal slowness advisory.
const DEPTH_ADVISORY_LIMIT: u32 = 12;

#[derive(Parser, Debug)]
#[command(name = "pgn-annotate")]
#[command(version)]
#[command(about = "Annotates PGN chess games with engine move commentary")]
struct Cli {
    /// Path to the UCI engine executable used for analysis
    #[arg(short, long)]
    engine: Option<PathBuf>,

    /// Worker threads the engine may use
    #[arg(short, long, value_parser = parse_positive)]
    threads: Option<u32>,

    /// Search depth per analyzed position
    #[arg(short, long, value_parser = parse_positive)]
    depth: Option<u32>,

    /// Side to annotate: W (white), B (black) or A (both)
    #[arg(short, long, value_parser = parse_color)]
    color: Option<Color>,

    /// Leading opening moves excluded from analysis
    #[arg(short, long = "opening-skip", alias = "oskip", value_parser = parse_count)]
    opening_skip: Option<u32>,

    /// PGN game files to annotate
    #[arg(value_name = "FILES")]
    files: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            engine: self.engine.clone(),
            threads: self.threads,
            depth: self.depth,
            opening_skip: self.opening_skip,
            color: self.color,
        }
    }
}

/// Digits only: no sign, no whitespace.
fn parse_count(value: &str) -> Result<u32, String> {
    if !validate::is_unsigned_integer(value) {
        return Err(format!("'{value}' is not an unsigned number"));
    }
    value
        .parse()
        .map_err(|_| format!("'{value}' is out of range"))
}

fn parse_positive(value: &str) -> Result<u32, String> {
    let parsed = parse_count(value)?;
    if parsed == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(parsed)
}

fn parse_color(value: &str) -> Result<Color, String> {
    Color::parse(value).ok_or_else(|| format!("'{value}' is not a color; choices are A, W or B"))
}

/// Splits candidate tokens into validated inputs and skipped tokens, with
/// the reason each candidate was skipped.
fn partition_candidates(candidates: &[String]) -> (Vec<PathBuf>, Vec<(String, &'static str)>) {
    let mut inputs = Vec::new();
    let mut skipped = Vec::new();
    for candidate in candidates {
        if !validate::has_pgn_extension(candidate) {
            skipped.push((candidate.clone(), "not a .pgn file"));
        } else if !validate::is_readable_file(Path::new(candidate)) {
            skipped.push((candidate.clone(), "file was not found"));
        } else {
            inputs.push(PathBuf::from(candidate));
        }
    }
    (inputs, skipped)
}

fn print_request(request: &AnalysisRequest) {
    println!("Engine  : {}", request.engine.display());
    println!("Threads : {}", request.threads);
    println!("Depth   : {}", request.depth);
    println!("Color   : {}", request.color);
    println!("Opening moves to skip : {}", request.opening_skip);
    println!();
    if request.depth > DEPTH_ADVISORY_LIMIT {
        println!("NOTE: depth is set greater than {DEPTH_ADVISORY_LIMIT}, analysis might take longer...");
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if cli.files.is_empty() {
        anyhow::bail!("no input files given; see --help for usage");
    }

    let install_dir = Config::install_dir().context("cannot locate the install directory")?;
    tracing::debug!(install_dir = %install_dir.display(), "resolved install directory");
    let config = Config::load_or_default(&Config::sidecar_path(&install_dir))?;
    let request = AnalysisRequest::resolve(&config, &install_dir, cli.overrides());

    if !validate::is_readable_file(&request.engine) {
        anyhow::bail!("the engine '{}' was not found", request.engine.display());
    }

    let (inputs, skipped) = partition_candidates(&cli.files);
    for (candidate, reason) in &skipped {
        println!("Skipping '{candidate}': {reason}");
    }

    print_request(&request);

    let pipeline = Pipeline::new(Toolchain::new(install_dir), request);

    let mut annotated = 0usize;
    for input in &inputs {
        println!("Analysing {} please wait...", input.display());
        match pipeline.annotate_file(input) {
            Ok(outputs) => {
                annotated += 1;
                println!(
                    "Wrote {} and {}",
                    outputs.game.display(),
                    outputs.stats.display()
                );
            }
            Err(error) => {
                eprintln!("Failed to annotate {}: {error}", input.display());
            }
        }
    }

    println!();
    println!("Annotated {} of {} input(s)", annotated, cli.files.len());

    // One failed or skipped input makes the whole run non-zero.
    if annotated < cli.files.len() {
        std::process::exit(1);
    }
    Ok(())
}
