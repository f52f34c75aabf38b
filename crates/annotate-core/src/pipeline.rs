//! The per-file annotation pipeline.
//!
//! Each input runs through four stages: conversion to UCI move text,
//! engine-driven analysis with stdout capture, conversion of the annotated
//! text back to PGN beside the input, and harvesting of the statistics side
//! channel. Intermediate artifacts live in a temporary directory created per
//! run and removed on every exit path, so concurrent invocations against
//! same-named inputs cannot corrupt each other.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

use crate::request::AnalysisRequest;
use crate::toolchain::{self, ToolError, Toolchain};
use crate::validate::PGN_EXTENSION;

/// Errors that can occur while annotating a single input file.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An external tool failed or produced no output.
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// The per-run temporary directory could not be created.
    #[error("Failed to create temporary directory: {0}")]
    TempDir(std::io::Error),
    /// The input path has no usable UTF-8 file name.
    #[error("Input '{}' has no usable file name", .0.display())]
    BadFileName(PathBuf),
    /// The analysis tool did not write its mandatory statistics file.
    #[error("Statistics file '{}' was not produced by the analysis tool", .0.display())]
    MissingStats(PathBuf),
    /// The statistics side channel could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A pipeline artifact could not be written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        /// Path of the unwritable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Final artifacts produced for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedGame {
    /// The annotated PGN, beside the input.
    pub game: PathBuf,
    /// The statistics report, beside the input.
    pub stats: PathBuf,
}

/// Derives `game1.analyzed.pgn` from `game1.pgn`, in the same directory.
pub fn analyzed_path(input: &Path) -> PathBuf {
    input.with_extension("analyzed.pgn")
}

/// Derives `game1.stats.txt` from `game1.pgn`, in the same directory.
pub fn stats_report_path(input: &Path) -> PathBuf {
    input.with_extension("stats.txt")
}

/// Runs the conversion/analysis/report sequence over validated input files.
///
/// Inputs are processed strictly one at a time; the request's thread count
/// is passed through to the external engine, never used to parallelize this
/// orchestrator.
pub struct Pipeline {
    toolchain: Toolchain,
    request: AnalysisRequest,
}

impl Pipeline {
    /// Creates a pipeline for one resolved request.
    pub fn new(toolchain: Toolchain, request: AnalysisRequest) -> Self {
        Self { toolchain, request }
    }

    /// Annotates one input file.
    ///
    /// On success the annotated game and the statistics report sit beside
    /// the input and every intermediate artifact is gone. On failure the
    /// input is left untouched and the temporary directory is still
    /// removed by its guard.
    ///
    /// # Errors
    ///
    /// Any stage failing maps to a [`PipelineError`]; a missing statistics
    /// side channel after a completed analysis is an error naming the
    /// expected path, never a silent empty report.
    pub fn annotate_file(&self, input: &Path) -> Result<AnnotatedGame, PipelineError> {
        let base = base_name(input)?;
        let temp = TempDir::new().map_err(PipelineError::TempDir)?;

        let intermediate = temp.path().join(format!("{base}.uci"));
        let analysed = temp.path().join(format!("{base}.analyzed"));

        self.toolchain.convert_to_uci(input, &intermediate)?;

        let captured = self.toolchain.analyse(&self.request, &intermediate)?;
        fs::write(&analysed, &captured).map_err(|source| PipelineError::Write {
            path: analysed.clone(),
            source,
        })?;

        let game = analyzed_path(input);
        self.toolchain.convert_to_pgn(&analysed, &game)?;

        let stats = stats_report_path(input);
        let report = harvest_stats(&toolchain::stats_path(&intermediate))?;
        fs::write(&stats, report).map_err(|source| PipelineError::Write {
            path: stats.clone(),
            source,
        })?;

        if let Err(error) = temp.close() {
            tracing::warn!(%error, "failed to remove temporary artifacts");
        }

        Ok(AnnotatedGame { game, stats })
    }
}

/// The input's file name with the `.pgn` extension stripped; intermediate
/// artifacts derive their names from it.
fn base_name(input: &Path) -> Result<&str, PipelineError> {
    input
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.strip_suffix(PGN_EXTENSION).unwrap_or(name))
        .ok_or_else(|| PipelineError::BadFileName(input.to_path_buf()))
}

/// Reads the statistics side channel and shapes the report content: the
/// tool's output, newline-terminated, followed by one blank line.
fn harvest_stats(source: &Path) -> Result<String, PipelineError> {
    if !source.exists() {
        return Err(PipelineError::MissingStats(source.to_path_buf()));
    }
    let mut content = fs::read_to_string(source).map_err(|error| PipelineError::Read {
        path: source.to_path_buf(),
        source: error,
    })?;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str("\n\n");
    Ok(content)
}
