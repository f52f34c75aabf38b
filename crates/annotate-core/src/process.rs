//! External process execution with optional stdout capture.
//!
//! One interface covers both invocation modes the pipeline needs: a
//! fire-and-forget run that only yields the exit status (notation
//! conversion), and a run that collects everything the child wrote to
//! stdout (analysis, whose stdout is the annotated game text).

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Errors that can occur when running an external tool.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The executable was not found at the given path.
    #[error("Executable not found at path: {0}")]
    NotFound(String),
    /// The process could not be spawned or waited on.
    #[error("Failed to run process: {0}")]
    Io(#[from] std::io::Error),
    /// The child's captured stdout was not valid UTF-8.
    #[error("Process output was not valid UTF-8")]
    NonUtf8Output,
}

/// Runs `program` with `args` and waits for it to exit.
///
/// The child's stdout is discarded; stderr passes through so tool
/// diagnostics stay visible. The exit status is returned, not interpreted:
/// a non-zero status is not an error at this layer.
///
/// # Errors
///
/// Returns [`ProcessError::NotFound`] if `program` does not exist (checked
/// before spawning), or [`ProcessError::Io`] if spawning or waiting fails.
pub fn run(program: &Path, args: &[OsString]) -> Result<ExitStatus, ProcessError> {
    check_exists(program)?;
    tracing::debug!(program = %program.display(), "spawning external tool");
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .status()?;
    Ok(status)
}

/// Runs `program` with `args`, waits for it to exit, and returns everything
/// it wrote to stdout as one text blob.
///
/// # Errors
///
/// Returns [`ProcessError::NotFound`] if `program` does not exist,
/// [`ProcessError::Io`] if spawning or waiting fails, or
/// [`ProcessError::NonUtf8Output`] if the captured stream is not UTF-8.
pub fn run_captured(program: &Path, args: &[OsString]) -> Result<String, ProcessError> {
    check_exists(program)?;
    tracing::debug!(program = %program.display(), "spawning external tool with captured stdout");
    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;
    String::from_utf8(output.stdout).map_err(|_| ProcessError::NonUtf8Output)
}

fn check_exists(program: &Path) -> Result<(), ProcessError> {
    if !program.exists() {
        return Err(ProcessError::NotFound(program.display().to_string()));
    }
    Ok(())
}
